//! HTTP relayer client.
//!
//! Posts the signed authorization to `<base_url>/relay-transfer` and maps the
//! answer onto `RelayerError`. Exactly one request is made per call.

use crate::{RelayerError, RelayerInterface};
use async_trait::async_trait;
use gasless_types::{
	ConfigSchema, Field, FieldType, RelayErrorResponse, RelaySuccessResponse,
	RelayTransferRequest, Schema, ValidationError, RELAY_TRANSFER_PATH,
};
use std::time::Duration;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Relayer reached over HTTP.
pub struct HttpRelayer {
	client: reqwest::Client,
	endpoint: String,
}

impl HttpRelayer {
	pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RelayerError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| RelayerError::Implementation(format!("Failed to build client: {}", e)))?;

		Ok(Self {
			client,
			endpoint: format!("{}/{}", base_url.trim_end_matches('/'), RELAY_TRANSFER_PATH),
		})
	}

	/// Full URL of the relay endpoint.
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}
}

/// Configuration schema for the HTTP relayer.
pub struct HttpRelayerSchema;

impl HttpRelayerSchema {
	/// Static validation method for use before instance creation
	pub fn validate_config(config: &toml::Value) -> Result<(), ValidationError> {
		Self.validate(config)
	}
}

impl ConfigSchema for HttpRelayerSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("base_url", FieldType::Url)],
			vec![Field::new(
				"timeout_seconds",
				FieldType::Integer {
					min: Some(1),
					max: Some(600),
				},
			)],
		);
		schema.validate(config)
	}
}

#[async_trait]
impl RelayerInterface for HttpRelayer {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(HttpRelayerSchema)
	}

	async fn relay_transfer(&self, request: &RelayTransferRequest) -> Result<String, RelayerError> {
		tracing::debug!(endpoint = %self.endpoint, from = %request.payload.from, "Posting authorization");

		let response = self
			.client
			.post(&self.endpoint)
			.json(request)
			.send()
			.await
			.map_err(|e| {
				if e.is_timeout() {
					RelayerError::Network(format!("Relayer timed out: {}", e))
				} else {
					RelayerError::Network(format!("Failed to reach relayer: {}", e))
				}
			})?;

		let status = response.status();
		let body = response
			.bytes()
			.await
			.map_err(|e| RelayerError::Network(format!("Failed to read relayer response: {}", e)))?;

		if status.is_success() {
			let success: RelaySuccessResponse = serde_json::from_slice(&body).map_err(|e| {
				RelayerError::InvalidResponse(format!("Response has no txHash: {}", e))
			})?;
			return Ok(success.tx_hash);
		}

		let message = serde_json::from_slice::<RelayErrorResponse>(&body)
			.map(|r| r.error)
			.unwrap_or_else(|_| format!("Relayer responded with HTTP {}", status.as_u16()));
		tracing::warn!(status = status.as_u16(), error = %message, "Relayer rejected authorization");
		Err(RelayerError::Rejected(message))
	}
}

/// Factory function to create an HTTP relayer from configuration.
///
/// Configuration parameters:
/// - `base_url`: relayer base URL; requests go to `<base_url>/relay-transfer`
/// - `timeout_seconds`: request timeout (default: 30)
pub fn create_relayer(config: &toml::Value) -> Result<Box<dyn RelayerInterface>, RelayerError> {
	HttpRelayerSchema::validate_config(config)
		.map_err(|e| RelayerError::Implementation(format!("Invalid configuration: {}", e)))?;

	let base_url = config
		.get("base_url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| RelayerError::Implementation("base_url is required".to_string()))?;

	let timeout_seconds = config
		.get("timeout_seconds")
		.and_then(|v| v.as_integer())
		.map(|v| v as u64)
		.unwrap_or(DEFAULT_TIMEOUT_SECONDS);

	Ok(Box::new(HttpRelayer::new(
		base_url,
		Duration::from_secs(timeout_seconds),
	)?))
}

/// Registry for the HTTP relayer implementation.
pub struct Registry;

impl gasless_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "http";
	type Factory = crate::RelayerFactory;

	fn factory() -> Self::Factory {
		create_relayer
	}
}

impl crate::RelayerRegistry for Registry {}
