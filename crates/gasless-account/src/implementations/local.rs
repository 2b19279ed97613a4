//! Local wallet backed by a private key from configuration.
//!
//! Signs typed data in-process with `alloy-signer-local`. The active network
//! is read from a JSON-RPC node when `rpc_url` is configured, so switching the
//! node's network changes the signing domain; otherwise the configured
//! `chain_id` is reported.

use crate::{WalletError, WalletInterface};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport_http::Http;
use async_trait::async_trait;
use gasless_types::{
	Address, ConfigSchema, Field, FieldType, Schema, SecretString, Signature, TypedData,
	ValidationError,
};
use std::sync::Arc;

/// Where the wallet reads its active network from.
enum NetworkSource {
	Fixed(u64),
	Rpc(Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>),
}

/// In-process wallet holding one private key.
pub struct LocalWallet {
	signer: PrivateKeySigner,
	network: NetworkSource,
}

impl LocalWallet {
	/// Creates a wallet reporting a fixed network id.
	pub fn new(private_key: &SecretString, chain_id: u64) -> Result<Self, WalletError> {
		Ok(Self {
			signer: parse_signer(private_key)?,
			network: NetworkSource::Fixed(chain_id),
		})
	}

	/// Creates a wallet that reads the network id from a JSON-RPC node.
	pub fn with_rpc(private_key: &SecretString, rpc_url: &str) -> Result<Self, WalletError> {
		let url = rpc_url
			.parse()
			.map_err(|e| WalletError::Implementation(format!("Invalid RPC URL: {}", e)))?;
		let provider = ProviderBuilder::new().on_http(url);

		Ok(Self {
			signer: parse_signer(private_key)?,
			network: NetworkSource::Rpc(
				Arc::new(provider) as Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>
			),
		})
	}
}

fn parse_signer(private_key: &SecretString) -> Result<PrivateKeySigner, WalletError> {
	private_key.with_exposed(|key| {
		key.parse::<PrivateKeySigner>()
			.map_err(|_| WalletError::InvalidKey("Invalid private key format".to_string()))
	})
}

/// Configuration schema for the local wallet.
pub struct LocalWalletSchema;

impl LocalWalletSchema {
	/// Static validation method for use before instance creation
	pub fn validate_config(config: &toml::Value) -> Result<(), ValidationError> {
		Self.validate(config)
	}
}

impl ConfigSchema for LocalWalletSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("private_key", FieldType::String).with_validator(|value| {
				let key = value.as_str().unwrap_or_default();
				let hex = key.strip_prefix("0x").unwrap_or(key);
				if hex.len() != 64 {
					return Err("Private key must be 64 hex characters".to_string());
				}
				if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
					return Err("Private key must contain only hex characters".to_string());
				}
				Ok(())
			})],
			vec![
				Field::new(
					"chain_id",
					FieldType::Integer {
						min: Some(1),
						max: None,
					},
				),
				Field::new("rpc_url", FieldType::Url),
			],
		);
		schema.validate(config)?;

		if config.get("chain_id").is_none() && config.get("rpc_url").is_none() {
			return Err(ValidationError::MissingField(
				"chain_id or rpc_url".to_string(),
			));
		}
		Ok(())
	}
}

#[async_trait]
impl WalletInterface for LocalWallet {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(LocalWalletSchema)
	}

	async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
		Ok(vec![self.signer.address()])
	}

	async fn active_signer(&self) -> Result<Address, WalletError> {
		Ok(self.signer.address())
	}

	async fn active_network(&self) -> Result<u64, WalletError> {
		match &self.network {
			NetworkSource::Fixed(chain_id) => Ok(*chain_id),
			NetworkSource::Rpc(provider) => provider
				.get_chain_id()
				.await
				.map_err(|e| WalletError::Network(format!("Failed to read chain id: {}", e))),
		}
	}

	async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Signature, WalletError> {
		let hash = typed_data.signing_hash();
		tracing::debug!(
			signer = %self.signer.address(),
			chain_id = typed_data.domain.chain_id,
			digest = %hash,
			"Signing typed data"
		);

		let signature = self
			.signer
			.sign_hash(&hash)
			.await
			.map_err(|e| WalletError::SignatureDenied(e.to_string()))?;

		Signature::from_bytes(&signature.as_bytes())
			.map_err(|e| WalletError::Implementation(e.to_string()))
	}
}

/// Factory function to create a local wallet from configuration.
///
/// Configuration parameters:
/// - `private_key`: hex-encoded private key (with or without 0x prefix)
/// - `chain_id`: fixed network id reported by the wallet
/// - `rpc_url`: node to read the live network id from; takes precedence over `chain_id`
pub fn create_wallet(
	config: &toml::Value,
) -> Result<Box<dyn crate::WalletInterface>, WalletError> {
	LocalWalletSchema::validate_config(config)
		.map_err(|e| WalletError::Implementation(format!("Invalid configuration: {}", e)))?;

	let private_key = config
		.get("private_key")
		.and_then(|v| v.as_str())
		.map(SecretString::from)
		.ok_or_else(|| WalletError::InvalidKey("private_key is required".to_string()))?;

	let wallet = match config.get("rpc_url").and_then(|v| v.as_str()) {
		Some(rpc_url) => LocalWallet::with_rpc(&private_key, rpc_url)?,
		None => {
			let chain_id = config
				.get("chain_id")
				.and_then(|v| v.as_integer())
				.ok_or_else(|| WalletError::Implementation("chain_id is required".to_string()))?;
			LocalWallet::new(&private_key, chain_id as u64)?
		},
	};

	Ok(Box::new(wallet))
}

/// Registry for the local wallet implementation.
pub struct Registry;

impl gasless_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "local";
	type Factory = crate::WalletFactory;

	fn factory() -> Self::Factory {
		create_wallet
	}
}

impl crate::WalletRegistry for Registry {}
