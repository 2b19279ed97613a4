//! Relayer module for the gasless transfer client.
//!
//! The relayer is the external service that pays the network fee: it takes a
//! signed authorization and submits `transferWithAuthorization` on the
//! holder's behalf. This crate only speaks its request/response contract.

use async_trait::async_trait;
use gasless_types::{ConfigSchema, ImplementationRegistry, RelayTransferRequest};
use thiserror::Error;

pub mod implementations {
	pub mod http;
}

/// Errors that can occur when submitting to the relayer.
#[derive(Debug, Error)]
pub enum RelayerError {
	/// The relayer answered with a failure. The message is shown to the user
	/// verbatim.
	#[error("{0}")]
	Rejected(String),
	/// The relayer could not be reached or did not answer in time.
	#[error("Network error: {0}")]
	Network(String),
	/// The relayer reported success without a usable body.
	#[error("Invalid relayer response: {0}")]
	InvalidResponse(String),
	/// Any other failure inside the implementation.
	#[error("Implementation error: {0}")]
	Implementation(String),
}

/// Submission interface of a relayer.
#[async_trait]
pub trait RelayerInterface: Send + Sync {
	/// Returns the configuration schema for this relayer implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Submits a signed authorization and returns the transaction hash the
	/// relayer broadcast.
	async fn relay_transfer(&self, request: &RelayTransferRequest) -> Result<String, RelayerError>;
}

/// Type alias for relayer factory functions.
pub type RelayerFactory = fn(&toml::Value) -> Result<Box<dyn RelayerInterface>, RelayerError>;

/// Registry trait for relayer implementations.
pub trait RelayerRegistry: ImplementationRegistry<Factory = RelayerFactory> {}

/// Get all registered relayer implementations.
pub fn get_all_implementations() -> Vec<(&'static str, RelayerFactory)> {
	use implementations::http;

	vec![(http::Registry::NAME, http::Registry::factory())]
}

/// Service wrapping the configured relayer implementation.
pub struct RelayerService {
	implementation: Box<dyn RelayerInterface>,
}

impl RelayerService {
	pub fn new(implementation: Box<dyn RelayerInterface>) -> Self {
		Self { implementation }
	}

	/// Submits a signed authorization exactly once.
	pub async fn submit(&self, request: &RelayTransferRequest) -> Result<String, RelayerError> {
		let tx_hash = self.implementation.relay_transfer(request).await?;
		if tx_hash.trim().is_empty() {
			return Err(RelayerError::InvalidResponse(
				"empty transaction hash".to_string(),
			));
		}
		Ok(tx_hash)
	}
}
