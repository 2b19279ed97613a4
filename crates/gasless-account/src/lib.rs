//! Wallet module for the gasless transfer client.
//!
//! The wallet is the key-holding agent that owns the holder's account. The
//! client never sees key material through this interface: it asks for account
//! access, reads the active signer and network, and requests a signature over
//! structured data. Implementations plug in through `WalletInterface`.

use async_trait::async_trait;
use gasless_types::{Address, ConfigSchema, ImplementationRegistry, Signature, TypedData};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
	/// No wallet could be reached.
	#[error("Wallet unavailable: {0}")]
	Unavailable(String),
	/// The holder refused account access.
	#[error("Account access denied: {0}")]
	AccessDenied(String),
	/// The holder refused or the wallet failed to produce a signature.
	#[error("Signature denied: {0}")]
	SignatureDenied(String),
	/// The wallet could not read the active network.
	#[error("Network error: {0}")]
	Network(String),
	/// Key material in the configuration is invalid.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Any other failure inside the implementation.
	#[error("Implementation error: {0}")]
	Implementation(String),
}

/// Interface of the key-holding wallet.
#[async_trait]
pub trait WalletInterface: Send + Sync {
	/// Returns the configuration schema for this wallet implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Requests access to the holder's accounts.
	///
	/// Fails with `AccessDenied` if the holder refuses.
	async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

	/// Address of the account that will sign.
	async fn active_signer(&self) -> Result<Address, WalletError>;

	/// Id of the network the wallet is currently connected to.
	async fn active_network(&self) -> Result<u64, WalletError>;

	/// Signs structured data with the active signer.
	///
	/// Fails with `SignatureDenied` if the holder refuses.
	async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Signature, WalletError>;
}

/// Type alias for wallet factory functions.
pub type WalletFactory = fn(&toml::Value) -> Result<Box<dyn WalletInterface>, WalletError>;

/// Registry trait for wallet implementations.
pub trait WalletRegistry: ImplementationRegistry<Factory = WalletFactory> {}

/// Get all registered wallet implementations.
///
/// Returns a vector of (name, factory) tuples for all available wallet implementations.
pub fn get_all_implementations() -> Vec<(&'static str, WalletFactory)> {
	use implementations::local;

	vec![(local::Registry::NAME, local::Registry::factory())]
}

/// Service wrapping the configured wallet implementation.
pub struct WalletService {
	implementation: Box<dyn WalletInterface>,
}

impl WalletService {
	pub fn new(implementation: Box<dyn WalletInterface>) -> Self {
		Self { implementation }
	}

	/// Requests account access and returns the active signer and network.
	///
	/// Both are read from the wallet on every call; nothing is cached.
	pub async fn connect(&self) -> Result<(Address, u64), WalletError> {
		let accounts = self.implementation.request_accounts().await?;
		if accounts.is_empty() {
			return Err(WalletError::AccessDenied(
				"wallet returned no accounts".to_string(),
			));
		}
		let signer = self.implementation.active_signer().await?;
		let chain_id = self.implementation.active_network().await?;
		Ok((signer, chain_id))
	}

	/// Requests a structured-data signature.
	pub async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Signature, WalletError> {
		self.implementation.sign_typed_data(typed_data).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use gasless_types::ValidationError;

	struct EmptyWallet;

	struct NoSchema;

	impl ConfigSchema for NoSchema {
		fn validate(&self, _config: &toml::Value) -> Result<(), ValidationError> {
			Ok(())
		}
	}

	#[async_trait]
	impl WalletInterface for EmptyWallet {
		fn config_schema(&self) -> Box<dyn ConfigSchema> {
			Box::new(NoSchema)
		}

		async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
			Ok(Vec::new())
		}

		async fn active_signer(&self) -> Result<Address, WalletError> {
			Err(WalletError::Unavailable("locked".into()))
		}

		async fn active_network(&self) -> Result<u64, WalletError> {
			Ok(1)
		}

		async fn sign_typed_data(&self, _typed_data: &TypedData) -> Result<Signature, WalletError> {
			Err(WalletError::SignatureDenied("user rejected".into()))
		}
	}

	#[tokio::test]
	async fn test_connect_without_accounts_is_access_denied() {
		let service = WalletService::new(Box::new(EmptyWallet));
		assert!(matches!(
			service.connect().await,
			Err(WalletError::AccessDenied(_))
		));
	}

	#[test]
	fn test_local_implementation_registered() {
		let names: Vec<_> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["local"]);
	}
}
