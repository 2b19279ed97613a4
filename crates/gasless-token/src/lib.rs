//! Token contract module for the gasless transfer client.
//!
//! Reads the on-chain metadata the signing domain depends on (name, decimals)
//! and holder balances from a `transferWithAuthorization` token. The client
//! never writes to the token; the relayer does.

use async_trait::async_trait;
use gasless_types::{format_units, Address, ConfigSchema, ImplementationRegistry, U256};
use thiserror::Error;

pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

/// Errors that can occur while reading from the token contract.
#[derive(Debug, Error)]
pub enum TokenError {
	/// The node could not be reached or the call reverted.
	#[error("Network error: {0}")]
	Network(String),
	/// The call returned data that does not decode.
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
	/// Any other failure inside the implementation.
	#[error("Implementation error: {0}")]
	Implementation(String),
}

/// Read access to a token contract.
#[async_trait]
pub trait TokenInterface: Send + Sync {
	/// Returns the configuration schema for this token implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// On-chain name of the token at `token`.
	async fn name(&self, token: Address) -> Result<String, TokenError>;

	/// Number of decimals of the token at `token`.
	async fn decimals(&self, token: Address) -> Result<u8, TokenError>;

	/// Balance of `holder` in the token's smallest unit.
	async fn balance_of(&self, token: Address, holder: Address) -> Result<U256, TokenError>;
}

/// Type alias for token factory functions.
pub type TokenFactory = fn(&toml::Value) -> Result<Box<dyn TokenInterface>, TokenError>;

/// Registry trait for token implementations.
pub trait TokenRegistry: ImplementationRegistry<Factory = TokenFactory> {}

/// Get all registered token implementations.
pub fn get_all_implementations() -> Vec<(&'static str, TokenFactory)> {
	use implementations::evm::alloy;

	vec![(alloy::Registry::NAME, alloy::Registry::factory())]
}

/// Token metadata needed to build a signing domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
	pub name: String,
	pub decimals: u8,
}

/// Service bound to one token contract.
pub struct TokenService {
	implementation: Box<dyn TokenInterface>,
	address: Address,
}

impl TokenService {
	pub fn new(implementation: Box<dyn TokenInterface>, address: Address) -> Self {
		Self {
			implementation,
			address,
		}
	}

	/// Address of the token contract.
	pub fn address(&self) -> Address {
		self.address
	}

	/// Reads name and decimals from the contract.
	pub async fn metadata(&self) -> Result<TokenMetadata, TokenError> {
		let name = self.implementation.name(self.address).await?;
		let decimals = self.implementation.decimals(self.address).await?;
		Ok(TokenMetadata { name, decimals })
	}

	/// Reads the raw balance of `holder`.
	pub async fn balance_of(&self, holder: Address) -> Result<U256, TokenError> {
		self.implementation.balance_of(self.address, holder).await
	}

	/// Reads the balance of `holder` formatted as a decimal string.
	pub async fn formatted_balance(&self, holder: Address) -> Result<String, TokenError> {
		let decimals = self.implementation.decimals(self.address).await?;
		let balance = self.balance_of(holder).await?;
		Ok(format_units(balance, decimals))
	}
}
