//! Alloy-based token reader.
//!
//! Issues `eth_call`s against a JSON-RPC node with calldata encoded from the
//! token's Solidity interface.

use crate::{TokenError, TokenInterface};
use alloy_primitives::Bytes;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use alloy_transport_http::Http;
use async_trait::async_trait;
use gasless_types::{Address, ConfigSchema, Field, FieldType, Schema, ValidationError, U256};
use std::sync::Arc;

sol! {
	/// Read surface of an ERC-20 token with `transferWithAuthorization`.
	interface IAuthorizationToken {
		function name() external view returns (string);
		function decimals() external view returns (uint8);
		function balanceOf(address account) external view returns (uint256);
	}
}

/// Token reader backed by an alloy HTTP provider.
pub struct AlloyToken {
	provider: Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
}

impl AlloyToken {
	pub fn new(rpc_url: &str) -> Result<Self, TokenError> {
		let url = rpc_url
			.parse()
			.map_err(|e| TokenError::Implementation(format!("Invalid RPC URL: {}", e)))?;
		let provider = ProviderBuilder::new().on_http(url);

		Ok(Self {
			provider: Arc::new(provider) as Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
		})
	}

	async fn call<C: SolCall>(&self, token: Address, call: C) -> Result<C::Return, TokenError> {
		let request = TransactionRequest::default()
			.to(token)
			.input(Bytes::from(call.abi_encode()).into());

		let output = self.provider.call(&request).await.map_err(|e| {
			TokenError::Network(format!("Failed to call {}: {}", C::SIGNATURE, e))
		})?;

		C::abi_decode_returns(&output, true).map_err(|e| {
			TokenError::InvalidResponse(format!("Failed to decode {}: {}", C::SIGNATURE, e))
		})
	}
}

/// Configuration schema for the alloy token reader.
pub struct AlloyTokenSchema;

impl AlloyTokenSchema {
	/// Static validation method for use before instance creation
	pub fn validate_config(config: &toml::Value) -> Result<(), ValidationError> {
		Self.validate(config)
	}
}

impl ConfigSchema for AlloyTokenSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(vec![Field::new("rpc_url", FieldType::Url)], vec![]).validate(config)
	}
}

#[async_trait]
impl TokenInterface for AlloyToken {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AlloyTokenSchema)
	}

	async fn name(&self, token: Address) -> Result<String, TokenError> {
		let ret = self.call(token, IAuthorizationToken::nameCall {}).await?;
		Ok(ret._0)
	}

	async fn decimals(&self, token: Address) -> Result<u8, TokenError> {
		let ret = self.call(token, IAuthorizationToken::decimalsCall {}).await?;
		Ok(ret._0)
	}

	async fn balance_of(&self, token: Address, holder: Address) -> Result<U256, TokenError> {
		let ret = self
			.call(token, IAuthorizationToken::balanceOfCall { account: holder })
			.await?;
		tracing::debug!(token = %token, holder = %holder, balance = %ret._0, "Read balance");
		Ok(ret._0)
	}
}

/// Factory function to create an alloy token reader from configuration.
///
/// Configuration parameters:
/// - `rpc_url`: JSON-RPC endpoint of the token's network
pub fn create_token(config: &toml::Value) -> Result<Box<dyn TokenInterface>, TokenError> {
	AlloyTokenSchema::validate_config(config)
		.map_err(|e| TokenError::Implementation(format!("Invalid configuration: {}", e)))?;

	let rpc_url = config
		.get("rpc_url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| TokenError::Implementation("rpc_url is required".to_string()))?;

	Ok(Box::new(AlloyToken::new(rpc_url)?))
}

/// Registry for the alloy token implementation.
pub struct Registry;

impl gasless_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "evm_alloy";
	type Factory = crate::TokenFactory;

	fn factory() -> Self::Factory {
		create_token
	}
}

impl crate::TokenRegistry for Registry {}
