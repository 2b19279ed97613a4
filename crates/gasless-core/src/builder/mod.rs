//! Builder for constructing transfer engines.
//!
//! Composes a `TransferEngine` from configuration and factory maps: for each
//! collaborator (wallet, token, relayer) the configured primary implementation
//! is looked up by name and built from its TOML table.

use crate::authorization::AuthorizationBuilder;
use crate::clock::{Clock, SystemClock};
use crate::engine::{event_bus::EventBus, TransferEngine};
use gasless_account::{WalletError, WalletInterface, WalletService};
use gasless_config::Config;
use gasless_relayer::{RelayerError, RelayerInterface, RelayerService};
use gasless_token::{TokenError, TokenInterface, TokenService};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Capacity of the engine's event bus.
const EVENT_BUS_CAPACITY: usize = 256;

/// Errors that can occur during engine construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Factory functions for every collaborator, keyed by implementation name.
pub struct EngineFactories<WF, TF, RF> {
	pub wallet_factories: HashMap<String, WF>,
	pub token_factories: HashMap<String, TF>,
	pub relayer_factories: HashMap<String, RF>,
}

/// Builder for a `TransferEngine` with pluggable implementations.
pub struct EngineBuilder {
	config: Config,
	clock: Arc<dyn Clock>,
}

impl EngineBuilder {
	pub fn new(config: Config) -> Self {
		Self {
			config,
			clock: Arc::new(SystemClock),
		}
	}

	/// Replaces the system clock used for validity windows.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;
		self
	}

	/// Builds the engine from the primary implementation of each collaborator.
	pub fn build<WF, TF, RF>(
		self,
		factories: EngineFactories<WF, TF, RF>,
	) -> Result<TransferEngine, BuilderError>
	where
		WF: Fn(&toml::Value) -> Result<Box<dyn WalletInterface>, WalletError>,
		TF: Fn(&toml::Value) -> Result<Box<dyn TokenInterface>, TokenError>,
		RF: Fn(&toml::Value) -> Result<Box<dyn RelayerInterface>, RelayerError>,
	{
		let wallet: Box<dyn WalletInterface> = create_primary(
			"wallet",
			&self.config.wallet.primary,
			&self.config.wallet.implementations,
			&factories.wallet_factories,
		)?;
		let token: Box<dyn TokenInterface> = create_primary(
			"token",
			&self.config.token.primary,
			&self.config.token.implementations,
			&factories.token_factories,
		)?;
		let relayer: Box<dyn RelayerInterface> = create_primary(
			"relayer",
			&self.config.relayer.primary,
			&self.config.relayer.implementations,
			&factories.relayer_factories,
		)?;

		let token = Arc::new(TokenService::new(token, self.config.token.address));
		let authorization = AuthorizationBuilder::new(
			token.clone(),
			self.config.token.signing_version.clone(),
			self.clock,
		);

		tracing::info!(
			client = %self.config.client.id,
			token = %self.config.token.address,
			"Transfer engine ready"
		);

		Ok(TransferEngine::new(
			Arc::new(WalletService::new(wallet)),
			token,
			Arc::new(RelayerService::new(relayer)),
			authorization,
			EventBus::new(EVENT_BUS_CAPACITY),
			self.config.explorer.clone(),
			Duration::from_secs(self.config.client.balance_refresh_delay_seconds),
		))
	}
}

/// Builds the primary implementation of one component.
fn create_primary<I: ?Sized, E: Display, F>(
	component: &str,
	primary: &str,
	implementations: &HashMap<String, toml::Value>,
	factories: &HashMap<String, F>,
) -> Result<Box<I>, BuilderError>
where
	F: Fn(&toml::Value) -> Result<Box<I>, E>,
{
	let config = implementations.get(primary).ok_or_else(|| {
		BuilderError::Config(format!(
			"Primary {} '{}' has no configuration",
			component, primary
		))
	})?;
	let factory = factories.get(primary).ok_or_else(|| {
		BuilderError::MissingComponent(format!(
			"No {} implementation named '{}'",
			component, primary
		))
	})?;

	match factory(config) {
		Ok(implementation) => {
			tracing::info!(component, implementation = %primary, "Loaded");
			Ok(implementation)
		},
		Err(e) => {
			tracing::error!(
				component,
				implementation = %primary,
				error = %e,
				"Failed to create implementation"
			);
			Err(BuilderError::Config(format!(
				"Failed to create {} implementation '{}': {}",
				component, primary, e
			)))
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::clock::FixedClock;
	use crate::engine::TransferIntent;
	use crate::test_support::{MockRelayer, MockToken, MockWallet, RelayReply};
	use gasless_account::WalletFactory;
	use gasless_config::ConfigBuilder;
	use gasless_relayer::RelayerFactory;
	use gasless_token::TokenFactory;
	use gasless_types::FlowStatus;

	fn mock_wallet(_config: &toml::Value) -> Result<Box<dyn WalletInterface>, WalletError> {
		Ok(Box::new(MockWallet::new(84532)))
	}

	fn mock_token(_config: &toml::Value) -> Result<Box<dyn TokenInterface>, TokenError> {
		Ok(Box::new(MockToken::new(6)))
	}

	fn mock_relayer(_config: &toml::Value) -> Result<Box<dyn RelayerInterface>, RelayerError> {
		Ok(Box::new(MockRelayer::new(RelayReply::Success("0xbeef".into()))))
	}

	fn broken_relayer(_config: &toml::Value) -> Result<Box<dyn RelayerInterface>, RelayerError> {
		Err(RelayerError::Implementation("base_url is required".into()))
	}

	fn config() -> Config {
		let empty = toml::Value::Table(toml::map::Map::new());
		ConfigBuilder::new()
			.wallet_implementation("mock", empty.clone())
			.token_implementation("mock", empty.clone())
			.relayer_implementation("mock", empty)
			.build()
	}

	fn factories(
		relayer: RelayerFactory,
	) -> EngineFactories<WalletFactory, TokenFactory, RelayerFactory> {
		EngineFactories {
			wallet_factories: HashMap::from([("mock".to_string(), mock_wallet as WalletFactory)]),
			token_factories: HashMap::from([("mock".to_string(), mock_token as TokenFactory)]),
			relayer_factories: HashMap::from([("mock".to_string(), relayer)]),
		}
	}

	#[tokio::test]
	async fn test_build_and_transfer() {
		let engine = EngineBuilder::new(config())
			.with_clock(Arc::new(FixedClock(1_000)))
			.build(factories(mock_relayer as RelayerFactory))
			.unwrap();

		let receipt = engine
			.transfer(TransferIntent::new(
				"0x70997970c51812dc3a010c7d01b50e0d17dc79c8",
				"2",
			))
			.await
			.unwrap();

		assert_eq!(receipt.tx_hash, "0xbeef");
		assert_eq!(receipt.payload.valid_after, 1_000);
		assert_eq!(receipt.payload.valid_before, 4_600);
		assert_eq!(engine.state().await.status, FlowStatus::Succeeded);
	}

	#[test]
	fn test_factory_failure_is_config_error() {
		let result = EngineBuilder::new(config()).build(factories(broken_relayer as RelayerFactory));
		assert!(matches!(result, Err(BuilderError::Config(m)) if m.contains("base_url is required")));
	}

	#[test]
	fn test_unknown_implementation_is_missing_component() {
		let empty = toml::Value::Table(toml::map::Map::new());
		let config = ConfigBuilder::new()
			.wallet_implementation("hardware", empty.clone())
			.token_implementation("mock", empty.clone())
			.relayer_implementation("mock", empty)
			.build();

		let result = EngineBuilder::new(config).build(factories(mock_relayer as RelayerFactory));
		assert!(matches!(result, Err(BuilderError::MissingComponent(_))));
	}
}
