//! Builder for `Config` values with test-friendly defaults.

use crate::{ClientConfig, Config, RelayerConfig, TokenConfig, WalletConfig};
use gasless_types::{Address, ExplorerConfig, DEFAULT_SIGNING_VERSION};
use std::collections::HashMap;

/// Builds a `Config` without going through TOML.
///
/// Implementation tables start empty; tests that construct collaborators
/// from configuration add them with the `*_implementation` setters.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	client_id: String,
	balance_refresh_delay_seconds: u64,
	token_address: Address,
	signing_version: String,
	token: (String, HashMap<String, toml::Value>),
	wallet: (String, HashMap<String, toml::Value>),
	relayer: (String, HashMap<String, toml::Value>),
	explorer: ExplorerConfig,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	pub fn new() -> Self {
		Self {
			client_id: "test-client".to_string(),
			balance_refresh_delay_seconds: 5,
			token_address: Address::repeat_byte(0x42),
			signing_version: DEFAULT_SIGNING_VERSION.to_string(),
			token: ("evm_alloy".to_string(), HashMap::new()),
			wallet: ("local".to_string(), HashMap::new()),
			relayer: ("http".to_string(), HashMap::new()),
			explorer: ExplorerConfig::default(),
		}
	}

	pub fn client_id(mut self, id: impl Into<String>) -> Self {
		self.client_id = id.into();
		self
	}

	pub fn balance_refresh_delay_seconds(mut self, seconds: u64) -> Self {
		self.balance_refresh_delay_seconds = seconds;
		self
	}

	pub fn token_address(mut self, address: Address) -> Self {
		self.token_address = address;
		self
	}

	pub fn signing_version(mut self, version: impl Into<String>) -> Self {
		self.signing_version = version.into();
		self
	}

	/// Adds a token implementation and makes it primary.
	pub fn token_implementation(mut self, name: &str, config: toml::Value) -> Self {
		self.token.0 = name.to_string();
		self.token.1.insert(name.to_string(), config);
		self
	}

	/// Adds a wallet implementation and makes it primary.
	pub fn wallet_implementation(mut self, name: &str, config: toml::Value) -> Self {
		self.wallet.0 = name.to_string();
		self.wallet.1.insert(name.to_string(), config);
		self
	}

	/// Adds a relayer implementation and makes it primary.
	pub fn relayer_implementation(mut self, name: &str, config: toml::Value) -> Self {
		self.relayer.0 = name.to_string();
		self.relayer.1.insert(name.to_string(), config);
		self
	}

	pub fn explorer(mut self, explorer: ExplorerConfig) -> Self {
		self.explorer = explorer;
		self
	}

	pub fn build(self) -> Config {
		Config {
			client: ClientConfig {
				id: self.client_id,
				balance_refresh_delay_seconds: self.balance_refresh_delay_seconds,
			},
			token: TokenConfig {
				address: self.token_address,
				signing_version: self.signing_version,
				primary: self.token.0,
				implementations: self.token.1,
			},
			wallet: WalletConfig {
				primary: self.wallet.0,
				implementations: self.wallet.1,
			},
			relayer: RelayerConfig {
				primary: self.relayer.0,
				implementations: self.relayer.1,
			},
			explorer: self.explorer,
		}
	}
}
