//! Configuration module for the gasless transfer client.
//!
//! Loads the client configuration from TOML, resolving `${VAR}` and
//! `${VAR:-default}` references against the environment, and validates that
//! every collaborator section names a configured primary implementation.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files:
//! - Use `include = ["wallet.toml", "relayer.toml"]` to include other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)

#[cfg(feature = "testing")]
pub mod builders;
mod loader;

use gasless_types::{Address, ExplorerConfig, DEFAULT_SIGNING_VERSION};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "testing")]
pub use builders::ConfigBuilder;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message only, not the input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Client identity and timing.
	pub client: ClientConfig,
	/// Token contract the client transfers.
	pub token: TokenConfig,
	/// Wallet collaborator.
	pub wallet: WalletConfig,
	/// Relayer collaborator.
	pub relayer: RelayerConfig,
	/// Block-explorer links.
	#[serde(default)]
	pub explorer: ExplorerConfig,
}

/// Client identity and timing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
	/// Identifier used in logs.
	pub id: String,
	/// Delay after a successful submission before the holder's balance is
	/// read again. Defaults to 5 seconds.
	#[serde(default = "default_balance_refresh_delay_seconds")]
	pub balance_refresh_delay_seconds: u64,
}

fn default_balance_refresh_delay_seconds() -> u64 {
	5
}

/// Token contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
	/// Token contract address, used as the EIP-712 verifying contract.
	pub address: Address,
	/// EIP-712 domain version of the token.
	#[serde(default = "default_signing_version")]
	pub signing_version: String,
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of token implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

fn default_signing_version() -> String {
	DEFAULT_SIGNING_VERSION.to_string()
}

/// Wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WalletConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of wallet implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Relayer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayerConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of relayer implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				},
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}
	result.push_str(&input[last_end..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, following `include` directives.
	///
	/// Each top-level section must be unique across all configuration files.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_path = path_buf.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_path);
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;
		loader.load_config(file_name).await
	}

	/// Validates the configuration.
	///
	/// Checks that identities are non-empty, that each collaborator section
	/// has at least one implementation and that its `primary` names one of them.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.client.id.trim().is_empty() {
			return Err(ConfigError::Validation("Client ID cannot be empty".into()));
		}

		if self.token.address == Address::ZERO {
			return Err(ConfigError::Validation(
				"Token address cannot be the zero address".into(),
			));
		}
		if self.token.signing_version.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Token signing_version cannot be empty".into(),
			));
		}

		validate_primary("token", &self.token.primary, &self.token.implementations)?;
		validate_primary("wallet", &self.wallet.primary, &self.wallet.implementations)?;
		validate_primary(
			"relayer",
			&self.relayer.primary,
			&self.relayer.implementations,
		)?;

		if !self.explorer.default_url.starts_with("http://")
			&& !self.explorer.default_url.starts_with("https://")
		{
			return Err(ConfigError::Validation(format!(
				"Explorer default_url must be an http(s) URL, got '{}'",
				self.explorer.default_url
			)));
		}

		Ok(())
	}
}

fn validate_primary(
	section: &str,
	primary: &str,
	implementations: &HashMap<String, toml::Value>,
) -> Result<(), ConfigError> {
	if implementations.is_empty() {
		return Err(ConfigError::Validation(format!(
			"At least one {} implementation must be configured",
			section
		)));
	}
	if !implementations.contains_key(primary) {
		return Err(ConfigError::Validation(format!(
			"Primary {} '{}' not found in implementations",
			section, primary
		)));
	}
	Ok(())
}

/// Parses a TOML string, resolving environment variables and validating the
/// result.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
