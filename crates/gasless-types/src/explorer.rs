//! Block-explorer link derivation.
//!
//! Maps a chain id and transaction hash to a human-facing explorer URL. Known
//! networks use their canonical explorer; anything else falls back to a
//! default base, which configuration can override per chain.

use crate::utils::with_0x_prefix;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

pub const DEFAULT_EXPLORER_URL: &str = "https://etherscan.io";

fn known_explorer(chain_id: u64) -> Option<&'static str> {
	let url = match chain_id {
		1 => "https://etherscan.io",
		11155111 => "https://sepolia.etherscan.io",
		8453 => "https://basescan.org",
		84532 => "https://sepolia.basescan.org",
		137 => "https://polygonscan.com",
		80002 => "https://amoy.polygonscan.com",
		42161 => "https://arbiscan.io",
		421614 => "https://sepolia.arbiscan.io",
		10 => "https://optimistic.etherscan.io",
		11155420 => "https://sepolia-optimism.etherscan.io",
		43114 => "https://snowtrace.io",
		43113 => "https://testnet.snowtrace.io",
		_ => return None,
	};
	Some(url)
}

/// Explorer settings: fallback base URL and per-chain overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerConfig {
	/// Base URL used for chains without a known or overridden explorer.
	#[serde(default = "default_explorer_url")]
	pub default_url: String,
	/// Per-chain base URL overrides, keyed by chain id.
	#[serde(default, deserialize_with = "deserialize_chain_map")]
	pub overrides: HashMap<u64, String>,
}

fn default_explorer_url() -> String {
	DEFAULT_EXPLORER_URL.to_string()
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			default_url: default_explorer_url(),
			overrides: HashMap::new(),
		}
	}
}

impl ExplorerConfig {
	/// Base explorer URL for a chain.
	pub fn base_url(&self, chain_id: u64) -> &str {
		self.overrides
			.get(&chain_id)
			.map(String::as_str)
			.or_else(|| known_explorer(chain_id))
			.unwrap_or(&self.default_url)
	}

	/// Explorer URL of a transaction.
	pub fn tx_url(&self, chain_id: u64, tx_hash: &str) -> String {
		format!(
			"{}/tx/{}",
			self.base_url(chain_id).trim_end_matches('/'),
			with_0x_prefix(tx_hash)
		)
	}
}

/// Explorer URL of a transaction using the built-in explorer table.
pub fn explorer_tx_url(chain_id: u64, tx_hash: &str) -> String {
	ExplorerConfig::default().tx_url(chain_id, tx_hash)
}

/// Deserializes a table keyed by chain id. TOML table keys are always
/// strings, so each key is parsed as a u64.
pub fn deserialize_chain_map<'de, D>(deserializer: D) -> Result<HashMap<u64, String>, D::Error>
where
	D: Deserializer<'de>,
{
	let string_map: HashMap<String, String> = HashMap::deserialize(deserializer)?;
	let mut result = HashMap::new();

	for (key, value) in string_map {
		let chain_id = key
			.parse::<u64>()
			.map_err(|e| serde::de::Error::custom(format!("Invalid chain_id '{}': {}", key, e)))?;
		result.insert(chain_id, value);
	}

	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_known_chains() {
		assert_eq!(
			explorer_tx_url(84532, "0xdead"),
			"https://sepolia.basescan.org/tx/0xdead"
		);
		assert_eq!(explorer_tx_url(1, "beef"), "https://etherscan.io/tx/0xbeef");
	}

	#[test]
	fn test_unknown_chain_falls_back_to_default() {
		assert_eq!(
			explorer_tx_url(999_999, "0xdead"),
			format!("{}/tx/0xdead", DEFAULT_EXPLORER_URL)
		);
	}

	#[test]
	fn test_overrides_from_toml() {
		let config: ExplorerConfig = toml::from_str(
			r#"
default_url = "https://explorer.example/"
[overrides]
"31337" = "http://localhost:5100/"
"84532" = "https://base-sepolia.blockscout.com"
"#,
		)
		.unwrap();

		assert_eq!(config.tx_url(31337, "0x01"), "http://localhost:5100/tx/0x01");
		assert_eq!(
			config.tx_url(84532, "0x01"),
			"https://base-sepolia.blockscout.com/tx/0x01"
		);
		assert_eq!(config.tx_url(7, "0x01"), "https://explorer.example/tx/0x01");
		assert_eq!(config.tx_url(1, "0x01"), "https://etherscan.io/tx/0x01");
	}

	#[test]
	fn test_invalid_override_key_rejected() {
		let result: Result<ExplorerConfig, _> = toml::from_str("[overrides]\nmainnet = \"x\"");
		assert!(result.is_err());
	}
}
