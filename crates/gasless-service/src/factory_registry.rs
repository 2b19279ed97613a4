//! Registry of the wallet, token and relayer implementations compiled into
//! the binary.
//!
//! Each collaborator crate lists its implementations through
//! `get_all_implementations`; the registry collects them once and hands the
//! ones named in the configuration to the engine builder.

use gasless_account::WalletFactory;
use gasless_config::Config;
use gasless_core::{EngineBuilder, EngineFactories, TransferEngine};
use gasless_relayer::RelayerFactory;
use gasless_token::TokenFactory;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Factories of every known implementation, keyed by name.
pub struct FactoryRegistry {
	pub wallet: HashMap<String, WalletFactory>,
	pub token: HashMap<String, TokenFactory>,
	pub relayer: HashMap<String, RelayerFactory>,
}

impl FactoryRegistry {
	pub fn new() -> Self {
		Self {
			wallet: HashMap::new(),
			token: HashMap::new(),
			relayer: HashMap::new(),
		}
	}
}

impl Default for FactoryRegistry {
	fn default() -> Self {
		Self::new()
	}
}

static REGISTRY: OnceLock<FactoryRegistry> = OnceLock::new();

/// Returns the registry, filling it on first use.
pub fn get_registry() -> &'static FactoryRegistry {
	REGISTRY.get_or_init(|| {
		let mut registry = FactoryRegistry::new();

		for (name, factory) in gasless_account::get_all_implementations() {
			tracing::debug!("Registering wallet implementation: {}", name);
			registry.wallet.insert(name.to_string(), factory);
		}

		for (name, factory) in gasless_token::get_all_implementations() {
			tracing::debug!("Registering token implementation: {}", name);
			registry.token.insert(name.to_string(), factory);
		}

		for (name, factory) in gasless_relayer::get_all_implementations() {
			tracing::debug!("Registering relayer implementation: {}", name);
			registry.relayer.insert(name.to_string(), factory);
		}

		registry
	})
}

/// Picks the factories of the implementations named in a config section.
macro_rules! build_factories {
	($registry:expr, $config_impls:expr, $registry_field:ident, $type_name:literal) => {{
		let mut factories = HashMap::new();
		for name in $config_impls.keys() {
			if let Some(factory) = $registry.$registry_field.get(name) {
				factories.insert(name.clone(), *factory);
			} else {
				let mut available: Vec<_> = $registry.$registry_field.keys().cloned().collect();
				available.sort();
				return Err(format!(
					"Unknown {} implementation '{}'. Available: [{}]",
					$type_name,
					name,
					available.join(", ")
				)
				.into());
			}
		}
		factories
	}};
}

/// Builds the transfer engine from the implementations the config names.
pub fn build_engine_from_config(
	config: Config,
) -> Result<TransferEngine, Box<dyn std::error::Error>> {
	let registry = get_registry();

	let wallet_factories = build_factories!(registry, config.wallet.implementations, wallet, "wallet");
	let token_factories = build_factories!(registry, config.token.implementations, token, "token");
	let relayer_factories = build_factories!(
		registry,
		config.relayer.implementations,
		relayer,
		"relayer"
	);

	let engine = EngineBuilder::new(config).build(EngineFactories {
		wallet_factories,
		token_factories,
		relayer_factories,
	})?;

	Ok(engine)
}
