//! Common types module for the gasless transfer client.
//!
//! This module defines the core data types shared by every component of the
//! client: the authorization payload and its signing domain, signatures, flow
//! states and events, relayer wire types and the configuration validation
//! framework used by pluggable implementations.

/// Authorization payload, signing domain, signature and typed-data types.
pub mod authorization;
/// Block-explorer link derivation.
pub mod explorer;
/// Event types published while a transfer attempt progresses.
pub mod events;
/// Flow states and error kinds of a transfer attempt.
pub mod flow;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Wire types of the relayer submission interface.
pub mod relay;
/// Secure string type for private keys.
pub mod secret_string;
/// Utility functions for hashing, conversion and formatting.
pub mod utils;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

pub use alloy_primitives::{Address, B256, U256};
pub use authorization::*;
pub use events::*;
pub use explorer::{explorer_tx_url, ExplorerConfig, DEFAULT_EXPLORER_URL};
pub use flow::{ErrorKind, FlowStatus};
pub use registry::ImplementationRegistry;
pub use relay::*;
pub use secret_string::SecretString;
pub use utils::{
	check_decimal, format_token_amount, format_units, parse_units, truncate_id, with_0x_prefix,
	AmountError,
};
pub use validation::*;
