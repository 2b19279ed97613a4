//! Utility functions for hashing, amount conversion and formatting.

pub mod conversion;
pub mod eip712;
pub mod formatting;
pub mod helpers;

pub use conversion::{check_decimal, format_units, parse_units, AmountError};
pub use eip712::{
	compute_domain_hash, compute_final_digest, compute_transfer_struct_hash, encode_type,
	Eip712AbiEncoder, DOMAIN_FIELDS, DOMAIN_TYPE, TRANSFER_WITH_AUTHORIZATION,
	TRANSFER_WITH_AUTHORIZATION_FIELDS, TRANSFER_WITH_AUTHORIZATION_TYPE,
};
pub use formatting::{format_token_amount, truncate_id, with_0x_prefix};
pub use helpers::current_timestamp;
