//! Construction of domain-bound transfer authorizations.
//!
//! The builder combines user intent with live chain and token context into a
//! `TypedData` request: the signing domain names the token contract and the
//! network the signer is on, and the payload carries the scaled amount, a one
//! hour validity window and a fresh random nonce.

use crate::clock::Clock;
use gasless_token::TokenService;
use gasless_types::{
	check_decimal, generate_nonce, parse_units, Address, AmountError, AuthorizationPayload, SigningDomain,
	TypedData, VALIDITY_WINDOW_SECS,
};
use std::sync::Arc;
use thiserror::Error;

/// Errors produced while building an authorization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
	#[error("{0}")]
	InvalidRecipient(String),
	#[error(transparent)]
	InvalidAmount(#[from] AmountError),
	#[error("{0}")]
	MetadataUnavailable(String),
	#[error("{0}")]
	RandomUnavailable(String),
}

/// Builds authorization payloads and signing domains for one token.
pub struct AuthorizationBuilder {
	token: Arc<TokenService>,
	signing_version: String,
	clock: Arc<dyn Clock>,
}

impl AuthorizationBuilder {
	pub fn new(token: Arc<TokenService>, signing_version: String, clock: Arc<dyn Clock>) -> Self {
		Self {
			token,
			signing_version,
			clock,
		}
	}

	/// Builds the typed-data request for a transfer of `amount` from `from` to
	/// `to` on `chain_id`.
	///
	/// Token name and decimals are read from the contract on every call. The
	/// only side effects are those reads.
	pub async fn build(
		&self,
		from: Address,
		to: &str,
		amount: &str,
		chain_id: u64,
	) -> Result<TypedData, AuthorizationError> {
		let to = parse_recipient(to)?;

		let metadata = self
			.token
			.metadata()
			.await
			.map_err(|e| AuthorizationError::MetadataUnavailable(e.to_string()))?;

		let value = parse_units(amount, metadata.decimals)?;
		let nonce =
			generate_nonce().map_err(|e| AuthorizationError::RandomUnavailable(e.to_string()))?;

		let valid_after = self.clock.now();
		let payload = AuthorizationPayload {
			from,
			to,
			value,
			valid_after,
			valid_before: valid_after + VALIDITY_WINDOW_SECS,
			nonce,
		};
		let domain = SigningDomain {
			name: metadata.name,
			version: self.signing_version.clone(),
			chain_id,
			verifying_contract: self.token.address(),
		};

		tracing::debug!(
			to = %payload.to,
			value = %payload.value,
			valid_before = payload.valid_before,
			chain_id,
			"Built authorization"
		);
		Ok(TypedData::new(domain, payload))
	}
}

/// Checks the parts of an intent that need no wallet or token context: the
/// recipient address and the amount's decimal syntax.
///
/// Precision against the token's decimals is checked by `build`.
pub fn check_intent(to: &str, amount: &str) -> Result<Address, AuthorizationError> {
	let to = parse_recipient(to)?;
	check_decimal(amount)?;
	Ok(to)
}

fn parse_recipient(to: &str) -> Result<Address, AuthorizationError> {
	let to = to.trim();
	if to.is_empty() {
		return Err(AuthorizationError::InvalidRecipient(
			"recipient is empty".to_string(),
		));
	}
	to.parse::<Address>().map_err(|_| {
		AuthorizationError::InvalidRecipient(format!("'{}' is not a 20-byte hex address", to))
	})
}
