//! Authorization payload and signing domain for gasless transfers.
//!
//! A holder authorizes a transfer by signing a `TransferWithAuthorization`
//! message under an EIP-712 domain that names the token contract and the
//! network. The relayer later submits the message and signature on-chain.

use crate::utils::eip712::{
	compute_domain_hash, compute_final_digest, compute_transfer_struct_hash, DOMAIN_FIELDS,
	TRANSFER_WITH_AUTHORIZATION, TRANSFER_WITH_AUTHORIZATION_FIELDS,
};
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Length of the validity window in seconds (`validBefore - validAfter`).
pub const VALIDITY_WINDOW_SECS: u64 = 3600;

/// Default EIP-712 domain version of `transferWithAuthorization` tokens.
pub const DEFAULT_SIGNING_VERSION: &str = "2";

/// The message a holder signs to authorize a transfer.
///
/// `value` is serialized as a decimal-integer string, addresses and the nonce
/// as 0x-prefixed hex, and the validity bounds as JSON integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationPayload {
	/// Address of the authorizing holder.
	pub from: Address,
	/// Address of the recipient.
	pub to: Address,
	/// Amount in the token's smallest unit.
	#[serde(with = "decimal_u256")]
	pub value: U256,
	/// Earliest unix timestamp (seconds) at which the authorization is usable.
	pub valid_after: u64,
	/// Latest unix timestamp at which the authorization is usable.
	pub valid_before: u64,
	/// Random single-use replay-protection key.
	pub nonce: B256,
}

impl AuthorizationPayload {
	/// EIP-712 struct hash of this message.
	pub fn struct_hash(&self) -> B256 {
		compute_transfer_struct_hash(self)
	}
}

/// EIP-712 domain binding a signature to one token deployment on one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningDomain {
	/// On-chain token name.
	pub name: String,
	/// Signing scheme revision.
	pub version: String,
	/// Network the signer was connected to when the domain was captured.
	pub chain_id: u64,
	/// Token contract address.
	pub verifying_contract: Address,
}

impl SigningDomain {
	/// EIP-712 domain separator.
	pub fn separator(&self) -> B256 {
		compute_domain_hash(
			&self.name,
			&self.version,
			self.chain_id,
			&self.verifying_contract,
		)
	}
}

/// Errors produced when decoding a signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
	#[error("Signature must be 65 bytes, got {0}")]
	InvalidLength(usize),
	#[error("Invalid recovery id: {0}")]
	InvalidRecoveryId(u8),
}

/// ECDSA signature split into the `(v, r, s)` components the relayer expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
	/// Recovery id, always 27 or 28.
	pub v: u8,
	pub r: B256,
	pub s: B256,
}

impl Signature {
	/// Decodes a 65-byte `r || s || v` signature. A `v` of 0 or 1 is
	/// normalised to 27 or 28.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
		if bytes.len() != 65 {
			return Err(SignatureError::InvalidLength(bytes.len()));
		}
		let v = match bytes[64] {
			0 | 1 => bytes[64] + 27,
			27 | 28 => bytes[64],
			other => return Err(SignatureError::InvalidRecoveryId(other)),
		};
		Ok(Self {
			v,
			r: B256::from_slice(&bytes[..32]),
			s: B256::from_slice(&bytes[32..64]),
		})
	}

	/// Encodes as 65 bytes `r || s || v`.
	pub fn to_bytes(&self) -> [u8; 65] {
		let mut out = [0u8; 65];
		out[..32].copy_from_slice(self.r.as_slice());
		out[32..64].copy_from_slice(self.s.as_slice());
		out[64] = self.v;
		out
	}
}

/// Errors produced when drawing a nonce from the OS random source.
#[derive(Debug, Error)]
#[error("Secure random source unavailable: {0}")]
pub struct NonceError(String);

/// Draws a fresh 32-byte authorization nonce from the operating system's
/// cryptographically secure random source.
pub fn generate_nonce() -> Result<B256, NonceError> {
	let mut bytes = [0u8; 32];
	getrandom::getrandom(&mut bytes).map_err(|e| NonceError(e.to_string()))?;
	Ok(B256::from(bytes))
}

/// Structured data handed to a wallet for signing: domain, type schema and
/// message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedData {
	pub domain: SigningDomain,
	pub message: AuthorizationPayload,
}

impl TypedData {
	pub fn new(domain: SigningDomain, message: AuthorizationPayload) -> Self {
		Self { domain, message }
	}

	pub fn primary_type(&self) -> &'static str {
		TRANSFER_WITH_AUTHORIZATION
	}

	/// The EIP-712 digest a wallet signs.
	pub fn signing_hash(&self) -> B256 {
		compute_final_digest(&self.domain.separator(), &self.message.struct_hash())
	}

	/// Renders the request in the `eth_signTypedData_v4` JSON shape.
	pub fn to_eip712_json(&self) -> serde_json::Value {
		let fields = |list: &[(&str, &str)]| {
			list.iter()
				.map(|(name, ty)| json!({ "name": name, "type": ty }))
				.collect::<Vec<_>>()
		};

		json!({
			"types": {
				"EIP712Domain": fields(DOMAIN_FIELDS),
				TRANSFER_WITH_AUTHORIZATION: fields(TRANSFER_WITH_AUTHORIZATION_FIELDS),
			},
			"primaryType": self.primary_type(),
			"domain": self.domain,
			"message": self.message,
		})
	}
}

/// Serde adapter writing a `U256` as a decimal-integer string.
pub mod decimal_u256 {
	use alloy_primitives::U256;
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.collect_str(value)
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		U256::from_str_radix(&s, 10).map_err(serde::de::Error::custom)
	}
}
