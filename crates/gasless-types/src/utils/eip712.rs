//! EIP-712 hashing for `TransferWithAuthorization` messages.
//!
//! These helpers provide:
//! - Type strings for the domain and the authorization struct
//! - Domain separator computation (name, version, chainId, verifyingContract)
//! - Struct hash of an authorization payload
//! - Final digest computation (0x1901 || domainHash || structHash)

use crate::AuthorizationPayload;
use alloy_primitives::{keccak256, Address, B256, U256};

pub const TRANSFER_WITH_AUTHORIZATION: &str = "TransferWithAuthorization";

/// Field list of the `EIP712Domain` type, in encoding order.
pub const DOMAIN_FIELDS: &[(&str, &str)] = &[
	("name", "string"),
	("version", "string"),
	("chainId", "uint256"),
	("verifyingContract", "address"),
];

/// Field list of the `TransferWithAuthorization` type, in encoding order.
pub const TRANSFER_WITH_AUTHORIZATION_FIELDS: &[(&str, &str)] = &[
	("from", "address"),
	("to", "address"),
	("value", "uint256"),
	("validAfter", "uint256"),
	("validBefore", "uint256"),
	("nonce", "bytes32"),
];

pub const DOMAIN_TYPE: &str =
	"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";
pub const TRANSFER_WITH_AUTHORIZATION_TYPE: &str = "TransferWithAuthorization(address from,address to,uint256 value,uint256 validAfter,uint256 validBefore,bytes32 nonce)";

/// Builds the EIP-712 `encodeType` string for a struct without nested types.
pub fn encode_type(name: &str, fields: &[(&str, &str)]) -> String {
	let members = fields
		.iter()
		.map(|(field, ty)| format!("{} {}", ty, field))
		.collect::<Vec<_>>()
		.join(",");
	format!("{}({})", name, members)
}

/// Compute the EIP-712 domain separator:
/// keccak256(abi.encode(typeHash, keccak(name), keccak(version), chainId, verifyingContract)).
pub fn compute_domain_hash(
	name: &str,
	version: &str,
	chain_id: u64,
	verifying_contract: &Address,
) -> B256 {
	let mut enc = Eip712AbiEncoder::new();
	enc.push_b256(&keccak256(DOMAIN_TYPE.as_bytes()));
	enc.push_b256(&keccak256(name.as_bytes()));
	enc.push_b256(&keccak256(version.as_bytes()));
	enc.push_u256(U256::from(chain_id));
	enc.push_address(verifying_contract);
	keccak256(enc.finish())
}

/// Compute the struct hash of a `TransferWithAuthorization` message.
pub fn compute_transfer_struct_hash(payload: &AuthorizationPayload) -> B256 {
	let mut enc = Eip712AbiEncoder::new();
	enc.push_b256(&keccak256(TRANSFER_WITH_AUTHORIZATION_TYPE.as_bytes()));
	enc.push_address(&payload.from);
	enc.push_address(&payload.to);
	enc.push_u256(payload.value);
	enc.push_u64(payload.valid_after);
	enc.push_u64(payload.valid_before);
	enc.push_b256(&payload.nonce);
	keccak256(enc.finish())
}

/// Compute the final EIP-712 digest: keccak256(0x1901 || domainHash || structHash).
pub fn compute_final_digest(domain_hash: &B256, struct_hash: &B256) -> B256 {
	let mut out = Vec::with_capacity(2 + 32 + 32);
	out.push(0x19);
	out.push(0x01);
	out.extend_from_slice(domain_hash.as_slice());
	out.extend_from_slice(struct_hash.as_slice());
	keccak256(out)
}

/// Minimal ABI encoder for the static word types used in struct hashing.
pub struct Eip712AbiEncoder {
	buf: Vec<u8>,
}

impl Default for Eip712AbiEncoder {
	fn default() -> Self {
		Self::new()
	}
}

impl Eip712AbiEncoder {
	pub fn new() -> Self {
		Self {
			buf: Vec::with_capacity(7 * 32),
		}
	}

	pub fn push_b256(&mut self, v: &B256) {
		self.buf.extend_from_slice(v.as_slice());
	}

	pub fn push_address(&mut self, addr: &Address) {
		let mut word = [0u8; 32];
		word[12..].copy_from_slice(addr.as_slice());
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u256(&mut self, v: U256) {
		let word: [u8; 32] = v.to_be_bytes::<32>();
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u64(&mut self, v: u64) {
		let mut word = [0u8; 32];
		word[24..].copy_from_slice(&v.to_be_bytes());
		self.buf.extend_from_slice(&word);
	}

	pub fn finish(self) -> Vec<u8> {
		self.buf
	}
}
