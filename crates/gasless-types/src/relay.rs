//! Wire types of the relayer submission interface.
//!
//! `POST <relayer-base>/relay-transfer` takes the signed authorization as
//! `{ payload, v, r, s }`. A success status returns `{ txHash }`; any other
//! status returns `{ error }` with a message meant for the user.

use crate::{AuthorizationPayload, Signature};
use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// Path of the relay endpoint below the relayer base URL.
pub const RELAY_TRANSFER_PATH: &str = "relay-transfer";

/// Request body of `POST /relay-transfer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayTransferRequest {
	pub payload: AuthorizationPayload,
	pub v: u8,
	pub r: B256,
	pub s: B256,
}

impl RelayTransferRequest {
	pub fn new(payload: AuthorizationPayload, signature: &Signature) -> Self {
		Self {
			payload,
			v: signature.v,
			r: signature.r,
			s: signature.s,
		}
	}
}

/// Body returned with a success status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelaySuccessResponse {
	pub tx_hash: String,
}

/// Body returned with a failure status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayErrorResponse {
	pub error: String,
}
