//! Event types published while a transfer attempt progresses.
//!
//! The orchestrator publishes every state transition and balance read on an
//! event bus so that front-ends and logs can follow an attempt without polling
//! its state.

use crate::{ErrorKind, FlowStatus};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Main event type published by the transfer engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowEvent {
	/// The attempt entered a new state.
	StatusChanged {
		attempt: u64,
		status: FlowStatus,
		message: String,
	},
	/// The attempt failed.
	Failed {
		attempt: u64,
		kind: ErrorKind,
		message: String,
	},
	/// The relayer accepted the authorization.
	Submitted {
		attempt: u64,
		tx_hash: String,
		explorer_url: String,
	},
	/// A balance read completed.
	BalanceUpdated { holder: Address, balance: String },
	/// A balance read failed. Flow state is unaffected.
	BalanceRefreshFailed { holder: Address, error: String },
}
