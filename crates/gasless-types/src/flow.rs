//! Flow states and error kinds of a transfer attempt.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a gasless transfer attempt.
///
/// An attempt moves `Idle -> ConnectingWallet -> PreparingAuthorization ->
/// AwaitingSignature -> SubmittingToRelayer -> Succeeded`, and may drop to
/// `Failed` from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FlowStatus {
	#[default]
	Idle,
	ConnectingWallet,
	PreparingAuthorization,
	AwaitingSignature,
	SubmittingToRelayer,
	Succeeded,
	Failed,
}

impl FlowStatus {
	/// Whether the attempt has reached an outcome.
	pub fn is_terminal(&self) -> bool {
		matches!(self, FlowStatus::Succeeded | FlowStatus::Failed)
	}

	/// Whether an attempt is currently running. New attempts are refused while
	/// this holds.
	pub fn is_in_flight(&self) -> bool {
		!self.is_terminal() && *self != FlowStatus::Idle
	}

	/// Default status line shown for the state.
	pub fn describe(&self) -> &'static str {
		match self {
			FlowStatus::Idle => "Ready",
			FlowStatus::ConnectingWallet => "Connecting wallet...",
			FlowStatus::PreparingAuthorization => "Preparing authorization...",
			FlowStatus::AwaitingSignature => "Waiting for signature in wallet...",
			FlowStatus::SubmittingToRelayer => "Submitting to relayer...",
			FlowStatus::Succeeded => "Transfer submitted",
			FlowStatus::Failed => "Transfer failed",
		}
	}
}

impl fmt::Display for FlowStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			FlowStatus::Idle => "idle",
			FlowStatus::ConnectingWallet => "connecting_wallet",
			FlowStatus::PreparingAuthorization => "preparing_authorization",
			FlowStatus::AwaitingSignature => "awaiting_signature",
			FlowStatus::SubmittingToRelayer => "submitting_to_relayer",
			FlowStatus::Succeeded => "succeeded",
			FlowStatus::Failed => "failed",
		};
		f.write_str(name)
	}
}

/// Tag identifying why an attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
	MissingInput,
	InvalidRecipient,
	InvalidAmount,
	WalletUnavailable,
	AccessDenied,
	MetadataUnavailable,
	SignatureDenied,
	RelayerRejected,
	NetworkError,
	UnknownFailure,
	AttemptInProgress,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_terminal_and_in_flight() {
		assert!(!FlowStatus::Idle.is_terminal());
		assert!(!FlowStatus::Idle.is_in_flight());
		assert!(FlowStatus::AwaitingSignature.is_in_flight());
		assert!(FlowStatus::Succeeded.is_terminal());
		assert!(FlowStatus::Failed.is_terminal());
		assert!(!FlowStatus::Failed.is_in_flight());
	}

	#[test]
	fn test_display_is_snake_case() {
		assert_eq!(FlowStatus::SubmittingToRelayer.to_string(), "submitting_to_relayer");
		assert_eq!(FlowStatus::default(), FlowStatus::Idle);
	}
}
