//! Core transfer engine for the gasless transfer client.
//!
//! Turns a transfer intent (recipient, decimal amount) into a signed,
//! time-bounded `transferWithAuthorization` message and hands it to the
//! relayer, tracking the attempt through an explicit state machine. Wallet,
//! token and relayer are reached through their service wrappers so that the
//! engine can be driven by any implementation, including test doubles.

pub mod authorization;
pub mod builder;
pub mod clock;
pub mod engine;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use authorization::{AuthorizationBuilder, AuthorizationError};
pub use builder::{BuilderError, EngineBuilder, EngineFactories};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{
	event_bus::EventBus, refresh::BalanceRefresher, TransferEngine, TransferIntent,
	TransferReceipt,
};
pub use state::{FlowState, FlowStateError, FlowStateMachine};

use gasless_account::WalletError;
use gasless_relayer::RelayerError;
use gasless_types::ErrorKind;
use thiserror::Error;

/// Reasons a transfer attempt ends in `Failed`.
///
/// Every collaborator failure is mapped to exactly one variant at the engine
/// boundary. The display text is what the user sees as the failure status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
	#[error("Recipient and amount are required")]
	MissingInput,
	#[error("Invalid recipient: {0}")]
	InvalidRecipient(String),
	#[error("Invalid amount: {0}")]
	InvalidAmount(String),
	#[error("Wallet unavailable: {0}")]
	WalletUnavailable(String),
	#[error("Account access denied: {0}")]
	AccessDenied(String),
	#[error("Token metadata unavailable: {0}")]
	MetadataUnavailable(String),
	#[error("Signature request denied: {0}")]
	SignatureDenied(String),
	/// Relayer message, shown verbatim.
	#[error("{0}")]
	RelayerRejected(String),
	#[error("Network error: {0}")]
	NetworkError(String),
	#[error("Unexpected failure: {0}")]
	UnknownFailure(String),
	#[error("Another transfer attempt is in progress")]
	AttemptInProgress,
}

impl TransferError {
	/// Tag of this error, for events and assertions.
	pub fn kind(&self) -> ErrorKind {
		match self {
			TransferError::MissingInput => ErrorKind::MissingInput,
			TransferError::InvalidRecipient(_) => ErrorKind::InvalidRecipient,
			TransferError::InvalidAmount(_) => ErrorKind::InvalidAmount,
			TransferError::WalletUnavailable(_) => ErrorKind::WalletUnavailable,
			TransferError::AccessDenied(_) => ErrorKind::AccessDenied,
			TransferError::MetadataUnavailable(_) => ErrorKind::MetadataUnavailable,
			TransferError::SignatureDenied(_) => ErrorKind::SignatureDenied,
			TransferError::RelayerRejected(_) => ErrorKind::RelayerRejected,
			TransferError::NetworkError(_) => ErrorKind::NetworkError,
			TransferError::UnknownFailure(_) => ErrorKind::UnknownFailure,
			TransferError::AttemptInProgress => ErrorKind::AttemptInProgress,
		}
	}
}

impl From<WalletError> for TransferError {
	fn from(err: WalletError) -> Self {
		match err {
			WalletError::Unavailable(m) | WalletError::InvalidKey(m) => {
				TransferError::WalletUnavailable(m)
			},
			WalletError::AccessDenied(m) => TransferError::AccessDenied(m),
			WalletError::SignatureDenied(m) => TransferError::SignatureDenied(m),
			WalletError::Network(m) => TransferError::NetworkError(m),
			WalletError::Implementation(m) => TransferError::UnknownFailure(m),
		}
	}
}

impl From<RelayerError> for TransferError {
	fn from(err: RelayerError) -> Self {
		match err {
			RelayerError::Rejected(m) => TransferError::RelayerRejected(m),
			RelayerError::Network(m) => TransferError::NetworkError(m),
			RelayerError::InvalidResponse(m) | RelayerError::Implementation(m) => {
				TransferError::UnknownFailure(m)
			},
		}
	}
}

impl From<AuthorizationError> for TransferError {
	fn from(err: AuthorizationError) -> Self {
		match err {
			AuthorizationError::InvalidRecipient(m) => TransferError::InvalidRecipient(m),
			AuthorizationError::InvalidAmount(e) => TransferError::InvalidAmount(e.to_string()),
			AuthorizationError::MetadataUnavailable(m) => TransferError::MetadataUnavailable(m),
			AuthorizationError::RandomUnavailable(m) => TransferError::UnknownFailure(m),
		}
	}
}

impl From<FlowStateError> for TransferError {
	fn from(err: FlowStateError) -> Self {
		TransferError::UnknownFailure(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_relayer_message_displayed_verbatim() {
		let err = TransferError::from(RelayerError::Rejected("nonce already used".into()));
		assert_eq!(err.kind(), ErrorKind::RelayerRejected);
		assert_eq!(err.to_string(), "nonce already used");
	}

	#[test]
	fn test_collaborator_errors_map_to_one_kind() {
		let cases = [
			(
				TransferError::from(WalletError::AccessDenied("no".into())),
				ErrorKind::AccessDenied,
			),
			(
				TransferError::from(WalletError::SignatureDenied("no".into())),
				ErrorKind::SignatureDenied,
			),
			(
				TransferError::from(WalletError::Unavailable("none".into())),
				ErrorKind::WalletUnavailable,
			),
			(
				TransferError::from(RelayerError::Network("timeout".into())),
				ErrorKind::NetworkError,
			),
			(
				TransferError::from(RelayerError::InvalidResponse("no txHash".into())),
				ErrorKind::UnknownFailure,
			),
		];
		for (err, kind) in cases {
			assert_eq!(err.kind(), kind);
		}
	}
}
