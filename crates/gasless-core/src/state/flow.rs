//! Transfer flow state machine.
//!
//! An attempt moves `Idle -> ConnectingWallet -> PreparingAuthorization ->
//! AwaitingSignature -> SubmittingToRelayer -> Succeeded` and may drop to
//! `Failed` from any non-terminal state. Starting a new attempt resets the
//! state to `Idle`.

use crate::engine::event_bus::EventBus;
use gasless_types::{Address, ErrorKind, FlowEvent, FlowStatus};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors that can occur during flow state management.
#[derive(Debug, Error)]
pub enum FlowStateError {
	#[error("Invalid state transition from {from} to {to}")]
	InvalidTransition { from: FlowStatus, to: FlowStatus },
}

/// Client-visible state of the current or last attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowState {
	/// Sequence number of the attempt, starting at 1.
	pub attempt: u64,
	pub status: FlowStatus,
	/// Status text for display.
	pub message: Option<String>,
	/// Transaction hash returned by the relayer.
	pub tx_hash: Option<String>,
	/// Explorer link of `tx_hash`.
	pub explorer_url: Option<String>,
	/// Signer resolved when the wallet was connected.
	pub signer: Option<Address>,
	/// Network id resolved when the wallet was connected.
	pub chain_id: Option<u64>,
	/// Last formatted balance of the signer.
	pub balance: Option<String>,
	/// Kind of the failure, once `Failed`.
	pub error: Option<ErrorKind>,
}

/// Owns the flow state and publishes its changes.
pub struct FlowStateMachine {
	state: RwLock<FlowState>,
	event_bus: EventBus,
}

impl FlowStateMachine {
	pub fn new(event_bus: EventBus) -> Self {
		Self {
			state: RwLock::new(FlowState::default()),
			event_bus,
		}
	}

	/// Returns a copy of the current state.
	pub async fn snapshot(&self) -> FlowState {
		self.state.read().await.clone()
	}

	/// Resets the state for a new attempt and returns its sequence number.
	///
	/// The balance survives the reset since it belongs to the holder rather
	/// than to the attempt.
	pub async fn begin_attempt(&self) -> u64 {
		let mut state = self.state.write().await;
		let attempt = state.attempt + 1;
		*state = FlowState {
			attempt,
			balance: state.balance.take(),
			..FlowState::default()
		};
		attempt
	}

	/// Moves to `to` with the default status text of that state.
	pub async fn transition(&self, to: FlowStatus) -> Result<(), FlowStateError> {
		self.transition_with(to, to.describe().to_string()).await
	}

	/// Moves to `to` with the given status text.
	pub async fn transition_with(
		&self,
		to: FlowStatus,
		message: String,
	) -> Result<(), FlowStateError> {
		let attempt = {
			let mut state = self.state.write().await;
			if !Self::is_valid_transition(&state.status, &to) {
				return Err(FlowStateError::InvalidTransition {
					from: state.status,
					to,
				});
			}
			state.status = to;
			state.message = Some(message.clone());
			state.attempt
		};

		tracing::info!(attempt, state = %to, "{}", message);
		self.event_bus
			.publish(FlowEvent::StatusChanged {
				attempt,
				status: to,
				message,
			})
			.ok();
		Ok(())
	}

	/// Records the signer and network resolved for this attempt.
	pub async fn set_connection(&self, signer: Address, chain_id: u64) {
		let mut state = self.state.write().await;
		state.signer = Some(signer);
		state.chain_id = Some(chain_id);
	}

	/// Moves to `Succeeded` and records the relayer's transaction.
	pub async fn succeed(&self, tx_hash: String, explorer_url: String) -> Result<(), FlowStateError> {
		{
			let mut state = self.state.write().await;
			state.tx_hash = Some(tx_hash.clone());
			state.explorer_url = Some(explorer_url.clone());
		}
		self.transition_with(
			FlowStatus::Succeeded,
			format!("Transfer submitted: {}", tx_hash),
		)
		.await?;

		let attempt = self.state.read().await.attempt;
		self.event_bus
			.publish(FlowEvent::Submitted {
				attempt,
				tx_hash,
				explorer_url,
			})
			.ok();
		Ok(())
	}

	/// Moves to `Failed` with the failure's display text.
	///
	/// Has no effect if the attempt already ended.
	pub async fn fail(&self, kind: ErrorKind, message: String) {
		let attempt = {
			let mut state = self.state.write().await;
			if state.status.is_terminal() {
				return;
			}
			state.status = FlowStatus::Failed;
			state.message = Some(message.clone());
			state.error = Some(kind);
			state.attempt
		};

		tracing::warn!(attempt, kind = ?kind, error = %message, "Transfer failed");
		self.event_bus
			.publish(FlowEvent::StatusChanged {
				attempt,
				status: FlowStatus::Failed,
				message: message.clone(),
			})
			.ok();
		self.event_bus
			.publish(FlowEvent::Failed {
				attempt,
				kind,
				message,
			})
			.ok();
	}

	/// Stores a freshly read balance. Last write wins.
	pub async fn set_balance(&self, balance: String) {
		self.state.write().await.balance = Some(balance);
	}

	/// Checks if a state transition is valid
	fn is_valid_transition(from: &FlowStatus, to: &FlowStatus) -> bool {
		static TRANSITIONS: Lazy<HashMap<FlowStatus, HashSet<FlowStatus>>> = Lazy::new(|| {
			let mut m = HashMap::new();
			m.insert(
				FlowStatus::Idle,
				HashSet::from([FlowStatus::ConnectingWallet, FlowStatus::Failed]),
			);
			m.insert(
				FlowStatus::ConnectingWallet,
				HashSet::from([FlowStatus::PreparingAuthorization, FlowStatus::Failed]),
			);
			m.insert(
				FlowStatus::PreparingAuthorization,
				HashSet::from([FlowStatus::AwaitingSignature, FlowStatus::Failed]),
			);
			m.insert(
				FlowStatus::AwaitingSignature,
				HashSet::from([FlowStatus::SubmittingToRelayer, FlowStatus::Failed]),
			);
			m.insert(
				FlowStatus::SubmittingToRelayer,
				HashSet::from([FlowStatus::Succeeded, FlowStatus::Failed]),
			);
			m.insert(FlowStatus::Succeeded, HashSet::new()); // terminal
			m.insert(FlowStatus::Failed, HashSet::new()); // terminal
			m
		});

		TRANSITIONS
			.get(from)
			.is_some_and(|set| set.contains(to))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn machine() -> FlowStateMachine {
		FlowStateMachine::new(EventBus::new(16))
	}

	#[test]
	fn test_transition_table() {
		use FlowStatus::*;

		let path = [
			Idle,
			ConnectingWallet,
			PreparingAuthorization,
			AwaitingSignature,
			SubmittingToRelayer,
			Succeeded,
		];
		for pair in path.windows(2) {
			assert!(FlowStateMachine::is_valid_transition(&pair[0], &pair[1]));
		}
		for state in &path[..5] {
			assert!(FlowStateMachine::is_valid_transition(state, &Failed));
		}

		assert!(!FlowStateMachine::is_valid_transition(&Idle, &AwaitingSignature));
		assert!(!FlowStateMachine::is_valid_transition(&AwaitingSignature, &PreparingAuthorization));
		assert!(!FlowStateMachine::is_valid_transition(&Succeeded, &Failed));
		assert!(!FlowStateMachine::is_valid_transition(&Failed, &Idle));
	}

	#[tokio::test]
	async fn test_invalid_transition_rejected() {
		let machine = machine();
		machine.begin_attempt().await;

		let err = machine
			.transition(FlowStatus::SubmittingToRelayer)
			.await
			.unwrap_err();
		assert!(err.to_string().contains("idle"));
		assert_eq!(machine.snapshot().await.status, FlowStatus::Idle);
	}

	#[tokio::test]
	async fn test_events_published_in_order() {
		let bus = EventBus::new(16);
		let mut rx = bus.subscribe();
		let machine = FlowStateMachine::new(bus);

		let attempt = machine.begin_attempt().await;
		machine.transition(FlowStatus::ConnectingWallet).await.unwrap();
		machine
			.fail(ErrorKind::AccessDenied, "denied".to_string())
			.await;

		assert_eq!(
			rx.recv().await.unwrap(),
			FlowEvent::StatusChanged {
				attempt,
				status: FlowStatus::ConnectingWallet,
				message: "Connecting wallet...".to_string(),
			}
		);
		assert!(matches!(
			rx.recv().await.unwrap(),
			FlowEvent::StatusChanged { status: FlowStatus::Failed, .. }
		));
		assert_eq!(
			rx.recv().await.unwrap(),
			FlowEvent::Failed {
				attempt,
				kind: ErrorKind::AccessDenied,
				message: "denied".to_string(),
			}
		);
	}

	#[tokio::test]
	async fn test_begin_attempt_resets_but_keeps_balance() {
		let machine = machine();
		machine.begin_attempt().await;
		machine.set_connection(Address::repeat_byte(1), 1).await;
		machine.set_balance("10".to_string()).await;
		machine.fail(ErrorKind::MissingInput, "missing".into()).await;

		let second = machine.begin_attempt().await;
		let state = machine.snapshot().await;
		assert_eq!(second, 2);
		assert_eq!(state.status, FlowStatus::Idle);
		assert_eq!(state.error, None);
		assert_eq!(state.signer, None);
		assert_eq!(state.balance.as_deref(), Some("10"));
	}

	#[tokio::test]
	async fn test_fail_after_terminal_is_ignored() {
		let machine = machine();
		machine.begin_attempt().await;
		machine.fail(ErrorKind::MissingInput, "first".into()).await;
		machine.fail(ErrorKind::NetworkError, "second".into()).await;

		let state = machine.snapshot().await;
		assert_eq!(state.error, Some(ErrorKind::MissingInput));
		assert_eq!(state.message.as_deref(), Some("first"));
	}
}
