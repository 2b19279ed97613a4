//! Balance reads that run beside the transfer flow.
//!
//! Reads are spawned as tokio tasks: one right after the wallet is connected
//! and one a fixed delay after a successful submission, giving the relayer's
//! transaction time to land. A failed read is logged and published but never
//! changes the flow status.

use crate::engine::event_bus::EventBus;
use crate::state::FlowStateMachine;
use gasless_token::TokenService;
use gasless_types::{Address, FlowEvent};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Spawns and tracks balance reads for the engine.
pub struct BalanceRefresher {
	token: Arc<TokenService>,
	state: Arc<FlowStateMachine>,
	event_bus: EventBus,
	tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl BalanceRefresher {
	pub fn new(token: Arc<TokenService>, state: Arc<FlowStateMachine>, event_bus: EventBus) -> Self {
		Self {
			token,
			state,
			event_bus,
			tasks: Mutex::new(Vec::new()),
		}
	}

	/// Reads the balance of `holder` once, `delay` after this call.
	pub fn schedule(&self, holder: Address, delay: Duration) {
		let token = self.token.clone();
		let state = self.state.clone();
		let event_bus = self.event_bus.clone();
		let deadline = Instant::now() + delay;

		let handle = tokio::spawn(async move {
			if !delay.is_zero() {
				tokio::time::sleep_until(deadline).await;
			}
			refresh(&token, &state, &event_bus, holder).await;
		});

		if let Ok(mut tasks) = self.tasks.lock() {
			tasks.retain(|task| !task.is_finished());
			tasks.push(handle);
		}
	}

	/// Number of reads that have not completed yet.
	pub fn pending(&self) -> usize {
		self.tasks
			.lock()
			.map(|tasks| tasks.iter().filter(|task| !task.is_finished()).count())
			.unwrap_or(0)
	}

	/// Cancels reads that have not completed yet.
	pub fn abort_all(&self) {
		if let Ok(mut tasks) = self.tasks.lock() {
			for task in tasks.drain(..) {
				task.abort();
			}
		}
	}
}

impl Drop for BalanceRefresher {
	fn drop(&mut self) {
		self.abort_all();
	}
}

async fn refresh(
	token: &TokenService,
	state: &FlowStateMachine,
	event_bus: &EventBus,
	holder: Address,
) {
	match token.formatted_balance(holder).await {
		Ok(balance) => {
			tracing::debug!(holder = %holder, balance = %balance, "Balance refreshed");
			state.set_balance(balance.clone()).await;
			event_bus
				.publish(FlowEvent::BalanceUpdated { holder, balance })
				.ok();
		},
		Err(e) => {
			tracing::warn!(holder = %holder, error = %e, "Balance refresh failed");
			event_bus
				.publish(FlowEvent::BalanceRefreshFailed {
					holder,
					error: e.to_string(),
				})
				.ok();
		},
	}
}
