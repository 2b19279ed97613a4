//! Transfer orchestrator.
//!
//! `TransferEngine` drives one attempt at a time from intent to relayer
//! submission: it connects the wallet, has the authorization built and
//! signed, posts it to the relayer exactly once and then schedules a delayed
//! balance refresh. Every failure ends the attempt in `Failed` with a single
//! `TransferError`.

pub mod event_bus;
pub mod refresh;

use crate::authorization::{check_intent, AuthorizationBuilder};
use crate::state::{FlowState, FlowStateMachine};
use crate::TransferError;
use event_bus::EventBus;
use gasless_account::{WalletError, WalletService};
use gasless_relayer::RelayerService;
use gasless_token::TokenService;
use gasless_types::{
	truncate_id, AuthorizationPayload, ExplorerConfig, FlowEvent, FlowStatus, RelayTransferRequest,
};
use refresh::BalanceRefresher;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tracing::instrument;

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferIntent {
	/// Recipient address as entered.
	pub to: String,
	/// Decimal amount as entered, e.g. `"1.5"`.
	pub amount: String,
}

impl TransferIntent {
	pub fn new(to: impl Into<String>, amount: impl Into<String>) -> Self {
		Self {
			to: to.into(),
			amount: amount.into(),
		}
	}
}

/// Outcome of a successful attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
	pub tx_hash: String,
	pub explorer_url: String,
	pub chain_id: u64,
	/// The payload the holder signed.
	pub payload: AuthorizationPayload,
}

/// Drives gasless transfer attempts.
pub struct TransferEngine {
	wallet: Arc<WalletService>,
	token: Arc<TokenService>,
	relayer: Arc<RelayerService>,
	authorization: AuthorizationBuilder,
	state: Arc<FlowStateMachine>,
	refresher: BalanceRefresher,
	event_bus: EventBus,
	explorer: ExplorerConfig,
	refresh_delay: Duration,
	/// Held for the duration of an attempt.
	attempt_lock: Mutex<()>,
}

impl TransferEngine {
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		wallet: Arc<WalletService>,
		token: Arc<TokenService>,
		relayer: Arc<RelayerService>,
		authorization: AuthorizationBuilder,
		event_bus: EventBus,
		explorer: ExplorerConfig,
		refresh_delay: Duration,
	) -> Self {
		let state = Arc::new(FlowStateMachine::new(event_bus.clone()));
		let refresher = BalanceRefresher::new(token.clone(), state.clone(), event_bus.clone());

		Self {
			wallet,
			token,
			relayer,
			authorization,
			state,
			refresher,
			event_bus,
			explorer,
			refresh_delay,
			attempt_lock: Mutex::new(()),
		}
	}

	/// Runs one transfer attempt to completion.
	///
	/// Returns `AttemptInProgress` without touching the flow state if another
	/// attempt is running. Any other error has already moved the flow to
	/// `Failed` when it is returned.
	#[instrument(skip_all, fields(to = %intent.to, amount = %intent.amount))]
	pub async fn transfer(&self, intent: TransferIntent) -> Result<TransferReceipt, TransferError> {
		let _guard = self
			.attempt_lock
			.try_lock()
			.map_err(|_| TransferError::AttemptInProgress)?;

		let attempt = self.state.begin_attempt().await;
		tracing::info!(attempt, "Starting transfer");

		match self.run_attempt(&intent).await {
			Ok(receipt) => {
				tracing::info!(
					attempt,
					tx_hash = %truncate_id(&receipt.tx_hash),
					explorer = %receipt.explorer_url,
					"Transfer submitted"
				);
				Ok(receipt)
			},
			Err(e) => {
				self.state.fail(e.kind(), e.to_string()).await;
				Err(e)
			},
		}
	}

	async fn run_attempt(&self, intent: &TransferIntent) -> Result<TransferReceipt, TransferError> {
		if intent.to.trim().is_empty() || intent.amount.trim().is_empty() {
			return Err(TransferError::MissingInput);
		}
		check_intent(&intent.to, &intent.amount)?;

		self.state.transition(FlowStatus::ConnectingWallet).await?;
		let (signer, chain_id) = self.wallet.connect().await?;
		self.state.set_connection(signer, chain_id).await;
		self.refresher.schedule(signer, Duration::ZERO);
		tracing::debug!(signer = %signer, chain_id, "Wallet connected");

		self.state
			.transition(FlowStatus::PreparingAuthorization)
			.await?;
		let typed_data = self
			.authorization
			.build(signer, &intent.to, &intent.amount, chain_id)
			.await?;

		self.state.transition(FlowStatus::AwaitingSignature).await?;
		let signature = self
			.wallet
			.sign_typed_data(&typed_data)
			.await
			.map_err(signing_error)?;

		self.state
			.transition(FlowStatus::SubmittingToRelayer)
			.await?;
		let request = RelayTransferRequest::new(typed_data.message, &signature);
		let tx_hash = self.relayer.submit(&request).await?;

		let explorer_url = self.explorer.tx_url(chain_id, &tx_hash);
		self.state
			.succeed(tx_hash.clone(), explorer_url.clone())
			.await?;
		self.refresher.schedule(signer, self.refresh_delay);

		Ok(TransferReceipt {
			tx_hash,
			explorer_url,
			chain_id,
			payload: request.payload,
		})
	}

	/// Reads the connected holder's balance, formatted as a decimal string.
	pub async fn balance(&self) -> Result<String, TransferError> {
		let (signer, _) = self.wallet.connect().await?;
		let balance = self
			.token
			.formatted_balance(signer)
			.await
			.map_err(|e| TransferError::NetworkError(e.to_string()))?;
		self.state.set_balance(balance.clone()).await;
		Ok(balance)
	}

	/// Current flow state.
	pub async fn state(&self) -> FlowState {
		self.state.snapshot().await
	}

	/// Subscribes to flow events.
	pub fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
		self.event_bus.subscribe()
	}

	/// Explorer link of a transaction on `chain_id`.
	pub fn explorer_url(&self, chain_id: u64, tx_hash: &str) -> String {
		self.explorer.tx_url(chain_id, tx_hash)
	}

	/// Balance reads still outstanding.
	pub fn pending_refreshes(&self) -> usize {
		self.refresher.pending()
	}
}

/// Any wallet failure while signing counts as a denied signature.
fn signing_error(err: WalletError) -> TransferError {
	match err {
		WalletError::SignatureDenied(m) => TransferError::SignatureDenied(m),
		other => TransferError::SignatureDenied(other.to_string()),
	}
}
