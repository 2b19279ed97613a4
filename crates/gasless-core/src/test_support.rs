//! Test doubles for the wallet, token and relayer collaborators.

use crate::authorization::AuthorizationBuilder;
use crate::clock::FixedClock;
use crate::engine::{event_bus::EventBus, TransferEngine};
use async_trait::async_trait;
use gasless_account::{WalletError, WalletInterface, WalletService};
use gasless_relayer::{RelayerError, RelayerInterface, RelayerService};
use gasless_token::{TokenError, TokenInterface, TokenService};
use gasless_types::{
	Address, ConfigSchema, ExplorerConfig, RelayTransferRequest, Signature, TypedData,
	ValidationError, B256, U256,
};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub const TOKEN_ADDRESS: Address = Address::repeat_byte(0x42);
pub const HOLDER: Address = Address::repeat_byte(0xaa);

pub struct AnySchema;

impl ConfigSchema for AnySchema {
	fn validate(&self, _config: &toml::Value) -> Result<(), ValidationError> {
		Ok(())
	}
}

#[derive(Default)]
pub struct WalletCalls {
	accounts: AtomicUsize,
	signer: AtomicUsize,
	network: AtomicUsize,
	signatures: AtomicUsize,
}

impl WalletCalls {
	pub fn total(&self) -> usize {
		self.accounts.load(Ordering::SeqCst)
			+ self.signer.load(Ordering::SeqCst)
			+ self.network.load(Ordering::SeqCst)
			+ self.signatures.load(Ordering::SeqCst)
	}

	pub fn signatures(&self) -> usize {
		self.signatures.load(Ordering::SeqCst)
	}
}

pub struct MockWallet {
	pub network: Arc<AtomicU64>,
	pub calls: Arc<WalletCalls>,
	pub signed: Arc<Mutex<Vec<TypedData>>>,
	pub release: Arc<Notify>,
	deny_access: bool,
	reject_signatures: bool,
	hold_signatures: bool,
}

impl MockWallet {
	pub fn new(chain_id: u64) -> Self {
		Self {
			network: Arc::new(AtomicU64::new(chain_id)),
			calls: Arc::new(WalletCalls::default()),
			signed: Arc::new(Mutex::new(Vec::new())),
			release: Arc::new(Notify::new()),
			deny_access: false,
			reject_signatures: false,
			hold_signatures: false,
		}
	}

	pub fn denying_access(mut self) -> Self {
		self.deny_access = true;
		self
	}

	pub fn rejecting_signatures(mut self) -> Self {
		self.reject_signatures = true;
		self
	}

	/// Parks signature requests until `release` is notified.
	pub fn holding_signatures(mut self) -> Self {
		self.hold_signatures = true;
		self
	}
}

#[async_trait]
impl WalletInterface for MockWallet {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AnySchema)
	}

	async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
		self.calls.accounts.fetch_add(1, Ordering::SeqCst);
		if self.deny_access {
			return Err(WalletError::AccessDenied("user rejected the request".into()));
		}
		Ok(vec![HOLDER])
	}

	async fn active_signer(&self) -> Result<Address, WalletError> {
		self.calls.signer.fetch_add(1, Ordering::SeqCst);
		Ok(HOLDER)
	}

	async fn active_network(&self) -> Result<u64, WalletError> {
		self.calls.network.fetch_add(1, Ordering::SeqCst);
		Ok(self.network.load(Ordering::SeqCst))
	}

	async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Signature, WalletError> {
		self.calls.signatures.fetch_add(1, Ordering::SeqCst);
		if self.hold_signatures {
			self.release.notified().await;
		}
		if self.reject_signatures {
			return Err(WalletError::SignatureDenied("user rejected signing".into()));
		}
		self.signed.lock().unwrap().push(typed_data.clone());
		Ok(Signature {
			v: 27,
			r: typed_data.signing_hash(),
			s: B256::repeat_byte(0x01),
		})
	}
}

#[derive(Default)]
pub struct TokenCalls {
	metadata: AtomicUsize,
	balances: AtomicUsize,
}

impl TokenCalls {
	pub fn total(&self) -> usize {
		self.metadata.load(Ordering::SeqCst) + self.balances.load(Ordering::SeqCst)
	}

	pub fn balances(&self) -> usize {
		self.balances.load(Ordering::SeqCst)
	}
}

pub struct MockToken {
	pub calls: Arc<TokenCalls>,
	decimals: u8,
	fail_metadata: bool,
	fail_balance: bool,
}

impl MockToken {
	pub fn new(decimals: u8) -> Self {
		Self {
			calls: Arc::new(TokenCalls::default()),
			decimals,
			fail_metadata: false,
			fail_balance: false,
		}
	}

	pub fn failing() -> Self {
		Self {
			fail_metadata: true,
			..Self::new(6)
		}
	}

	pub fn failing_balance(mut self) -> Self {
		self.fail_balance = true;
		self
	}
}

#[async_trait]
impl TokenInterface for MockToken {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AnySchema)
	}

	async fn name(&self, _token: Address) -> Result<String, TokenError> {
		self.calls.metadata.fetch_add(1, Ordering::SeqCst);
		if self.fail_metadata {
			return Err(TokenError::Network("node unreachable".into()));
		}
		Ok("USD Coin".to_string())
	}

	async fn decimals(&self, _token: Address) -> Result<u8, TokenError> {
		self.calls.metadata.fetch_add(1, Ordering::SeqCst);
		if self.fail_metadata {
			return Err(TokenError::Network("node unreachable".into()));
		}
		Ok(self.decimals)
	}

	async fn balance_of(&self, _token: Address, _holder: Address) -> Result<U256, TokenError> {
		self.calls.balances.fetch_add(1, Ordering::SeqCst);
		if self.fail_balance {
			return Err(TokenError::Network("node unreachable".into()));
		}
		Ok(U256::from(100u64) * U256::from(10u64).pow(U256::from(self.decimals)))
	}
}

pub enum RelayReply {
	Success(String),
	Rejected(String),
}

pub struct MockRelayer {
	pub received: Arc<Mutex<Vec<RelayTransferRequest>>>,
	reply: RelayReply,
}

impl MockRelayer {
	pub fn new(reply: RelayReply) -> Self {
		Self {
			received: Arc::new(Mutex::new(Vec::new())),
			reply,
		}
	}
}

#[async_trait]
impl RelayerInterface for MockRelayer {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AnySchema)
	}

	async fn relay_transfer(&self, request: &RelayTransferRequest) -> Result<String, RelayerError> {
		self.received.lock().unwrap().push(request.clone());
		match &self.reply {
			RelayReply::Success(tx_hash) => Ok(tx_hash.clone()),
			RelayReply::Rejected(message) => Err(RelayerError::Rejected(message.clone())),
		}
	}
}

/// Engine over the given doubles with a fixed clock and a 5 second refresh
/// delay.
pub fn engine_with(wallet: MockWallet, token: MockToken, relayer: MockRelayer) -> TransferEngine {
	let token = Arc::new(TokenService::new(Box::new(token), TOKEN_ADDRESS));
	let authorization = AuthorizationBuilder::new(
		token.clone(),
		"2".to_string(),
		Arc::new(FixedClock(1_700_000_000)),
	);

	TransferEngine::new(
		Arc::new(WalletService::new(Box::new(wallet))),
		token,
		Arc::new(RelayerService::new(Box::new(relayer))),
		authorization,
		EventBus::new(64),
		ExplorerConfig::default(),
		Duration::from_secs(5),
	)
}
