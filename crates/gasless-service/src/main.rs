//! Command-line client for gasless token transfers.
//!
//! Loads a configuration file, wires the configured wallet, token and relayer
//! implementations into a transfer engine and runs a single command: a
//! transfer, a balance read or an explorer link lookup.

use clap::{Parser, Subcommand};
use gasless_config::Config;
use gasless_core::{TransferEngine, TransferIntent};
use gasless_types::{ExplorerConfig, FlowEvent};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod factory_registry;

/// Balance reads made by a successful attempt: one on connect, one after the
/// refresh delay.
const BALANCE_READS_PER_TRANSFER: usize = 2;

/// Extra time allowed for the delayed balance read to complete.
const BALANCE_WAIT_GRACE: Duration = Duration::from_secs(10);

/// Command-line arguments for the gasless client.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
	/// Sign a transfer authorization and hand it to the relayer
	Transfer {
		/// Recipient address
		#[arg(long)]
		to: String,
		/// Amount in whole tokens, e.g. 1.5
		#[arg(long)]
		amount: String,
	},
	/// Print the connected holder's token balance
	Balance,
	/// Print the explorer link of a transaction
	Explorer {
		#[arg(long)]
		chain_id: u64,
		#[arg(long)]
		tx: String,
	},
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	if let Command::Explorer { chain_id, tx } = &args.command {
		let explorer = explorer_config(&args.config).await?;
		println!("{}", explorer.tx_url(*chain_id, tx));
		return Ok(());
	}

	let config = Config::from_file(&args.config.to_string_lossy()).await?;
	tracing::info!("Loaded configuration [{}]", config.client.id);

	let refresh_delay = Duration::from_secs(config.client.balance_refresh_delay_seconds);
	let engine = factory_registry::build_engine_from_config(config)?;

	match args.command {
		Command::Transfer { to, amount } => {
			run_transfer(&engine, TransferIntent::new(to, amount), refresh_delay).await?
		},
		Command::Balance => {
			let balance = engine.balance().await?;
			println!("Balance: {}", balance);
		},
		Command::Explorer { .. } => {},
	}

	Ok(())
}

/// Explorer settings from the config file, or the built-in table if there is
/// no config file.
async fn explorer_config(path: &Path) -> Result<ExplorerConfig, Box<dyn std::error::Error>> {
	if !path.exists() {
		return Ok(ExplorerConfig::default());
	}
	let config = Config::from_file(&path.to_string_lossy()).await?;
	Ok(config.explorer)
}

/// Runs one transfer, printing progress as the engine reports it, then waits
/// for the post-transfer balance read.
async fn run_transfer(
	engine: &TransferEngine,
	intent: TransferIntent,
	refresh_delay: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
	let mut events = engine.subscribe();
	let mut balance_reads = 0;

	let transfer = engine.transfer(intent);
	tokio::pin!(transfer);

	let outcome = loop {
		tokio::select! {
			result = &mut transfer => break result,
			Ok(event) = events.recv() => balance_reads += print_event(&event),
		}
	};
	while let Ok(event) = events.try_recv() {
		balance_reads += print_event(&event);
	}

	let receipt = outcome?;
	tracing::debug!(
		tx_hash = %receipt.tx_hash,
		chain_id = receipt.chain_id,
		nonce = %receipt.payload.nonce,
		"Transfer accepted by relayer"
	);

	let wait = tokio::time::timeout(refresh_delay + BALANCE_WAIT_GRACE, async {
		while balance_reads < BALANCE_READS_PER_TRANSFER {
			match events.recv().await {
				Ok(event) => balance_reads += print_event(&event),
				Err(_) => break,
			}
		}
	});
	if wait.await.is_err() {
		tracing::warn!("Timed out waiting for balance refresh");
	}

	Ok(())
}

/// Prints one engine event. Returns 1 if the event ends a balance read.
fn print_event(event: &FlowEvent) -> usize {
	match event {
		FlowEvent::StatusChanged { message, .. } => {
			println!("{}", message);
			0
		},
		FlowEvent::Failed { kind, .. } => {
			tracing::debug!(kind = ?kind, "Attempt failed");
			0
		},
		FlowEvent::Submitted { explorer_url, .. } => {
			println!("View on explorer: {}", explorer_url);
			0
		},
		FlowEvent::BalanceUpdated { balance, .. } => {
			println!("Balance: {}", balance);
			1
		},
		FlowEvent::BalanceRefreshFailed { error, .. } => {
			tracing::warn!(error = %error, "Could not refresh balance");
			1
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use gasless_types::Address;
	use std::io::Write;

	const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	#[test]
	fn test_args_transfer_command() {
		let args = Args::try_parse_from([
			"gasless",
			"transfer",
			"--to",
			"0x70997970c51812dc3a010c7d01b50e0d17dc79c8",
			"--amount",
			"1.5",
		])
		.unwrap();

		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
		assert_eq!(
			args.command,
			Command::Transfer {
				to: "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".to_string(),
				amount: "1.5".to_string(),
			}
		);
	}

	#[test]
	fn test_args_custom_values() {
		let args = Args::try_parse_from([
			"gasless",
			"--config",
			"custom.toml",
			"--log-level",
			"debug",
			"explorer",
			"--chain-id",
			"84532",
			"--tx",
			"0xabc",
		])
		.unwrap();

		assert_eq!(args.config, PathBuf::from("custom.toml"));
		assert_eq!(args.log_level, "debug");
		assert_eq!(
			args.command,
			Command::Explorer {
				chain_id: 84532,
				tx: "0xabc".to_string(),
			}
		);
	}

	#[test]
	fn test_args_require_command() {
		assert!(Args::try_parse_from(["gasless"]).is_err());
		assert!(Args::try_parse_from(["gasless", "transfer", "--to", "0x1"]).is_err());
	}

	#[tokio::test]
	async fn test_explorer_config_without_file_uses_builtin_table() {
		let explorer = explorer_config(Path::new("/nonexistent/gasless.toml"))
			.await
			.unwrap();

		assert_eq!(
			explorer.tx_url(1, "abc"),
			"https://etherscan.io/tx/0xabc"
		);
	}

	#[tokio::test]
	async fn test_explorer_config_reads_overrides() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(
			file,
			r#"
[client]
id = "cli-test"

[token]
address = "0x4242424242424242424242424242424242424242"
primary = "evm_alloy"
[token.implementations.evm_alloy]
rpc_url = "http://localhost:8545"

[wallet]
primary = "local"
[wallet.implementations.local]
private_key = "{}"
chain_id = 31337

[relayer]
primary = "http"
[relayer.implementations.http]
base_url = "http://localhost:3001"

[explorer]
default_url = "https://etherscan.io"
[explorer.overrides]
"31337" = "http://localhost:5100"
"#,
			TEST_KEY
		)
		.unwrap();

		let explorer = explorer_config(file.path()).await.unwrap();
		assert_eq!(
			explorer.tx_url(31337, "0xabc"),
			"http://localhost:5100/tx/0xabc"
		);
	}

	#[test]
	fn test_print_event_counts_balance_reads() {
		let holder = Address::repeat_byte(0xaa);
		assert_eq!(
			print_event(&FlowEvent::BalanceUpdated {
				holder,
				balance: "1.5".to_string(),
			}),
			1
		);
		assert_eq!(
			print_event(&FlowEvent::BalanceRefreshFailed {
				holder,
				error: "node unreachable".to_string(),
			}),
			1
		);
		assert_eq!(
			print_event(&FlowEvent::Submitted {
				attempt: 1,
				tx_hash: "0xdead".to_string(),
				explorer_url: "https://etherscan.io/tx/0xdead".to_string(),
			}),
			0
		);
	}
}
