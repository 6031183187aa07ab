//! txwatch server
//!
//! Receives Helius enhanced-transaction webhooks for one group of deposit
//! wallets and forwards incoming transfers of tracked SPL tokens to Telegram.

mod api;
mod config;
mod provision;
mod server;
mod shutdown;
mod state;

use clap::{Parser, Subcommand};
use config::ConfigLoader;
use server::{build_router, run_server};
use state::AppState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use txwatch_core::entities::{SignatureLedger, WalletRegistry};
use txwatch_core::events::transfer_notification_channel;
use txwatch_core::notifier::{Notifier, TelegramNotifier, TransferLog};
use txwatch_core::processors::{EventReceiver, LedgerSweeper, NotificationSender};
use url::Url;

/// txwatch - incoming SPL token transfer notifications
#[derive(Parser, Debug)]
#[command(name = "txwatch-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "TXWATCH_CONFIG",
        default_value = "./txwatch-config.toml"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Receive webhooks for one wallet group
    Serve {
        /// Wallet group to serve (1-based)
        #[arg(short, long)]
        group: usize,

        /// Override the listen port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Register Helius webhooks; each --group is paired with the --url at the same position
    Provision {
        #[arg(short, long, required = true)]
        group: Vec<usize>,

        #[arg(short, long, required = true)]
        url: Vec<Url>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Secrets may live in a .env file next to the binary
    dotenvy::dotenv().ok();

    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting txwatch-server v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Serve { group, port } => serve(&args.config, group, port).await,
        Command::Provision { group, url } => {
            if group.len() != url.len() {
                anyhow::bail!(
                    "{} --group values but {} --url values; pass one URL per group",
                    group.len(),
                    url.len()
                );
            }
            let loaded_config = load_config(&args.config, None)?;
            let targets: Vec<_> = group.into_iter().zip(url).collect();
            provision::run(&loaded_config, &targets).await
        }
    }
}

fn load_config(path: &Path, port: Option<u16>) -> anyhow::Result<config::LoadedConfig> {
    let loaded_config = ConfigLoader::new(path, port).load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!("Configuration loaded from {:?}", path);
    Ok(loaded_config)
}

async fn serve(config_path: &Path, group_index: usize, port: Option<u16>) -> anyhow::Result<()> {
    let loaded_config = load_config(config_path, port)?;
    let telegram_config = loaded_config.require_telegram()?;
    let listen_addr = loaded_config.server.listen;

    // Load the wallet registry and pick this instance's group
    let registry = WalletRegistry::from_csv_path(
        &loaded_config.wallets.csv,
        loaded_config.wallets.group_size,
    )
    .map_err(|e| {
        tracing::error!(
            "Failed to load wallets from {:?}: {}",
            loaded_config.wallets.csv,
            e
        );
        e
    })?;
    let wallets = Arc::new(registry.group(group_index)?);
    tracing::info!(
        group = wallets.name(),
        wallets = wallets.len(),
        total_wallets = registry.len(),
        groups = registry.group_count(),
        "Monitoring deposit wallets"
    );
    tracing::info!(tokens = ?loaded_config.tokens.symbols(), "Tracking tokens");

    // Channels
    let (notification_tx, notification_rx) = transfer_notification_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Notifiers: the log file first so a slow chat API never delays it
    let transfer_log = TransferLog::open(&loaded_config.log_dir, wallets.name()).await?;
    tracing::info!("Writing transfers to {:?}", transfer_log.path());
    let telegram = TelegramNotifier::new(telegram_config)?;
    let notifiers = vec![
        Arc::new(transfer_log) as Arc<dyn Notifier>,
        Arc::new(telegram) as Arc<dyn Notifier>,
    ];

    let ledger = SignatureLedger::new(loaded_config.ledger.retention);

    // Background processors
    let sender_handle = tokio::spawn(
        NotificationSender::new(notification_rx, shutdown_rx.clone(), notifiers).run(),
    );
    let sweeper_handle = tokio::spawn(
        LedgerSweeper::new(
            ledger.clone(),
            loaded_config.ledger.sweep_interval,
            shutdown_rx,
        )
        .run(),
    );

    let receiver = EventReceiver::new(
        wallets,
        Arc::new(loaded_config.tokens),
        ledger,
        notification_tx,
    );
    let state = AppState::new(receiver);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Stop background processors; queued notifications are still delivered
    let _ = shutdown_tx.send(true);
    let (sender_result, sweeper_result) = tokio::join!(sender_handle, sweeper_handle);
    if let Err(e) = sender_result {
        tracing::error!("NotificationSender task failed: {}", e);
    }
    if let Err(e) = sweeper_result {
        tracing::error!("LedgerSweeper task failed: {}", e);
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
