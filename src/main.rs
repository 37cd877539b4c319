//! Finboard main entry point

use anyhow::Context;
use clap::Parser;
use finboard_api::start_server;
use finboard_config::{Config, ConfigError};
use finboard_core::Ledger;
use finboard_parser::DefaultLedgerParser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::RwLock;

#[derive(Parser, Debug)]
#[command(name = "finboard")]
#[command(version = "0.1.0")]
#[command(about = "Monthly personal-finance ledger analytics served as a JSON API", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Ledger CSV file; overrides data.path/data.main_file
    #[arg(short, long)]
    ledger: Option<PathBuf>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (config, missing) = match Config::load(args.config.clone()) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => (Config::default(), true),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to load configuration from {}", args.config.display()))
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    if missing {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    }
    log::info!(
        "Config loaded: data path={}, main_file={}",
        config.data.path.display(),
        config.data.main_file
    );

    let rt = Runtime::new()?;

    rt.block_on(async {
        let parser = Arc::new(DefaultLedgerParser);
        let ledger = Arc::new(RwLock::new(Ledger::new(config.clone(), parser)));

        let data_path = args.ledger.clone().unwrap_or_else(|| config.ledger_path());
        log::info!("Looking for ledger file: {}", data_path.display());

        if data_path.exists() {
            let mut ledger_guard = ledger.write().await;
            match ledger_guard.load(data_path).await {
                Ok(()) => log::info!("Ledger loaded successfully"),
                Err(e) => log::error!("Failed to load ledger: {}", e.to_details()),
            }
        } else {
            log::warn!("Ledger file not found: {}", data_path.display());
        }

        start_server(config, ledger).await.context("Server error")
    })
}
