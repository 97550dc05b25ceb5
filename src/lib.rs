pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod log;
pub mod model;
pub mod poller;
pub mod tokens;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::client::PriceClient;
use crate::config::AppConfig;

pub enum AppCommand {
    Prices,
    Watch { interval_secs: Option<u64> },
    Assets,
    Pair { from: String, to: String },
    Audit {
        from: String,
        to: String,
        asset: Option<String>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Oracle price feed starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let client = Arc::new(PriceClient::new(&config)?);

    match command {
        AppCommand::Prices => cli::prices::run(&client).await,
        AppCommand::Assets => cli::assets::run(&client).await,
        AppCommand::Watch { interval_secs } => {
            let interval = interval_secs
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.refresh_interval());
            cli::watch::run(client, interval).await
        }
        AppCommand::Pair { from, to } => cli::pair::run(&client, &from, &to).await,
        AppCommand::Audit { from, to, asset } => {
            cli::audit::run(&client, &from, &to, asset.as_deref()).await
        }
    }
}
