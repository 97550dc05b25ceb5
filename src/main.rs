use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use oraclefeed::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for oraclefeed::AppCommand {
    fn from(cmd: Commands) -> oraclefeed::AppCommand {
        match cmd {
            Commands::Prices => oraclefeed::AppCommand::Prices,
            Commands::Watch { interval_secs } => oraclefeed::AppCommand::Watch { interval_secs },
            Commands::Assets => oraclefeed::AppCommand::Assets,
            Commands::Pair { from, to } => oraclefeed::AppCommand::Pair { from, to },
            Commands::Audit { from, to, asset } => {
                oraclefeed::AppCommand::Audit { from, to, asset }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the current price list
    Prices,
    /// Poll the price list and re-render it until interrupted
    Watch {
        /// Refresh interval in seconds (defaults to the configured interval)
        #[arg(short, long)]
        interval_secs: Option<u64>,
    },
    /// List the asset catalog
    Assets,
    /// Show the price of one token in units of another
    Pair {
        /// Base token symbol, e.g. ETH
        from: String,
        /// Quote token symbol, e.g. USDC
        to: String,
    },
    /// Export raw historical prices for an audit window
    Audit {
        /// Start of the window, RFC 3339 (e.g. 2025-01-01T00:00:00Z)
        #[arg(long)]
        from: String,
        /// End of the window, RFC 3339
        #[arg(long)]
        to: String,
        /// Restrict the export to one asset id
        #[arg(long)]
        asset: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => oraclefeed::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = oraclefeed::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
api:
  base_url: "https://api.ifalabs.com/api"

refresh_interval_ms: 10000
price_ttl_ms: 5000
all_prices_ttl_ms: 10000
request_timeout_ms: 10000
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
