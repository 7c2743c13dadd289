use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use swapdesk::log::init_logging;

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

impl From<Commands> for swapdesk::AppCommand {
    fn from(cmd: Commands) -> swapdesk::AppCommand {
        match cmd {
            Commands::Rates => swapdesk::AppCommand::Rates,
            Commands::Convert {
                amount,
                from,
                to,
                confirm,
            } => swapdesk::AppCommand::Convert {
                amount,
                from,
                to,
                confirm,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display latest spot prices for tracked currencies
    Rates,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        amount: String,
        /// Currency to convert from
        #[arg(long)]
        from: Option<String>,
        /// Currency to convert to
        #[arg(long)]
        to: Option<String>,
        /// Confirm the swap after quoting it
        #[arg(long)]
        confirm: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => swapdesk::run_command(cmd.into(), cli.config_path.as_deref()).await,
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

    let path = swapdesk::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
feed:
  base_url: "https://interview.switcheo.com"
  timeout_secs: 10

limits:
  max_amount: 1000000000
  max_decimals: 6

default_input: "USDC"
default_output: "ETH"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
