pub mod aggregator;
pub mod config;
pub mod engine;
pub mod error;
pub mod log;
pub mod providers;
pub mod quote_feed;
pub mod rates;
pub mod session;
pub mod ui;
pub mod validate;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::aggregator::PriceAggregator;
use crate::config::AppConfig;
use crate::engine::ConversionEngine;
use crate::providers::http_feed::{HttpQuoteFeed, icon_url};
use crate::session::SwapSession;

pub enum AppCommand {
    /// Show latest and average prices for the tracked currencies.
    Rates,
    /// Quote a conversion and optionally confirm it.
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
        confirm: bool,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Swap desk starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let feed = Arc::new(HttpQuoteFeed::new(
        &config.feed.base_url,
        Duration::from_secs(config.feed.timeout_secs),
    ));
    let aggregator = PriceAggregator::new(feed);

    match command {
        AppCommand::Rates => {
            rates::generate_and_display_rates(&aggregator, &config.currencies).await
        }
        AppCommand::Convert {
            amount,
            from,
            to,
            confirm,
        } => run_convert(&config, aggregator, &amount, from, to, confirm).await,
    }
}

async fn run_convert(
    config: &AppConfig,
    aggregator: PriceAggregator,
    amount: &str,
    from: Option<String>,
    to: Option<String>,
    confirm: bool,
) -> Result<()> {
    let from = from.unwrap_or_else(|| config.default_input.clone());
    let to = to.unwrap_or_else(|| config.default_output.clone());

    let engine = ConversionEngine::new(aggregator);
    let mut session = SwapSession::new(&from, &to, config.limits);
    session.set_amount(amount);
    session.request_computation(&engine).await?;

    if confirm {
        session.confirm(&engine).await?;
    }

    if let Some(result) = session.result() {
        println!(
            "{} {} ≈ {} {}",
            result.input_amount,
            result.input_currency,
            ui::style_text(
                &ui::format_output_amount(result.output_amount),
                ui::StyleType::TotalValue
            ),
            result.output_currency
        );
        println!(
            "1 {} = {} {}",
            result.input_currency,
            ui::format_rate(result.rate),
            result.output_currency
        );
        println!(
            "{}",
            ui::style_text(
                &format!(
                    "icons: {} {}",
                    icon_url(&config.icons.base_url, &result.input_currency),
                    icon_url(&config.icons.base_url, &result.output_currency)
                ),
                ui::StyleType::Subtle
            )
        );
    }

    if let Some(confirmed) = session.confirmed() {
        println!(
            "{} You'll receive {} {} for {} {}",
            ui::style_text("Swap Confirmed:", ui::StyleType::TotalLabel),
            ui::format_output_amount(confirmed.result.output_amount),
            confirmed.result.output_currency,
            confirmed.input_amount,
            confirmed.input_currency
        );
    }

    Ok(())
}
