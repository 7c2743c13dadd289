//! Rates overview for the tracked currencies.

use comfy_table::Cell;
use futures::future;
use futures::future::join_all;

use crate::aggregator::PriceAggregator;
use crate::error::SwapError;
use crate::quote_feed::Quote;
use crate::ui;

#[derive(Debug, Clone)]
pub struct CurrencyRate {
    pub currency: String,
    pub latest: Option<Quote>,
    pub average: Option<f64>,
    pub error: Option<String>,
}

/// Collects the latest and average price for each tracked currency. The
/// per-currency lookups run concurrently; a currency missing from the feed
/// becomes an empty row, not a failure.
pub async fn generate_rates(
    aggregator: &PriceAggregator,
    currencies: &[String],
) -> Vec<CurrencyRate> {
    let rate_futures = currencies.iter().map(|currency| async move {
        let (latest, average) = future::join(
            aggregator.latest_quote(currency),
            aggregator.average_price(currency),
        )
        .await;

        let mut rate = CurrencyRate {
            currency: currency.clone(),
            latest: None,
            average: None,
            error: None,
        };
        match latest {
            Ok(quote) => rate.latest = Some(quote),
            Err(SwapError::PriceUnavailable { .. }) => {}
            Err(e) => rate.error = Some(e.to_string()),
        }
        if let Ok(avg) = average {
            rate.average = Some(avg);
        }
        rate
    });

    join_all(rate_futures).await
}

pub fn display_rates_table(rates: &[CurrencyRate]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Price (USD)"),
        ui::header_cell("Quoted At"),
        ui::header_cell("Average"),
    ]);

    for rate in rates {
        let price = ui::format_optional_cell(rate.latest.as_ref().map(|q| q.price), |p| {
            format!("{p:.6}")
        });
        let quoted_at = ui::format_optional_cell(rate.latest.as_ref().map(|q| q.date), |d| {
            d.format("%Y-%m-%d %H:%M:%S").to_string()
        });
        let average = ui::format_optional_cell(rate.average, |a| format!("{a:.6}"));

        table.add_row(vec![Cell::new(&rate.currency), price, quoted_at, average]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Spot Prices", ui::StyleType::Title)
    );
    output.push_str(&table.to_string());

    let errors: Vec<&CurrencyRate> = rates.iter().filter(|r| r.error.is_some()).collect();
    for rate in errors {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!("{}: {}", rate.currency, rate.error.as_deref().unwrap_or("")),
                ui::StyleType::Error
            )
        ));
    }

    output
}

pub async fn generate_and_display_rates(
    aggregator: &PriceAggregator,
    currencies: &[String],
) -> anyhow::Result<()> {
    let rates = generate_rates(aggregator, currencies).await;
    println!("{}", display_rates_table(&rates));
    Ok(())
}
