//! Latest-quote selection and price averaging over a quote feed.

use std::sync::Arc;
use tracing::debug;

use crate::error::SwapError;
use crate::quote_feed::{Quote, QuoteFeed};

/// Filters raw feed records by currency and selects the most recent quote.
/// Every operation performs a fresh fetch; quotes are never cached across
/// calls, so a new fetch always supersedes the previous snapshot.
#[derive(Clone)]
pub struct PriceAggregator {
    feed: Arc<dyn QuoteFeed>,
}

impl PriceAggregator {
    pub fn new(feed: Arc<dyn QuoteFeed>) -> Self {
        PriceAggregator { feed }
    }

    /// All quotes for `currency`, in feed order.
    pub async fn quotes_for(&self, currency: &str) -> Result<Vec<Quote>, SwapError> {
        let quotes = self.feed.fetch_quotes().await?;
        Ok(quotes.into_iter().filter(|q| q.currency == currency).collect())
    }

    /// The quote with the maximum `date` for `currency`. When two quotes
    /// share the maximum date the last one in feed order wins; the choice is
    /// deterministic for a given feed snapshot but otherwise unspecified.
    pub async fn latest_quote(&self, currency: &str) -> Result<Quote, SwapError> {
        let quotes = self.quotes_for(currency).await?;
        let latest = quotes
            .into_iter()
            .max_by(|a, b| a.date.cmp(&b.date))
            .ok_or_else(|| SwapError::PriceUnavailable {
                currency: currency.to_string(),
            })?;
        debug!(
            currency,
            price = latest.price,
            date = %latest.date,
            "Selected latest quote"
        );
        Ok(latest)
    }

    /// Arithmetic mean of all quoted prices for `currency`.
    pub async fn average_price(&self, currency: &str) -> Result<f64, SwapError> {
        let quotes = self.quotes_for(currency).await?;
        if quotes.is_empty() {
            return Err(SwapError::PriceUnavailable {
                currency: currency.to_string(),
            });
        }
        let sum: f64 = quotes.iter().map(|q| q.price).sum();
        Ok(sum / quotes.len() as f64)
    }
}
