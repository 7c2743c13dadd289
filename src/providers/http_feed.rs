use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::SwapError;
use crate::quote_feed::{Quote, QuoteFeed};

/// Feed reading the published spot prices over HTTP. One GET returns a JSON
/// array of `{currency, date, price}` records; there is no authentication
/// and no pagination. Timeouts and non-2xx responses surface as
/// `FeedUnavailable`, and no retry happens here.
pub struct HttpQuoteFeed {
    base_url: String,
    timeout: Duration,
}

impl HttpQuoteFeed {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        HttpQuoteFeed {
            base_url: base_url.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl QuoteFeed for HttpQuoteFeed {
    #[instrument(name = "QuoteFetch", skip(self))]
    async fn fetch_quotes(&self) -> Result<Vec<Quote>, SwapError> {
        let url = format!("{}/prices.json", self.base_url);
        debug!("Requesting quotes from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("swapdesk/1.0")
            .timeout(self.timeout)
            .build()
            .map_err(|e| SwapError::FeedUnavailable {
                reason: e.to_string(),
            })?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| SwapError::FeedUnavailable {
                reason: format!("request error: {e} for URL: {url}"),
            })?;

        if !response.status().is_success() {
            return Err(SwapError::FeedUnavailable {
                reason: format!("HTTP error: {} for URL: {url}", response.status()),
            });
        }

        let quotes = response.json::<Vec<Quote>>().await.map_err(|e| {
            SwapError::FeedUnavailable {
                reason: format!("failed to parse feed response: {e}"),
            }
        })?;

        debug!("Received {} quotes", quotes.len());
        Ok(quotes)
    }
}

/// URL of the token icon for a currency. Presentation-only; a missing icon
/// is not a feed error.
pub fn icon_url(base_url: &str, currency: &str) -> String {
    format!("{base_url}/{currency}.svg")
}
