//! Quote records and the feed capability the core depends on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SwapError;

/// A single price observation for one currency at one point in time.
/// Immutable once received from the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub currency: String,
    pub date: DateTime<Utc>,
    pub price: f64,
}

/// Source of raw quote records. One call returns the quotes for all
/// tracked currencies; the transport behind it (timeouts, logging) is the
/// implementor's concern.
#[async_trait]
pub trait QuoteFeed: Send + Sync {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>, SwapError>;
}
