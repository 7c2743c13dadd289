//! Error taxonomy for swap quoting and validation.

use thiserror::Error;

/// Every failure the swap core can report, as a discriminated value.
///
/// The validation variants are recoverable by re-editing the amount.
/// `FeedUnavailable` is recoverable by retrying the computation;
/// `PriceUnavailable` only by selecting a different currency.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SwapError {
    #[error("amount is required")]
    AmountRequired,

    #[error("'{raw}' is not a valid number")]
    InvalidNumber { raw: String },

    #[error("amount must be greater than 0")]
    AmountTooSmall,

    #[error("amount too large (max: {max})")]
    AmountTooLarge { max: f64 },

    #[error("too many decimal places (max: {max})")]
    TooManyDecimals { max: u32 },

    #[error("price feed unavailable: {reason}")]
    FeedUnavailable { reason: String },

    #[error("no price data for currency: {currency}")]
    PriceUnavailable { currency: String },
}

impl SwapError {
    /// True for errors produced by amount validation, before any network
    /// call is made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SwapError::AmountRequired
                | SwapError::InvalidNumber { .. }
                | SwapError::AmountTooSmall
                | SwapError::AmountTooLarge { .. }
                | SwapError::TooManyDecimals { .. }
        )
    }
}
