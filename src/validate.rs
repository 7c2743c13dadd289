//! Amount validation for swap input.

use serde::{Deserialize, Serialize};

use crate::error::SwapError;

/// Validation limits for swap amounts, loaded from config.
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct AmountLimits {
    pub max_amount: f64,
    pub max_decimals: u32,
}

impl Default for AmountLimits {
    fn default() -> Self {
        AmountLimits {
            max_amount: 1_000_000_000.0,
            max_decimals: 6,
        }
    }
}

/// An amount that passed validation, paired with its currency. Only this
/// type may be handed to the conversion engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAmount {
    pub amount: f64,
    pub currency: String,
}

/// Checks a raw amount string against the configured limits. Rules run in
/// order and the first failing rule determines the reported error: required,
/// numeric, positive, below the maximum (inclusive), and within the decimal
/// digit limit. Decimal digits are counted on the raw string so `"1.10"`
/// counts two, not one.
pub fn validate(
    raw: &str,
    currency: &str,
    limits: &AmountLimits,
) -> Result<ValidatedAmount, SwapError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SwapError::AmountRequired);
    }

    let amount: f64 = trimmed.parse().map_err(|_| SwapError::InvalidNumber {
        raw: raw.to_string(),
    })?;
    if !amount.is_finite() {
        return Err(SwapError::InvalidNumber {
            raw: raw.to_string(),
        });
    }

    if amount <= 0.0 {
        return Err(SwapError::AmountTooSmall);
    }

    if amount > limits.max_amount {
        return Err(SwapError::AmountTooLarge {
            max: limits.max_amount,
        });
    }

    let decimals = trimmed.split('.').nth(1).map_or(0, str::len);
    if decimals as u32 > limits.max_decimals {
        return Err(SwapError::TooManyDecimals {
            max: limits.max_decimals,
        });
    }

    Ok(ValidatedAmount {
        amount,
        currency: currency.to_string(),
    })
}
