//! Cross-rate conversion between two quoted currencies.

use futures::future;
use tracing::{debug, instrument};

use crate::aggregator::PriceAggregator;
use crate::error::SwapError;
use crate::validate::ValidatedAmount;

/// Outcome of one conversion. Created fresh on every successful computation
/// and superseded, never merged, by the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub input_amount: f64,
    pub input_currency: String,
    pub output_amount: f64,
    pub output_currency: String,
    /// `price(input) / price(output)`: how many units of the output currency
    /// one unit of the input currency buys.
    pub rate: f64,
}

/// Computes conversions from the aggregator's latest quotes. Pure beyond the
/// two lookups; display rounding belongs to the presentation layer.
pub struct ConversionEngine {
    aggregator: PriceAggregator,
}

impl ConversionEngine {
    pub fn new(aggregator: PriceAggregator) -> Self {
        ConversionEngine { aggregator }
    }

    /// Converts a validated amount into `output_currency` at the latest
    /// cross rate. The two quote lookups run concurrently and both must
    /// settle before either result is inspected; if one fails the other's
    /// success is discarded, so no partial result is ever returned.
    #[instrument(
        name = "Convert",
        skip(self, input),
        fields(from = %input.currency, to = %output_currency, amount = input.amount)
    )]
    pub async fn convert(
        &self,
        input: &ValidatedAmount,
        output_currency: &str,
    ) -> Result<ConversionResult, SwapError> {
        let (input_quote, output_quote) = future::join(
            self.aggregator.latest_quote(&input.currency),
            self.aggregator.latest_quote(output_currency),
        )
        .await;
        let input_quote = input_quote?;
        let output_quote = output_quote?;

        let rate = input_quote.price / output_quote.price;
        let output_amount = input.amount * rate;
        debug!(rate, output_amount, "Computed conversion");

        Ok(ConversionResult {
            input_amount: input.amount,
            input_currency: input.currency.clone(),
            output_amount,
            output_currency: output_currency.to_string(),
            rate,
        })
    }
}
