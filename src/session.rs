//! Swap session state machine.
//!
//! Owns the user-facing amount and currency selections, runs validation
//! before the conversion engine, and tracks whether the last computed result
//! has been explicitly confirmed. Confirmation attaches to the exact
//! (amount, input currency, output currency) tuple it was computed for; any
//! edit to that tuple drops the session back to `Editing` and discards the
//! confirmation and the displayed rate.

use tracing::debug;

use crate::engine::{ConversionEngine, ConversionResult};
use crate::error::SwapError;
use crate::validate::{AmountLimits, ValidatedAmount, validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No amount entered yet.
    Idle,
    /// Amount or currency present, not yet computed or invalidated by a
    /// later edit.
    Editing,
    /// A conversion result exists for the current tuple.
    Computed,
    /// The user accepted the computed result for the current tuple.
    Confirmed,
}

/// The (amount, currency pair) tuple a computation is requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapTuple {
    pub amount: String,
    pub input_currency: String,
    pub output_currency: String,
}

/// Tag handed out when a computation starts. A result is applied only if
/// its ticket still matches the session's current tuple, so computations
/// that were superseded by a later edit are discarded on arrival.
#[derive(Debug, Clone)]
pub struct ComputationTicket {
    tuple: SwapTuple,
    pub input: ValidatedAmount,
}

/// Snapshot taken at confirmation time.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedSwap {
    pub input_amount: String,
    pub input_currency: String,
    pub result: ConversionResult,
}

pub struct SwapSession {
    amount: String,
    output_amount: String,
    input_currency: String,
    output_currency: String,
    limits: AmountLimits,
    state: SessionState,
    result: Option<ConversionResult>,
    error: Option<SwapError>,
    confirmed: Option<ConfirmedSwap>,
}

impl SwapSession {
    pub fn new(input_currency: &str, output_currency: &str, limits: AmountLimits) -> Self {
        SwapSession {
            amount: String::new(),
            output_amount: String::new(),
            input_currency: input_currency.to_string(),
            output_currency: output_currency.to_string(),
            limits,
            state: SessionState::Idle,
            result: None,
            error: None,
            confirmed: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn output_amount(&self) -> &str {
        &self.output_amount
    }

    pub fn input_currency(&self) -> &str {
        &self.input_currency
    }

    pub fn output_currency(&self) -> &str {
        &self.output_currency
    }

    pub fn result(&self) -> Option<&ConversionResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&SwapError> {
        self.error.as_ref()
    }

    pub fn confirmed(&self) -> Option<&ConfirmedSwap> {
        self.confirmed.as_ref()
    }

    fn current_tuple(&self) -> SwapTuple {
        SwapTuple {
            amount: self.amount.clone(),
            input_currency: self.input_currency.clone(),
            output_currency: self.output_currency.clone(),
        }
    }

    /// Any edit invalidates the computed rate and the confirmation; they
    /// apply only to the tuple they were computed for.
    fn invalidate(&mut self) {
        self.result = None;
        self.error = None;
        self.confirmed = None;
    }

    pub fn set_amount(&mut self, raw: &str) {
        self.amount = raw.to_string();
        self.invalidate();
        self.state = if self.amount.trim().is_empty() {
            SessionState::Idle
        } else {
            SessionState::Editing
        };
        debug!(amount = %self.amount, state = ?self.state, "Amount edited");
    }

    pub fn set_input_currency(&mut self, currency: &str) {
        self.input_currency = currency.to_string();
        self.invalidate();
        self.state = SessionState::Editing;
        debug!(currency, "Input currency edited");
    }

    pub fn set_output_currency(&mut self, currency: &str) {
        self.output_currency = currency.to_string();
        self.invalidate();
        self.state = SessionState::Editing;
        debug!(currency, "Output currency edited");
    }

    /// Exchanges which currency is "from" and which is "to", along with the
    /// displayed amounts, and forces `Editing` regardless of prior state.
    pub fn swap_direction(&mut self) {
        std::mem::swap(&mut self.input_currency, &mut self.output_currency);
        std::mem::swap(&mut self.amount, &mut self.output_amount);
        self.invalidate();
        self.state = SessionState::Editing;
        debug!(
            from = %self.input_currency,
            to = %self.output_currency,
            "Swap direction reversed"
        );
    }

    /// Validates the current amount and tags the computation with the tuple
    /// it is for. On a validation failure the session stays in `Editing`
    /// with the error recorded for display; the engine is never reached.
    pub fn begin_computation(&mut self) -> Result<ComputationTicket, SwapError> {
        match validate(&self.amount, &self.input_currency, &self.limits) {
            Ok(input) => Ok(ComputationTicket {
                tuple: self.current_tuple(),
                input,
            }),
            Err(e) => {
                self.state = SessionState::Editing;
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Applies a settled computation if its ticket still matches the
    /// session's current tuple. Outcomes for a superseded tuple are
    /// discarded so a stale computation never overwrites state produced by
    /// a later edit. Returns whether the outcome was applied.
    pub fn apply_computation(
        &mut self,
        ticket: ComputationTicket,
        outcome: Result<ConversionResult, SwapError>,
    ) -> bool {
        if ticket.tuple != self.current_tuple() {
            debug!(stale = ?ticket.tuple, "Discarding stale computation");
            return false;
        }
        match outcome {
            Ok(result) => {
                self.output_amount = format!("{:.6}", result.output_amount);
                self.result = Some(result);
                self.error = None;
                self.state = SessionState::Computed;
            }
            Err(e) => {
                self.error = Some(e);
                self.state = SessionState::Editing;
            }
        }
        true
    }

    /// Runs validation and, on success, the conversion engine; stores the
    /// result and moves to `Computed`, or stays in `Editing` with the
    /// failure recorded.
    pub async fn request_computation(
        &mut self,
        engine: &ConversionEngine,
    ) -> Result<(), SwapError> {
        let ticket = self.begin_computation()?;
        let outcome = engine.convert(&ticket.input, &self.output_currency).await;
        let returned = outcome.as_ref().map(|_| ()).map_err(Clone::clone);
        self.apply_computation(ticket, outcome);
        returned
    }

    /// Accepts the computed result for the current tuple. The computation is
    /// re-run so the confirmed figures are fresh; a refresh failure drops
    /// the session back to `Editing`. Meaningful only from `Computed`;
    /// otherwise a no-op.
    pub async fn confirm(&mut self, engine: &ConversionEngine) -> Result<(), SwapError> {
        if self.state != SessionState::Computed {
            return Ok(());
        }

        self.request_computation(engine).await?;

        // request_computation left us in Computed with a fresh result.
        if let Some(result) = self.result.clone() {
            self.confirmed = Some(ConfirmedSwap {
                input_amount: self.amount.clone(),
                input_currency: self.input_currency.clone(),
                result,
            });
            self.state = SessionState::Confirmed;
            debug!("Swap confirmed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::PriceAggregator;
    use crate::quote_feed::testing::{FailingFeed, StaticFeed};
    use std::sync::Arc;

    fn engine(prices: &[(&str, f64)]) -> ConversionEngine {
        ConversionEngine::new(PriceAggregator::new(Arc::new(StaticFeed::with_prices(
            prices,
        ))))
    }

    fn session() -> SwapSession {
        SwapSession::new("USDC", "ETH", AmountLimits::default())
    }

    #[test]
    fn starts_idle_with_default_currencies() {
        let session = session();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.input_currency(), "USDC");
        assert_eq!(session.output_currency(), "ETH");
        assert!(session.result().is_none());
        assert!(session.confirmed().is_none());
    }

    #[test]
    fn entering_an_amount_moves_to_editing() {
        let mut session = session();
        session.set_amount("10");
        assert_eq!(session.state(), SessionState::Editing);

        session.set_amount("");
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn computation_stores_result_and_moves_to_computed() {
        let engine = engine(&[("USDC", 1.0), ("ETH", 2000.0)]);
        let mut session = session();
        session.set_amount("10");

        session.request_computation(&engine).await.unwrap();
        assert_eq!(session.state(), SessionState::Computed);

        let result = session.result().unwrap();
        assert!((result.rate - 0.0005).abs() < 1e-12);
        assert!((result.output_amount - 0.005).abs() < 1e-12);
        assert_eq!(session.output_amount(), "0.005000");
    }

    #[tokio::test]
    async fn validation_failure_stays_editing_with_error() {
        let engine = engine(&[("USDC", 1.0), ("ETH", 2000.0)]);
        let mut session = session();
        session.set_amount("0");

        let result = session.request_computation(&engine).await;
        assert_eq!(result, Err(SwapError::AmountTooSmall));
        assert_eq!(session.state(), SessionState::Editing);
        assert_eq!(session.error(), Some(&SwapError::AmountTooSmall));
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn engine_failure_stays_editing_with_error() {
        let engine = ConversionEngine::new(PriceAggregator::new(Arc::new(FailingFeed)));
        let mut session = session();
        session.set_amount("10");

        let result = session.request_computation(&engine).await;
        assert!(matches!(result, Err(SwapError::FeedUnavailable { .. })));
        assert_eq!(session.state(), SessionState::Editing);
        assert!(matches!(
            session.error(),
            Some(SwapError::FeedUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn missing_currency_stays_editing_with_error() {
        let engine = engine(&[("USDC", 1.0)]);
        let mut session = session();
        session.set_amount("10");

        let result = session.request_computation(&engine).await;
        assert_eq!(
            result,
            Err(SwapError::PriceUnavailable {
                currency: "ETH".to_string()
            })
        );
        assert_eq!(session.state(), SessionState::Editing);
    }

    #[tokio::test]
    async fn editing_after_computed_discards_rate_and_state() {
        let engine = engine(&[("USDC", 1.0), ("ETH", 2000.0)]);
        let mut session = session();
        session.set_amount("10");
        session.request_computation(&engine).await.unwrap();
        assert_eq!(session.state(), SessionState::Computed);

        session.set_amount("20");
        assert_eq!(session.state(), SessionState::Editing);
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn currency_edit_after_computed_discards_result() {
        let engine = engine(&[("USDC", 1.0), ("ETH", 2000.0), ("BTC", 60000.0)]);
        let mut session = session();
        session.set_amount("10");
        session.request_computation(&engine).await.unwrap();

        session.set_output_currency("BTC");
        assert_eq!(session.state(), SessionState::Editing);
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn confirm_snapshots_the_tuple_and_refreshes() {
        let engine = engine(&[("USDC", 1.0), ("ETH", 2000.0)]);
        let mut session = session();
        session.set_amount("10");
        session.request_computation(&engine).await.unwrap();

        session.confirm(&engine).await.unwrap();
        assert_eq!(session.state(), SessionState::Confirmed);

        let confirmed = session.confirmed().unwrap();
        assert_eq!(confirmed.input_amount, "10");
        assert_eq!(confirmed.input_currency, "USDC");
        assert!((confirmed.result.output_amount - 0.005).abs() < 1e-12);
    }

    #[tokio::test]
    async fn editing_after_confirm_clears_the_confirmation() {
        let engine = engine(&[("USDC", 1.0), ("ETH", 2000.0)]);
        let mut session = session();
        session.set_amount("10");
        session.request_computation(&engine).await.unwrap();
        session.confirm(&engine).await.unwrap();
        assert_eq!(session.state(), SessionState::Confirmed);

        session.set_amount("20");
        assert_eq!(session.state(), SessionState::Editing);
        assert!(session.confirmed().is_none());

        // A fresh computation is required for the new tuple.
        session.request_computation(&engine).await.unwrap();
        assert_eq!(session.state(), SessionState::Computed);
        let result = session.result().unwrap();
        assert!((result.output_amount - 0.010).abs() < 1e-12);
    }

    #[tokio::test]
    async fn confirm_outside_computed_is_a_no_op() {
        let engine = engine(&[("USDC", 1.0), ("ETH", 2000.0)]);
        let mut session = session();
        session.set_amount("10");

        session.confirm(&engine).await.unwrap();
        assert_eq!(session.state(), SessionState::Editing);
        assert!(session.confirmed().is_none());
    }

    #[tokio::test]
    async fn confirm_falls_back_to_editing_when_refresh_fails() {
        let good = engine(&[("USDC", 1.0), ("ETH", 2000.0)]);
        let bad = ConversionEngine::new(PriceAggregator::new(Arc::new(FailingFeed)));

        let mut session = session();
        session.set_amount("10");
        session.request_computation(&good).await.unwrap();
        assert_eq!(session.state(), SessionState::Computed);

        // Feed goes away between compute and confirm.
        let result = session.confirm(&bad).await;
        assert!(matches!(result, Err(SwapError::FeedUnavailable { .. })));
        assert_eq!(session.state(), SessionState::Editing);
        assert!(session.confirmed().is_none());
    }

    #[tokio::test]
    async fn swap_direction_exchanges_currencies_and_amounts() {
        let engine = engine(&[("USDC", 1.0), ("ETH", 2000.0)]);
        let mut session = session();
        session.set_amount("10");
        session.request_computation(&engine).await.unwrap();
        session.confirm(&engine).await.unwrap();

        session.swap_direction();
        assert_eq!(session.state(), SessionState::Editing);
        assert_eq!(session.input_currency(), "ETH");
        assert_eq!(session.output_currency(), "USDC");
        assert_eq!(session.amount(), "0.005000");
        assert_eq!(session.output_amount(), "10");
        assert!(session.result().is_none());
        assert!(session.confirmed().is_none());
    }

    #[tokio::test]
    async fn stale_result_is_discarded_after_a_later_edit() {
        let engine = engine(&[("USDC", 1.0), ("ETH", 2000.0)]);
        let mut session = session();
        session.set_amount("10");

        // Computation starts for amount=10...
        let ticket = session.begin_computation().unwrap();
        let outcome = engine.convert(&ticket.input, "ETH").await;

        // ...but the user edits to 20 before it settles.
        session.set_amount("20");

        assert!(!session.apply_computation(ticket, outcome));
        assert_eq!(session.state(), SessionState::Editing);
        assert!(session.result().is_none());

        // The next computation reflects the latest edit.
        session.request_computation(&engine).await.unwrap();
        assert_eq!(session.result().unwrap().input_amount, 20.0);
    }

    #[tokio::test]
    async fn stale_failure_does_not_clobber_later_state() {
        let engine = engine(&[("USDC", 1.0), ("ETH", 2000.0)]);
        let mut session = session();

        // A computation for LUNA is in flight when the user switches back.
        session.set_amount("10");
        session.set_input_currency("LUNA");
        let ticket = session.begin_computation().unwrap();

        session.set_input_currency("USDC");
        session.request_computation(&engine).await.unwrap();
        assert_eq!(session.state(), SessionState::Computed);

        let stale = Err(SwapError::PriceUnavailable {
            currency: "LUNA".to_string(),
        });
        assert!(!session.apply_computation(ticket, stale));
        assert_eq!(session.state(), SessionState::Computed);
        assert!(session.error().is_none());
        assert!(session.result().is_some());
    }
}
