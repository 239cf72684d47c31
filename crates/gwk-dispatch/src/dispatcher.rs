//! The dispatcher: one entry point per gateway callback kind.

use std::sync::Arc;

use gwk_book::{BookError, BookOp, BookSide};
use gwk_events::{
    price_to_micros, DepthDelta, ExecutionReport, NewsBulletin, PricingError, StrategyId,
    TICK_VOLUME,
};
use gwk_orders::{Fill, FillRemoval};
use gwk_positions::PositionError;
use gwk_session::ConnectivityState;

use crate::codes::classify;
use crate::config::DispatchConfig;
use crate::sinks::{AlertSink, ExecutionRequester, ModelEvent, ModelEventBus, ReportSink};
use crate::state::SessionState;

// ---------------------------------------------------------------------------
// DispatchError
// ---------------------------------------------------------------------------

/// A processing fault raised while applying one event to internal state.
///
/// These never cross the dispatch boundary: every entry point converts them
/// into a report call and returns normally (the triggering event is dropped,
/// not retried).
#[derive(Debug)]
pub enum DispatchError {
    /// Depth decode or apply failed.
    Book(BookError),
    /// Position apply for a completed order failed.
    Position(PositionError),
    /// A wire price was not representable in integer micros.
    Price(PricingError),
    /// A depth-reset error referenced a ticker no strategy is registered for.
    UnknownTicker { ticker_id: i64 },
    /// A completed order referenced a strategy missing from the registry.
    UnknownStrategy { strategy: StrategyId, order_id: i64 },
    /// The executions re-request during connectivity recovery failed; the
    /// session remains `Recovering` until the gateway re-announces.
    Recovery(String),
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::Book(e) => write!(f, "market depth fault: {e}"),
            DispatchError::Position(e) => write!(f, "position apply fault: {e}"),
            DispatchError::Price(e) => write!(f, "execution price fault: {e}"),
            DispatchError::UnknownTicker { ticker_id } => {
                write!(f, "depth reset for unregistered ticker id {ticker_id}")
            }
            DispatchError::UnknownStrategy { strategy, order_id } => write!(
                f,
                "completed order {order_id} references unknown {strategy}"
            ),
            DispatchError::Recovery(msg) => {
                write!(f, "executions re-request failed during recovery: {msg}")
            }
        }
    }
}

impl std::error::Error for DispatchError {}

impl From<BookError> for DispatchError {
    fn from(e: BookError) -> Self {
        DispatchError::Book(e)
    }
}

impl From<PositionError> for DispatchError {
    fn from(e: PositionError) -> Self {
        DispatchError::Position(e)
    }
}

impl From<PricingError> for DispatchError {
    fn from(e: PricingError) -> Self {
        DispatchError::Price(e)
    }
}

// ---------------------------------------------------------------------------
// GatewayDispatcher
// ---------------------------------------------------------------------------

/// Receives raw callback events from the transport-read loop and reconciles
/// them into [`SessionState`].
///
/// # Contract
/// 1. **No fault escapes.** Every public entry point returns `()`; internal
///    `Result`s terminate at [`contain`](Self::contain) as report calls.
/// 2. **Routing by declared kind/code only** — see [`classify`].
/// 3. **Side effects are synchronous and ordered** as listed per callback;
///    nothing is deferred.
pub struct GatewayDispatcher<Rep, Al, Bus, Req>
where
    Rep: ReportSink,
    Al: AlertSink,
    Bus: ModelEventBus,
    Req: ExecutionRequester,
{
    state: Arc<SessionState>,
    reporter: Rep,
    alerter: Al,
    bus: Bus,
    requester: Req,
    config: DispatchConfig,
}

impl<Rep, Al, Bus, Req> GatewayDispatcher<Rep, Al, Bus, Req>
where
    Rep: ReportSink,
    Al: AlertSink,
    Bus: ModelEventBus,
    Req: ExecutionRequester,
{
    pub fn new(
        state: Arc<SessionState>,
        reporter: Rep,
        alerter: Al,
        bus: Bus,
        requester: Req,
        config: DispatchConfig,
    ) -> Self {
        Self {
            state,
            reporter,
            alerter,
            bus,
            requester,
            config,
        }
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    // -----------------------------------------------------------------------
    // Fault boundary
    // -----------------------------------------------------------------------

    /// The dispatch boundary: a fault becomes a report, never a propagated
    /// error. An escaped fault in the transport-read loop would terminate
    /// the session.
    fn contain(&self, outcome: Result<(), DispatchError>) {
        if let Err(fault) = outcome {
            self.reporter.report_fault(&fault);
        }
    }

    // -----------------------------------------------------------------------
    // Entry points (the entire public surface of the core)
    // -----------------------------------------------------------------------

    /// Account-value update. Only the `AccountCode` key (case-insensitive)
    /// is meaningful; every other key is an explicit no-op.
    pub fn update_account_value(&self, key: &str, value: &str, _currency: &str, _account: &str) {
        if key.eq_ignore_ascii_case("AccountCode") {
            // Stores under the barrier's lock and wakes all blocked waiters.
            self.state.account.set(value);
        }
    }

    /// News bulletin: formatted report, no state mutation.
    pub fn update_news_bulletin(&self, bulletin: &NewsBulletin) {
        self.reporter.report(&bulletin.to_report_line());
    }

    /// Execution detail for an order id.
    pub fn exec_details(&self, exec: &ExecutionReport) {
        let outcome = self.handle_exec(exec);
        self.contain(outcome);
    }

    /// Error by numeric code. `id` is the ticker/request id some codes
    /// (notably 317) refer back to.
    pub fn error(&self, id: i64, code: i32, message: &str) {
        let outcome = self.handle_error(id, code, message);
        self.contain(outcome);
    }

    /// Error delivered as a plain message string.
    pub fn error_message(&self, message: &str) {
        self.reporter.report(message);
    }

    /// Error delivered as a transport-level exception.
    pub fn error_exception(&self, err: &(dyn std::error::Error + '_)) {
        self.reporter.report(&err.to_string());
    }

    /// Differential market-depth update.
    pub fn update_market_depth(&self, delta: &DepthDelta) {
        let outcome = self.handle_depth(delta);
        self.contain(outcome);
    }

    /// Tick-size update. Only volume ticks are meaningful; every other tick
    /// type is ignored.
    pub fn tick_size(&self, ticker_id: i64, tick_type: i32, size: i64) {
        if tick_type == TICK_VOLUME {
            self.state.with_book(ticker_id, |book| book.update_volume(size));
        }
    }

    /// Next usable order id for placement. Monotonic by gateway contract;
    /// stored without validation.
    pub fn next_valid_id(&self, order_id: i64) {
        self.state.set_next_order_id(order_id);
    }

    // -----------------------------------------------------------------------
    // Handlers
    // -----------------------------------------------------------------------

    fn handle_exec(&self, exec: &ExecutionReport) -> Result<(), DispatchError> {
        // Untracked order ids are silent no-ops, whatever the payload
        // carries: at-least-once delivery replays executions for orders
        // long since completed and removed. Only this dispatch context
        // removes orders, so the id cannot vanish between here and the
        // apply below.
        if !self.state.orders.contains(exec.order_id) {
            return Ok(());
        }

        let fill = Fill {
            exec_id: exec.exec_id.clone(),
            quantity: exec.quantity,
            price_micros: price_to_micros(exec.price)?,
        };

        let removal = if self.config.retain_order_on_failed_apply {
            FillRemoval::OnSuccessOnly
        } else {
            FillRemoval::Always
        };

        // Lookup, append, fill check, position apply, and removal run as one
        // atomic unit under the registry lock.
        self.state.orders.apply_execution(
            exec.order_id,
            fill,
            removal,
            |completed| -> Result<(), DispatchError> {
                let entry = self.state.strategies.get(completed.strategy).ok_or(
                    DispatchError::UnknownStrategy {
                        strategy: completed.strategy,
                        order_id: completed.order_id,
                    },
                )?;
                entry.position().apply_completed(completed)?;
                Ok(())
            },
        )?;
        Ok(())
    }

    fn handle_error(&self, id: i64, code: i32, message: &str) -> Result<(), DispatchError> {
        // Every code is reported textually, including suppressed ones.
        let msg = format!("{code}: {message}");
        self.reporter.report(&msg);

        let class = classify(code);

        if class.connectivity_lost {
            self.state.connectivity.set(ConnectivityState::Disconnected);
        }

        if class.connectivity_restored {
            self.reporter
                .report("Checking for executions missed while disconnected from the gateway.");
            // The re-request must land before any reader can observe
            // `Connected`; a failure leaves the session `Recovering`.
            self.state.connectivity.set(ConnectivityState::Recovering);
            self.requester
                .request_executions()
                .map_err(|e| DispatchError::Recovery(e.to_string()))?;
            self.state.connectivity.set(ConnectivityState::Connected);
        }

        if class.depth_reset {
            let entry = self
                .state
                .strategies
                .by_ticker(id)
                .ok_or(DispatchError::UnknownTicker { ticker_id: id })?;
            self.state.with_book(entry.ticker_id, |book| book.reset());
            self.reporter.report("Market depth data has been reset.");
        }

        if class.invalid_request {
            self.bus.publish(ModelEvent::Error {
                message: format!("Gateway reported: {message}"),
            });
        }

        if class.alert {
            self.alerter.send(&msg);
        }

        Ok(())
    }

    fn handle_depth(&self, delta: &DepthDelta) -> Result<(), DispatchError> {
        let op = BookOp::from_code(delta.operation)?;
        let side = BookSide::from_code(delta.side)?;
        self.state.with_book(delta.ticker_id, |book| {
            book.apply(delta.position, op, side, delta.price, delta.size)
        })?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests (scenario coverage lives in tests/)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::testkit::TestHarness;
    use gwk_events::NewsBulletin;

    #[test]
    fn news_bulletin_is_reported_verbatim() {
        let h = TestHarness::new();
        h.dispatcher.update_news_bulletin(&NewsBulletin {
            msg_id: 3,
            msg_type: 1,
            message: "system maintenance".to_string(),
            exchange: "NYSE".to_string(),
        });
        let reports = h.reporter.lines();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].contains("Msg ID: 3"));
        assert!(reports[0].contains("system maintenance"));
    }

    #[test]
    fn account_code_key_match_is_case_insensitive() {
        let h = TestHarness::new();
        h.dispatcher.update_account_value("accountcode", "DU42", "USD", "acct");
        assert_eq!(h.state.account.get(), Some("DU42".to_string()));
    }

    #[test]
    fn unrelated_account_keys_are_ignored() {
        let h = TestHarness::new();
        h.dispatcher.update_account_value("Currency", "USD", "USD", "acct");
        h.dispatcher.update_account_value("NetLiquidation", "1000", "USD", "acct");
        assert_eq!(h.state.account.get(), None);
    }

    #[test]
    fn next_valid_id_is_stored_for_placement() {
        let h = TestHarness::new();
        h.dispatcher.next_valid_id(501);
        assert_eq!(h.state.take_next_order_id(), Some(501));
    }

    #[test]
    fn non_volume_ticks_are_ignored() {
        let h = TestHarness::new();
        h.dispatcher.tick_size(9, 0, 123); // tick type 0: bid size
        assert!(h.state.book_snapshot(9).is_none());
        h.dispatcher.tick_size(9, gwk_events::TICK_VOLUME, 123);
        assert_eq!(h.state.book_snapshot(9).unwrap().last_volume(), Some(123));
    }
}
