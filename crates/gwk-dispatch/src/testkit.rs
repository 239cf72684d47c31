//! Recording sinks and a scenario harness.
//!
//! Gated behind the `testkit` feature (plus `cfg(test)` for this crate's own
//! unit tests). Production wiring must never depend on this module.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use gwk_events::{ExecutionReport, ExecutionSide, StrategyId};
use gwk_orders::OpenOrder;
use gwk_session::ConnectivityState;

use crate::config::DispatchConfig;
use crate::dispatcher::GatewayDispatcher;
use crate::sinks::{AlertSink, ExecutionRequester, ModelEvent, ModelEventBus, ReportSink};
use crate::state::SessionState;

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Recording sinks
// ---------------------------------------------------------------------------

/// Captures every report line for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        lock(&self.lines).clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        lock(&self.lines).iter().any(|l| l.contains(needle))
    }
}

impl ReportSink for RecordingReporter {
    fn report(&self, message: &str) {
        lock(&self.lines).push(message.to_string());
    }
}

/// Captures every alert send.
#[derive(Debug, Clone, Default)]
pub struct RecordingAlerter {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingAlerter {
    pub fn sent(&self) -> Vec<String> {
        lock(&self.sent).clone()
    }
}

impl AlertSink for RecordingAlerter {
    fn send(&self, message: &str) {
        lock(&self.sent).push(message.to_string());
    }
}

/// Captures every published model event.
#[derive(Debug, Clone, Default)]
pub struct RecordingBus {
    events: Arc<Mutex<Vec<ModelEvent>>>,
}

impl RecordingBus {
    pub fn events(&self) -> Vec<ModelEvent> {
        lock(&self.events).clone()
    }
}

impl ModelEventBus for RecordingBus {
    fn publish(&self, event: ModelEvent) {
        lock(&self.events).push(event);
    }
}

/// Records the connectivity state observed at each re-request call, so
/// ordering scenarios can prove `Connected` is never visible before the
/// recovery request lands. Can be armed to fail.
#[derive(Debug, Clone)]
pub struct RecordingRequester {
    state: Arc<SessionState>,
    observed: Arc<Mutex<Vec<ConnectivityState>>>,
    fail_with: Arc<Mutex<Option<String>>>,
}

impl RecordingRequester {
    pub fn new(state: Arc<SessionState>) -> Self {
        Self {
            state,
            observed: Arc::new(Mutex::new(Vec::new())),
            fail_with: Arc::new(Mutex::new(None)),
        }
    }

    /// Connectivity state at the moment of each `request_executions` call.
    pub fn observed(&self) -> Vec<ConnectivityState> {
        lock(&self.observed).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.observed).len()
    }

    /// Make the next (and all subsequent) calls fail with `message`.
    pub fn fail_with(&self, message: &str) {
        *lock(&self.fail_with) = Some(message.to_string());
    }
}

impl ExecutionRequester for RecordingRequester {
    fn request_executions(&self) -> Result<(), Box<dyn std::error::Error>> {
        lock(&self.observed).push(self.state.connectivity.get());
        if let Some(msg) = lock(&self.fail_with).clone() {
            return Err(msg.into());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TestHarness
// ---------------------------------------------------------------------------

/// A fully wired dispatcher over recording sinks.
pub struct TestHarness {
    pub state: Arc<SessionState>,
    pub reporter: RecordingReporter,
    pub alerter: RecordingAlerter,
    pub bus: RecordingBus,
    pub requester: RecordingRequester,
    pub dispatcher:
        GatewayDispatcher<RecordingReporter, RecordingAlerter, RecordingBus, RecordingRequester>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    pub fn with_config(config: DispatchConfig) -> Self {
        let state = Arc::new(SessionState::new());
        let reporter = RecordingReporter::default();
        let alerter = RecordingAlerter::default();
        let bus = RecordingBus::default();
        let requester = RecordingRequester::new(Arc::clone(&state));
        let dispatcher = GatewayDispatcher::new(
            Arc::clone(&state),
            reporter.clone(),
            alerter.clone(),
            bus.clone(),
            requester.clone(),
            config,
        );
        Self {
            state,
            reporter,
            alerter,
            bus,
            requester,
            dispatcher,
        }
    }

    /// Register a strategy and return its id.
    pub fn register_strategy(&self, name: &str, ticker_id: i64) -> StrategyId {
        self.state.strategies.register(name, ticker_id).unwrap()
    }

    /// Track a working buy order, as the placement subsystem would.
    pub fn track_order(&self, order_id: i64, strategy: StrategyId, requested_qty: i64) {
        self.state
            .orders
            .insert(OpenOrder::new(
                order_id,
                strategy,
                "TEST",
                ExecutionSide::Buy,
                requested_qty,
            ))
            .unwrap();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Execution report builder for scenarios.
pub fn exec_report(order_id: i64, exec_id: &str, quantity: i64, price: f64) -> ExecutionReport {
    ExecutionReport {
        exec_id: exec_id.to_string(),
        order_id,
        side: ExecutionSide::Buy,
        quantity,
        price,
        ts_utc: Utc::now(),
    }
}
