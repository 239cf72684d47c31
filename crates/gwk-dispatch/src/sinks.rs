//! Downstream sinks and collaborators, behind narrow traits.
//!
//! Everything the dispatcher talks to besides its own state lives here:
//! the report stream, the out-of-band alert channel, the UI model-change
//! bus, and the transport-side execution re-request used during
//! connectivity recovery. All sinks are fire-and-forget — none returns a
//! value, and a slow or absent consumer is never the dispatcher's problem.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use gwk_events::EventEnvelope;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ReportSink
// ---------------------------------------------------------------------------

/// Accepts the textual event report stream.
///
/// Every error code, every news bulletin, and every contained fault ends up
/// here. This stream is the only evidence of dropped events, so production
/// implementations must not sample or rate-limit it.
pub trait ReportSink {
    fn report(&self, message: &str);

    /// Report a contained processing fault. Default rendering is the error's
    /// `Display`; implementations may add structure.
    fn report_fault(&self, err: &(dyn std::error::Error + '_)) {
        self.report(&err.to_string());
    }
}

/// Production report sink: structured log lines via `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingReporter;

impl ReportSink for TracingReporter {
    fn report(&self, message: &str) {
        tracing::info!(target: "gwk::report", "{message}");
    }

    fn report_fault(&self, err: &(dyn std::error::Error + '_)) {
        tracing::warn!(target: "gwk::report", error = %err, "contained dispatch fault");
    }
}

// ---------------------------------------------------------------------------
// AlertSink
// ---------------------------------------------------------------------------

/// Accepts out-of-band alert messages (mail, pager — delivery is someone
/// else's crate). Fire-and-forget.
pub trait AlertSink {
    fn send(&self, message: &str);
}

/// Production alert sink: a `tracing` event on a dedicated target that the
/// subscriber layer routes to the alerting pipeline.
#[derive(Debug, Clone, Default)]
pub struct TracingAlerter;

impl AlertSink for TracingAlerter {
    fn send(&self, message: &str) {
        tracing::warn!(target: "gwk::alert", "{message}");
    }
}

// ---------------------------------------------------------------------------
// Model-change bus
// ---------------------------------------------------------------------------

/// Typed event surfaced to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelEvent {
    /// The gateway rejected a request; `message` is the broker's text,
    /// surfaced verbatim for display.
    Error { message: String },
}

/// Publishes model-change events for asynchronous display. Fire-and-forget:
/// publishing with no subscribers is not an error.
pub trait ModelEventBus {
    fn publish(&self, event: ModelEvent);
}

/// Production bus backed by `tokio::sync::broadcast`.
///
/// Each event goes out wrapped in an [`EventEnvelope`]: a fresh event id,
/// this bus's session id, and a per-session sequence number, so downstream
/// consumers can correlate and detect gaps. Lagging receivers drop
/// messages; the UI re-reads state rather than replaying the bus.
#[derive(Debug, Clone)]
pub struct BroadcastModelBus {
    session_id: Uuid,
    seq: Arc<AtomicU64>,
    tx: broadcast::Sender<EventEnvelope<ModelEvent>>,
}

impl BroadcastModelBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            session_id: Uuid::new_v4(),
            seq: Arc::new(AtomicU64::new(0)),
            tx,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope<ModelEvent>> {
        self.tx.subscribe()
    }
}

impl ModelEventBus for BroadcastModelBus {
    fn publish(&self, event: ModelEvent) {
        let envelope = EventEnvelope {
            event_id: Uuid::new_v4(),
            session_id: self.session_id,
            ts_utc: Utc::now(),
            seq: self.seq.fetch_add(1, Ordering::SeqCst),
            payload: event,
        };
        // No receivers is fine.
        let _ = self.tx.send(envelope);
    }
}


// ---------------------------------------------------------------------------
// ExecutionRequester
// ---------------------------------------------------------------------------

/// Transport-side collaborator: re-request all outstanding execution reports
/// from the gateway.
///
/// Invoked during connectivity recovery, before the session is marked
/// `Connected` again. The request MUST be idempotent from this core's
/// perspective — re-delivered executions for already-completed orders are
/// no-ops in the open-order registry.
pub trait ExecutionRequester {
    fn request_executions(&self) -> Result<(), Box<dyn std::error::Error>>;
}
