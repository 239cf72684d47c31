//! gwk-events
//!
//! Wire-facing callback event schemas for the gateway session.
//!
//! These are the raw payloads the transport layer hands to the dispatcher,
//! one struct per callback kind. Two deliberate choices:
//!
//! - Depth operation / side arrive as the gateway's raw `i32` codes.
//!   Decoding them is the book's job (`gwk-book`), not the schema's — an
//!   unknown code must surface as a contained fault, not a deserialization
//!   failure that kills the transport read loop.
//! - Prices arrive as `f64` and are converted to integer micros at the
//!   ingestion boundary (see [`prices`]). Internal state never compares
//!   `f64` prices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod prices;

pub use prices::{micros_to_price, price_to_micros, PricingError, MICROS_PER_UNIT};

// ---------------------------------------------------------------------------
// EventEnvelope
// ---------------------------------------------------------------------------

/// Generic envelope for events replicated onto downstream buses or journals.
///
/// The dispatcher itself consumes bare payloads (the transport already
/// guarantees per-session ordering); the envelope is applied on the way
/// out — the production model-change bus wraps every published event in
/// one, so consumers can correlate across sessions and detect gaps via
/// `seq`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope<T> {
    pub event_id: Uuid,
    pub session_id: Uuid,
    pub ts_utc: DateTime<Utc>,
    /// Per-session delivery sequence, assigned by the transport reader.
    pub seq: u64,
    pub payload: T,
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Index into the strategy registry.
///
/// An `OpenOrder` back-references its originating strategy by this id rather
/// than by an owning pointer, so the order ↔ strategy relationship never
/// forms an ownership cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrategyId(pub u32);

impl std::fmt::Display for StrategyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "strategy-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Execution detail
// ---------------------------------------------------------------------------

/// Which way an execution traded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionSide {
    Buy,
    Sell,
}

/// One execution (fill) report pushed by the gateway.
///
/// Delivery is at-least-once: the same `exec_id` may arrive more than once,
/// and reports may arrive for orders this process no longer tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Gateway-assigned execution id, stable across redeliveries.
    pub exec_id: String,
    /// Gateway-assigned order id this execution belongs to.
    pub order_id: i64,
    pub side: ExecutionSide,
    /// Quantity filled in this execution (always positive).
    pub quantity: i64,
    /// Fill price as received on the wire.
    pub price: f64,
    pub ts_utc: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Market depth
// ---------------------------------------------------------------------------

/// One differential market-depth update.
///
/// `operation` and `side` are the gateway's raw codes
/// (0 = insert, 1 = update, 2 = delete; 0 = ask, 1 = bid). They are decoded
/// by `gwk-book`; unknown codes are a contained fault there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthDelta {
    /// Subscription / ticker id the update belongs to.
    pub ticker_id: i64,
    /// Book position index the operation targets.
    pub position: usize,
    pub operation: i32,
    pub side: i32,
    pub price: f64,
    pub size: i64,
}

// ---------------------------------------------------------------------------
// Ticks
// ---------------------------------------------------------------------------

/// Gateway tick-type code for a traded-volume tick.
///
/// The only tick type the dispatcher routes; every other code is an explicit
/// no-op per the session contract.
pub const TICK_VOLUME: i32 = 8;

// ---------------------------------------------------------------------------
// News bulletins
// ---------------------------------------------------------------------------

/// A news bulletin pushed by the gateway. Reported, never acted on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsBulletin {
    pub msg_id: i32,
    pub msg_type: i32,
    pub message: String,
    pub exchange: String,
}

impl NewsBulletin {
    /// Canonical one-line textual rendering for the report sink.
    pub fn to_report_line(&self) -> String {
        format!(
            "Msg ID: {} Msg Type: {} Msg: {} Exchange: {}",
            self.msg_id, self.msg_type, self.message, self.exchange
        )
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
