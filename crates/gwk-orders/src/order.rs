//! A single in-flight order and its accumulated executions.

use gwk_events::{ExecutionSide, StrategyId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Fill
// ---------------------------------------------------------------------------

/// One execution already validated at the ingestion boundary.
///
/// The dispatcher converts the wire `ExecutionReport` (f64 price) into this
/// before it touches the registry, so accumulation is infallible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    /// Gateway execution id — the deduplication key.
    pub exec_id: String,
    /// Quantity filled by this execution (positive).
    pub quantity: i64,
    /// Fill price in integer micros.
    pub price_micros: i64,
}

// ---------------------------------------------------------------------------
// OrderStatus
// ---------------------------------------------------------------------------

/// Lifecycle of an open order. Derived from accumulated quantity — there is
/// no separate transition table to drift out of sync with the fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// No executions yet.
    Pending,
    /// Some, but not all, of the requested quantity has traded.
    PartiallyFilled,
    /// Requested quantity fully traded. **Terminal** — the registry removes
    /// the order at this point.
    Filled,
}

// ---------------------------------------------------------------------------
// OpenOrder
// ---------------------------------------------------------------------------

/// An order awaiting fills, identified by the gateway-assigned order id.
///
/// The originating strategy is referenced by [`StrategyId`] — an index into
/// the strategy registry, never an owning pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenOrder {
    pub order_id: i64,
    pub strategy: StrategyId,
    pub symbol: String,
    pub side: ExecutionSide,
    pub requested_qty: i64,
    fills: Vec<Fill>,
}

impl OpenOrder {
    pub fn new(
        order_id: i64,
        strategy: StrategyId,
        symbol: impl Into<String>,
        side: ExecutionSide,
        requested_qty: i64,
    ) -> Self {
        debug_assert!(requested_qty > 0, "requested_qty must be positive");
        Self {
            order_id,
            strategy,
            symbol: symbol.into(),
            side,
            requested_qty,
            fills: Vec::new(),
        }
    }

    /// Append an execution. Replays (same `exec_id`) are silent no-ops, so
    /// at-least-once delivery never double-counts.
    pub fn add_execution(&mut self, fill: Fill) {
        if self.fills.iter().any(|f| f.exec_id == fill.exec_id) {
            return;
        }
        self.fills.push(fill);
    }

    pub fn filled_qty(&self) -> i64 {
        self.fills.iter().map(|f| f.quantity).sum()
    }

    pub fn status(&self) -> OrderStatus {
        let filled = self.filled_qty();
        if filled == 0 {
            OrderStatus::Pending
        } else if filled < self.requested_qty {
            OrderStatus::PartiallyFilled
        } else {
            OrderStatus::Filled
        }
    }

    pub fn is_filled(&self) -> bool {
        self.status() == OrderStatus::Filled
    }

    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    /// Quantity-weighted average fill price in micros.
    ///
    /// Uses i128 intermediate math so price × quantity products cannot
    /// overflow. Zero filled quantity yields 0.
    pub fn avg_fill_price_micros(&self) -> i64 {
        let filled = self.filled_qty();
        if filled == 0 {
            return 0;
        }
        let notional: i128 = self
            .fills
            .iter()
            .map(|f| f.price_micros as i128 * f.quantity as i128)
            .sum();
        (notional / filled as i128) as i64
    }

    /// Immutable summary handed to the position manager on completion.
    pub fn to_completed(&self) -> CompletedOrder {
        CompletedOrder {
            order_id: self.order_id,
            strategy: self.strategy,
            symbol: self.symbol.clone(),
            side: self.side,
            quantity: self.filled_qty(),
            avg_price_micros: self.avg_fill_price_micros(),
        }
    }
}

// ---------------------------------------------------------------------------
// CompletedOrder
// ---------------------------------------------------------------------------

/// The net effect of a fully filled order — the only shape the position
/// manager ever sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedOrder {
    pub order_id: i64,
    pub strategy: StrategyId,
    pub symbol: String,
    pub side: ExecutionSide,
    pub quantity: i64,
    pub avg_price_micros: i64,
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
