//! gwk-positions
//!
//! Per-strategy position state, fed exactly once per completed order.
//!
//! The order → strategy → position chain is resolved through
//! [`StrategyRegistry`] by [`StrategyId`](gwk_events::StrategyId) — an index
//! lookup, never an embedded back-pointer, so orders and strategies share no
//! ownership cycle.
//!
//! A failed apply leaves the position bit-for-bit unmodified; the caller (the
//! dispatcher boundary) decides whether the completed order is retained for
//! retry or dropped.

mod position;
mod strategies;

pub use position::{Position, PositionError, PositionManager};
pub use strategies::{StrategyEntry, StrategyError, StrategyRegistry};
