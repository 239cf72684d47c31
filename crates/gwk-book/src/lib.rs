//! gwk-book
//!
//! Per-instrument market-depth state.
//!
//! Depth updates from the gateway are differential, not snapshots: each one
//! is an Insert/Update/Delete against a position index in one side's ladder.
//! They MUST be applied in the exact order received per instrument — there is
//! no way to re-derive the book after a skipped or reordered delta, only a
//! full reset (gateway error 317) recovers it.
//!
//! Pure deterministic logic. No IO, no clock, no locking — per-instrument
//! serialization is the caller's responsibility (the dispatcher applies all
//! deltas for an instrument from a single transport-read context).

mod book;
mod ops;

pub use book::{BookLevel, MarketBook};
pub use ops::{BookError, BookOp, BookSide};
