//! Depth operation / side decoding.
//!
//! The gateway encodes operation and side as raw integers. Decoding lives
//! here (not in the schema crate) so an unknown code surfaces as a
//! [`BookError`] the dispatcher can contain and report, instead of a
//! deserialization failure inside the transport read loop.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BookOp
// ---------------------------------------------------------------------------

/// A positional depth operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookOp {
    /// Insert a new level at the position, shifting deeper levels down.
    Insert,
    /// Replace price/size of the level at the position.
    Update,
    /// Remove the level at the position, shifting deeper levels up.
    Delete,
}

impl BookOp {
    /// Decode the gateway's wire code (0 = insert, 1 = update, 2 = delete).
    pub fn from_code(code: i32) -> Result<Self, BookError> {
        match code {
            0 => Ok(BookOp::Insert),
            1 => Ok(BookOp::Update),
            2 => Ok(BookOp::Delete),
            other => Err(BookError::InvalidOperation(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// BookSide
// ---------------------------------------------------------------------------

/// Which ladder a depth operation targets. Position indices are per-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookSide {
    Bid,
    Ask,
}

impl BookSide {
    /// Decode the gateway's wire code (0 = ask, 1 = bid).
    pub fn from_code(code: i32) -> Result<Self, BookError> {
        match code {
            0 => Ok(BookSide::Ask),
            1 => Ok(BookSide::Bid),
            other => Err(BookError::InvalidSide(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// BookError
// ---------------------------------------------------------------------------

/// Faults raised while decoding or applying a depth delta.
///
/// Never fatal: the dispatcher catches these at its boundary, reports them,
/// and drops the triggering delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    /// Unknown operation wire code.
    InvalidOperation(i32),
    /// Unknown side wire code.
    InvalidSide(i32),
    /// The position index does not reference an existing level
    /// (or, for insert, exceeds the ladder depth).
    PositionOutOfRange {
        op: BookOp,
        side: BookSide,
        position: usize,
        depth: usize,
    },
    /// The wire price was not representable in integer micros.
    Price(gwk_events::PricingError),
}

impl std::fmt::Display for BookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookError::InvalidOperation(code) => {
                write!(f, "unknown depth operation code: {code}")
            }
            BookError::InvalidSide(code) => write!(f, "unknown depth side code: {code}"),
            BookError::PositionOutOfRange {
                op,
                side,
                position,
                depth,
            } => write!(
                f,
                "{op:?} on {side:?} targets position {position} but ladder depth is {depth}"
            ),
            BookError::Price(e) => write!(f, "depth price rejected: {e}"),
        }
    }
}

impl std::error::Error for BookError {}

impl From<gwk_events::PricingError> for BookError {
    fn from(e: gwk_events::PricingError) -> Self {
        BookError::Price(e)
    }
}
