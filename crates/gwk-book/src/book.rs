//! The per-instrument book itself.

use gwk_events::price_to_micros;
use serde::{Deserialize, Serialize};

use crate::ops::{BookError, BookOp, BookSide};

// ---------------------------------------------------------------------------
// BookLevel
// ---------------------------------------------------------------------------

/// One outstanding price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    /// Price in integer micros (see `gwk_events::prices`).
    pub price_micros: i64,
    pub size: i64,
}

// ---------------------------------------------------------------------------
// MarketBook
// ---------------------------------------------------------------------------

/// Ordered bid/ask ladders for one instrument, keyed by position index.
///
/// # Invariants
/// - Positions are contiguous: a ladder of depth `n` has levels exactly at
///   `0..n`. Insert/update/delete can never leave a position index
///   referencing a removed level (`Vec` storage gives this structurally).
/// - A failed apply (out-of-range position, bad price) mutates nothing.
/// - [`reset`][MarketBook::reset] clears both ladders and the last-known
///   volume in one call; the book is then indistinguishable from a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketBook {
    bids: Vec<BookLevel>,
    asks: Vec<BookLevel>,
    last_volume: Option<i64>,
}

impl MarketBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one differential depth operation.
    ///
    /// Deltas MUST be applied in the exact order received for this
    /// instrument; the book cannot detect a skipped delta.
    ///
    /// # Errors
    /// [`BookError::PositionOutOfRange`] when the position does not target an
    /// existing level (insert allows `position == depth`, i.e. append);
    /// [`BookError::Price`] when the wire price is not representable. The
    /// book is unchanged on error.
    pub fn apply(
        &mut self,
        position: usize,
        op: BookOp,
        side: BookSide,
        price: f64,
        size: i64,
    ) -> Result<(), BookError> {
        let ladder = self.ladder_mut(side);
        let depth = ladder.len();

        let out_of_range = |op: BookOp| BookError::PositionOutOfRange {
            op,
            side,
            position,
            depth,
        };

        match op {
            BookOp::Insert => {
                if position > depth {
                    return Err(out_of_range(op));
                }
                let price_micros = price_to_micros(price)?;
                ladder.insert(position, BookLevel { price_micros, size });
            }
            BookOp::Update => {
                if position >= depth {
                    return Err(out_of_range(op));
                }
                let price_micros = price_to_micros(price)?;
                ladder[position] = BookLevel { price_micros, size };
            }
            BookOp::Delete => {
                if position >= depth {
                    return Err(out_of_range(op));
                }
                ladder.remove(position);
            }
        }
        Ok(())
    }

    /// Replace the last-known traded volume. Price levels are untouched.
    pub fn update_volume(&mut self, size: i64) {
        self.last_volume = Some(size);
    }

    /// Clear the book back to its initial state (gateway depth reset).
    pub fn reset(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.last_volume = None;
    }

    // -----------------------------------------------------------------------
    // Read surface
    // -----------------------------------------------------------------------

    pub fn depth(&self, side: BookSide) -> usize {
        self.ladder(side).len()
    }

    pub fn level(&self, side: BookSide, position: usize) -> Option<&BookLevel> {
        self.ladder(side).get(position)
    }

    /// Top of book, when present.
    pub fn best(&self, side: BookSide) -> Option<&BookLevel> {
        self.level(side, 0)
    }

    pub fn last_volume(&self) -> Option<i64> {
        self.last_volume
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    fn ladder(&self, side: BookSide) -> &Vec<BookLevel> {
        match side {
            BookSide::Bid => &self.bids,
            BookSide::Ask => &self.asks,
        }
    }

    fn ladder_mut(&mut self, side: BookSide) -> &mut Vec<BookLevel> {
        match side {
            BookSide::Bid => &mut self.bids,
            BookSide::Ask => &mut self.asks,
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_ok(book: &mut MarketBook, pos: usize, op: BookOp, price: f64, size: i64) {
        book.apply(pos, op, BookSide::Bid, price, size).unwrap();
    }

    #[test]
    fn insert_update_delete_sequence() {
        let mut b = MarketBook::new();
        apply_ok(&mut b, 0, BookOp::Insert, 100.0, 10);
        apply_ok(&mut b, 1, BookOp::Insert, 99.5, 20);
        assert_eq!(b.depth(BookSide::Bid), 2);

        apply_ok(&mut b, 1, BookOp::Update, 99.25, 25);
        assert_eq!(b.level(BookSide::Bid, 1).unwrap().size, 25);

        apply_ok(&mut b, 0, BookOp::Delete, 0.0, 0);
        assert_eq!(b.depth(BookSide::Bid), 1);
    }

    #[test]
    fn delete_at_zero_keeps_the_level_inserted_at_one() {
        let mut b = MarketBook::new();
        apply_ok(&mut b, 0, BookOp::Insert, 100.0, 10); // level A
        apply_ok(&mut b, 1, BookOp::Insert, 99.5, 20); // level B
        apply_ok(&mut b, 0, BookOp::Delete, 0.0, 0);

        assert_eq!(b.depth(BookSide::Bid), 1);
        let survivor = b.level(BookSide::Bid, 0).unwrap();
        assert_eq!(survivor.size, 20, "the level inserted at position 1 survives");
    }

    #[test]
    fn sides_are_independent_ladders() {
        let mut b = MarketBook::new();
        b.apply(0, BookOp::Insert, BookSide::Bid, 100.0, 10).unwrap();
        b.apply(0, BookOp::Insert, BookSide::Ask, 100.5, 5).unwrap();
        b.apply(0, BookOp::Delete, BookSide::Ask, 0.0, 0).unwrap();
        assert_eq!(b.depth(BookSide::Bid), 1);
        assert_eq!(b.depth(BookSide::Ask), 0);
    }

    #[test]
    fn out_of_range_positions_leave_book_unchanged() {
        let mut b = MarketBook::new();
        apply_ok(&mut b, 0, BookOp::Insert, 100.0, 10);
        let before = b.clone();

        // Insert beyond depth+0 gap, update/delete past the end.
        assert!(b.apply(5, BookOp::Insert, BookSide::Bid, 99.0, 1).is_err());
        assert!(b.apply(1, BookOp::Update, BookSide::Bid, 99.0, 1).is_err());
        assert!(b.apply(1, BookOp::Delete, BookSide::Bid, 0.0, 0).is_err());
        assert_eq!(b, before);
    }

    #[test]
    fn non_finite_price_is_rejected_without_mutation() {
        let mut b = MarketBook::new();
        let err = b
            .apply(0, BookOp::Insert, BookSide::Ask, f64::NAN, 10)
            .unwrap_err();
        assert!(matches!(err, BookError::Price(_)));
        assert!(b.is_empty());
    }

    #[test]
    fn volume_update_does_not_touch_levels() {
        let mut b = MarketBook::new();
        apply_ok(&mut b, 0, BookOp::Insert, 100.0, 10);
        b.update_volume(123_456);
        assert_eq!(b.last_volume(), Some(123_456));
        assert_eq!(b.depth(BookSide::Bid), 1);
    }

    #[test]
    fn reset_clears_levels_and_volume() {
        let mut b = MarketBook::new();
        apply_ok(&mut b, 0, BookOp::Insert, 100.0, 10);
        b.update_volume(99);
        b.reset();
        assert!(b.is_empty());
        assert_eq!(b.last_volume(), None);
        assert_eq!(b, MarketBook::new());
    }
}
