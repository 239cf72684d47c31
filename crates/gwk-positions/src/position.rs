//! Position state and the single mutation entry point.

use std::sync::{Mutex, PoisonError};

use gwk_events::ExecutionSide;
use gwk_orders::CompletedOrder;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Net position for one strategy. Signed quantity: +long, -short.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub qty: i64,
    /// Average entry price in integer micros. Zero when flat.
    pub avg_price_micros: i64,
}

impl Position {
    pub fn is_flat(&self) -> bool {
        self.qty == 0
    }
}

// ---------------------------------------------------------------------------
// PositionError
// ---------------------------------------------------------------------------

/// Faults raised while applying a completed order.
///
/// Any of these leaves the position unmodified. The dispatcher boundary
/// reports them; with fail-closed retention enabled the triggering order
/// stays in the open-order registry for a later retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    /// Completed order carried a non-positive quantity.
    NonPositiveQuantity { order_id: i64, quantity: i64 },
    /// Netting the order into the position would overflow `i64`.
    QuantityOverflow { order_id: i64 },
}

impl std::fmt::Display for PositionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionError::NonPositiveQuantity { order_id, quantity } => write!(
                f,
                "completed order {order_id} has non-positive quantity {quantity}"
            ),
            PositionError::QuantityOverflow { order_id } => {
                write!(f, "applying completed order {order_id} overflows position qty")
            }
        }
    }
}

impl std::error::Error for PositionError {}

// ---------------------------------------------------------------------------
// PositionManager
// ---------------------------------------------------------------------------

/// Owns one strategy's [`Position`]; internally synchronized so the
/// dispatcher writes while reporting readers on other threads take
/// consistent snapshots.
///
/// Exactly-once discipline is not enforced here — it is guaranteed upstream
/// by the open-order registry removing an order the moment its completion
/// apply succeeds.
#[derive(Debug, Default)]
pub struct PositionManager {
    position: Mutex<Position>,
}

impl PositionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Net a completed order into the position.
    ///
    /// Average entry price handling:
    /// - opening or adding to a position → quantity-weighted average;
    /// - reducing toward flat → average unchanged;
    /// - flat after the order → average reset to 0;
    /// - direction flip → the residual position opens at the order's price.
    ///
    /// # Errors
    /// See [`PositionError`]. All validation happens before any mutation.
    pub fn apply_completed(&self, order: &CompletedOrder) -> Result<(), PositionError> {
        if order.quantity <= 0 {
            return Err(PositionError::NonPositiveQuantity {
                order_id: order.order_id,
                quantity: order.quantity,
            });
        }

        let delta = match order.side {
            ExecutionSide::Buy => order.quantity,
            ExecutionSide::Sell => -order.quantity,
        };

        let mut pos = self.lock();
        let old = *pos;

        let new_qty = old
            .qty
            .checked_add(delta)
            .ok_or(PositionError::QuantityOverflow {
                order_id: order.order_id,
            })?;

        let new_avg = if new_qty == 0 {
            0
        } else if old.qty == 0 || old.qty.signum() != new_qty.signum() {
            // Fresh position, or flipped through zero: residual opens at the
            // order's price.
            order.avg_price_micros
        } else if new_qty.abs() > old.qty.abs() {
            // Added to the position: weight the average over both lots.
            let old_abs = old.qty.abs() as i128;
            let add_abs = delta.abs() as i128;
            let notional =
                old.avg_price_micros as i128 * old_abs + order.avg_price_micros as i128 * add_abs;
            (notional / (old_abs + add_abs)) as i64
        } else {
            // Reduced toward flat: entry average is unchanged.
            old.avg_price_micros
        };

        *pos = Position {
            qty: new_qty,
            avg_price_micros: new_avg,
        };
        Ok(())
    }

    /// Consistent point-in-time copy for readers.
    pub fn snapshot(&self) -> Position {
        *self.lock()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Position> {
        self.position.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use gwk_events::StrategyId;

    fn completed(side: ExecutionSide, qty: i64, price_micros: i64) -> CompletedOrder {
        CompletedOrder {
            order_id: 1,
            strategy: StrategyId(0),
            symbol: "ES".to_string(),
            side,
            quantity: qty,
            avg_price_micros: price_micros,
        }
    }

    #[test]
    fn open_then_add_weights_average() {
        let pm = PositionManager::new();
        pm.apply_completed(&completed(ExecutionSide::Buy, 100, 10_000_000))
            .unwrap();
        pm.apply_completed(&completed(ExecutionSide::Buy, 100, 12_000_000))
            .unwrap();
        let p = pm.snapshot();
        assert_eq!(p.qty, 200);
        assert_eq!(p.avg_price_micros, 11_000_000);
    }

    #[test]
    fn reduce_keeps_entry_average() {
        let pm = PositionManager::new();
        pm.apply_completed(&completed(ExecutionSide::Buy, 100, 10_000_000))
            .unwrap();
        pm.apply_completed(&completed(ExecutionSide::Sell, 40, 15_000_000))
            .unwrap();
        let p = pm.snapshot();
        assert_eq!(p.qty, 60);
        assert_eq!(p.avg_price_micros, 10_000_000);
    }

    #[test]
    fn flat_resets_average() {
        let pm = PositionManager::new();
        pm.apply_completed(&completed(ExecutionSide::Buy, 100, 10_000_000))
            .unwrap();
        pm.apply_completed(&completed(ExecutionSide::Sell, 100, 15_000_000))
            .unwrap();
        assert_eq!(pm.snapshot(), Position::default());
    }

    #[test]
    fn flip_opens_residual_at_order_price() {
        let pm = PositionManager::new();
        pm.apply_completed(&completed(ExecutionSide::Buy, 100, 10_000_000))
            .unwrap();
        pm.apply_completed(&completed(ExecutionSide::Sell, 150, 15_000_000))
            .unwrap();
        let p = pm.snapshot();
        assert_eq!(p.qty, -50);
        assert_eq!(p.avg_price_micros, 15_000_000);
    }

    #[test]
    fn failed_apply_leaves_position_unmodified() {
        let pm = PositionManager::new();
        pm.apply_completed(&completed(ExecutionSide::Buy, 100, 10_000_000))
            .unwrap();
        let before = pm.snapshot();

        let err = pm
            .apply_completed(&completed(ExecutionSide::Buy, 0, 10_000_000))
            .unwrap_err();
        assert!(matches!(err, PositionError::NonPositiveQuantity { .. }));
        assert_eq!(pm.snapshot(), before);

        let err = pm
            .apply_completed(&completed(ExecutionSide::Buy, i64::MAX, 10_000_000))
            .unwrap_err();
        assert!(matches!(err, PositionError::QuantityOverflow { .. }));
        assert_eq!(pm.snapshot(), before);
    }
}
