//! The registry: order id → [`OpenOrder`], internally synchronized.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::order::{CompletedOrder, Fill, OpenOrder};

// ---------------------------------------------------------------------------
// FillRemoval
// ---------------------------------------------------------------------------

/// What to do with a filled order whose completion callback failed.
///
/// A failed position apply is the one place the design forks: removing the
/// order anyway silently drops the position update; retaining it lets a
/// re-requested execution stream retry the apply. The dispatcher chooses per
/// its config; the registry only executes the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRemoval {
    /// Remove on fill no matter what the callback returned.
    Always,
    /// Remove only when the completion callback succeeded (fail-closed).
    OnSuccessOnly,
}

// ---------------------------------------------------------------------------
// Applied
// ---------------------------------------------------------------------------

/// Outcome of applying one execution event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// No order with that id — duplicate or late delivery. State unchanged.
    Unknown,
    /// Execution recorded; the order is still working.
    Accumulated { filled_qty: i64, remaining: i64 },
    /// The order reached full fill; the completion callback ran and the
    /// order was removed from the registry.
    Completed(CompletedOrder),
}

// ---------------------------------------------------------------------------
// RegistryError
// ---------------------------------------------------------------------------

/// Faults raised by registry bookkeeping itself (not by completion callbacks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// An order with this id is already tracked; the placement subsystem
    /// must not reuse gateway order ids.
    DuplicateOrderId(i64),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::DuplicateOrderId(id) => {
                write!(f, "order id {id} is already tracked in the registry")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

// ---------------------------------------------------------------------------
// OpenOrderRegistry
// ---------------------------------------------------------------------------

/// Internally synchronized map of in-flight orders.
///
/// # Concurrency
/// One mutex guards the whole map. The dispatcher's per-event unit
/// (lookup → append → fill check → completion callback → removal) runs under
/// a single lock acquisition, so reporting readers on other threads never
/// observe an order with a fill appended but its completion pending.
///
/// Lock poisoning is recovered (`PoisonError::into_inner`): the map is only
/// mutated through methods that uphold its invariants before returning, and
/// the session's continuity-over-halting posture applies here too.
#[derive(Debug, Default)]
pub struct OpenOrderRegistry {
    orders: Mutex<HashMap<i64, OpenOrder>>,
}

impl OpenOrderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly placed order. Called by the order-placement subsystem.
    pub fn insert(&self, order: OpenOrder) -> Result<(), RegistryError> {
        let mut orders = self.lock();
        if orders.contains_key(&order.order_id) {
            return Err(RegistryError::DuplicateOrderId(order.order_id));
        }
        orders.insert(order.order_id, order);
        Ok(())
    }

    /// Apply one execution event as a single atomic unit.
    ///
    /// - Unknown `order_id` → [`Applied::Unknown`], nothing mutated.
    /// - Known order, not yet filled → fill appended (idempotent by
    ///   `exec_id`), [`Applied::Accumulated`].
    /// - Fill completes the order → `on_filled` runs with the completed
    ///   summary while the registry lock is held; on `Ok` the order is
    ///   removed, on `Err` the `removal` policy decides and the error is
    ///   propagated to the caller (the dispatcher boundary reports it).
    pub fn apply_execution<E>(
        &self,
        order_id: i64,
        fill: Fill,
        removal: FillRemoval,
        on_filled: impl FnOnce(&CompletedOrder) -> Result<(), E>,
    ) -> Result<Applied, E> {
        let mut orders = self.lock();

        let Some(order) = orders.get_mut(&order_id) else {
            return Ok(Applied::Unknown);
        };

        order.add_execution(fill);

        if !order.is_filled() {
            let filled_qty = order.filled_qty();
            return Ok(Applied::Accumulated {
                filled_qty,
                remaining: order.requested_qty - filled_qty,
            });
        }

        let completed = order.to_completed();
        match on_filled(&completed) {
            Ok(()) => {
                orders.remove(&order_id);
                Ok(Applied::Completed(completed))
            }
            Err(e) => {
                if removal == FillRemoval::Always {
                    orders.remove(&order_id);
                }
                Err(e)
            }
        }
    }

    pub fn contains(&self, order_id: i64) -> bool {
        self.lock().contains_key(&order_id)
    }

    pub fn open_count(&self) -> usize {
        self.lock().len()
    }

    /// Clone-out snapshot for reporting readers.
    pub fn snapshot(&self) -> Vec<OpenOrder> {
        let mut out: Vec<OpenOrder> = self.lock().values().cloned().collect();
        out.sort_by_key(|o| o.order_id);
        out
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<i64, OpenOrder>> {
        self.orders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
