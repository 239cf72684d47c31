//! gwk-orders
//!
//! In-flight order tracking: the Open Order Registry.
//!
//! # Invariants
//!
//! 1. **Idempotent fill accumulation.** Executions are deduplicated by
//!    `exec_id`; replaying the same execution never double-counts quantity.
//! 2. **Filled is terminal.** Once an order's accumulated quantity reaches
//!    its requested quantity it is handed to the completion callback and
//!    (subject to the removal policy) removed from the registry — a later
//!    duplicate delivery for that id is a guaranteed no-op.
//! 3. **Unknown ids are no-ops, not errors.** At-least-once delivery means
//!    executions routinely arrive for orders already completed and removed.
//! 4. **Atomic per-event unit.** Lookup → append → fill check → completion
//!    callback → removal all happen under one registry lock, so a concurrent
//!    reader never observes a partially-updated order.

mod order;
mod registry;

pub use order::{CompletedOrder, Fill, OpenOrder, OrderStatus};
pub use registry::{Applied, FillRemoval, OpenOrderRegistry, RegistryError};
