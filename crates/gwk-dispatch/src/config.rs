//! Dispatcher configuration.

use serde::{Deserialize, Serialize};

/// Tunable dispatch behavior. All fields have safe defaults; deserialize
/// from the deployment's config document with `#[serde(default)]` semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// What to do with a filled order whose position apply failed.
    ///
    /// `true` (default): keep the order in the open-order registry so a
    /// re-delivered execution stream can retry the apply — fail-closed, no
    /// silent position loss.
    ///
    /// `false`: remove the order unconditionally on fill, accepting that a
    /// failed apply drops the position update with only the report stream as
    /// evidence. Matches the historical behavior of the session this core
    /// replaces; kept selectable for operators who depend on it.
    pub retain_order_on_failed_apply: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            retain_order_on_failed_apply: true,
        }
    }
}
