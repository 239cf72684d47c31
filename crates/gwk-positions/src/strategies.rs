//! Strategy registry: id-keyed lookup that breaks the order → strategy cycle.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use gwk_events::StrategyId;

use crate::position::PositionManager;

// ---------------------------------------------------------------------------
// StrategyEntry
// ---------------------------------------------------------------------------

/// One registered strategy: its market-depth subscription and its position.
///
/// Handed out as `Arc` so the dispatcher can use it after releasing the
/// registry lock.
#[derive(Debug)]
pub struct StrategyEntry {
    pub id: StrategyId,
    pub name: String,
    /// The depth subscription / ticker id whose market book this strategy
    /// trades from. Gateway error 317 targets a book through this id.
    pub ticker_id: i64,
    position: PositionManager,
}

impl StrategyEntry {
    pub fn position(&self) -> &PositionManager {
        &self.position
    }
}

// ---------------------------------------------------------------------------
// StrategyError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    /// Two strategies cannot share one depth subscription; the ticker id is
    /// how error events are routed back to a single book.
    TickerAlreadyRegistered { ticker_id: i64, existing: StrategyId },
}

impl std::fmt::Display for StrategyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyError::TickerAlreadyRegistered { ticker_id, existing } => write!(
                f,
                "ticker id {ticker_id} is already registered to {existing}"
            ),
        }
    }
}

impl std::error::Error for StrategyError {}

// ---------------------------------------------------------------------------
// StrategyRegistry
// ---------------------------------------------------------------------------

/// All registered strategies, addressable by [`StrategyId`] (order
/// completion path) and by ticker id (error-code 317 path).
#[derive(Debug, Default)]
pub struct StrategyRegistry {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<StrategyId, Arc<StrategyEntry>>,
    by_ticker: HashMap<i64, StrategyId>,
    next_id: u32,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a strategy and allocate its id.
    pub fn register(
        &self,
        name: impl Into<String>,
        ticker_id: i64,
    ) -> Result<StrategyId, StrategyError> {
        let mut inner = self.write();
        if let Some(&existing) = inner.by_ticker.get(&ticker_id) {
            return Err(StrategyError::TickerAlreadyRegistered { ticker_id, existing });
        }
        let id = StrategyId(inner.next_id);
        inner.next_id += 1;
        inner.by_ticker.insert(ticker_id, id);
        inner.entries.insert(
            id,
            Arc::new(StrategyEntry {
                id,
                name: name.into(),
                ticker_id,
                position: PositionManager::new(),
            }),
        );
        Ok(id)
    }

    pub fn get(&self, id: StrategyId) -> Option<Arc<StrategyEntry>> {
        self.read().entries.get(&id).cloned()
    }

    pub fn by_ticker(&self, ticker_id: i64) -> Option<Arc<StrategyEntry>> {
        let inner = self.read();
        let id = inner.by_ticker.get(&ticker_id)?;
        inner.entries.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup_both_ways() {
        let reg = StrategyRegistry::new();
        let a = reg.register("momentum", 101).unwrap();
        let b = reg.register("reversion", 102).unwrap();
        assert_ne!(a, b);

        assert_eq!(reg.get(a).unwrap().ticker_id, 101);
        assert_eq!(reg.by_ticker(102).unwrap().id, b);
        assert!(reg.by_ticker(999).is_none());
    }

    #[test]
    fn duplicate_ticker_is_rejected() {
        let reg = StrategyRegistry::new();
        let a = reg.register("momentum", 101).unwrap();
        let err = reg.register("copycat", 101).unwrap_err();
        assert_eq!(
            err,
            StrategyError::TickerAlreadyRegistered {
                ticker_id: 101,
                existing: a
            }
        );
        assert_eq!(reg.len(), 1);
    }
}
