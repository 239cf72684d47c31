//! Shared session state the dispatcher reconciles events into.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, PoisonError};

use gwk_book::MarketBook;
use gwk_orders::OpenOrderRegistry;
use gwk_positions::StrategyRegistry;
use gwk_session::{AccountCodeCell, ConnectivityCell};

/// Everything the dispatcher mutates, shared (behind `Arc`) with the order
/// placement subsystem and reporting readers on other threads.
///
/// # Locking map
/// - `books`: one mutex over the map; per-instrument ordering comes from the
///   single transport-read context, so finer granularity buys nothing.
/// - `orders` / `strategies` / `account` / `connectivity`: each internally
///   synchronized (see their crates).
/// - `next_order_id`: plain atomic; the gateway guarantees monotonicity.
#[derive(Debug, Default)]
pub struct SessionState {
    books: Mutex<HashMap<i64, MarketBook>>,
    pub orders: OpenOrderRegistry,
    pub strategies: StrategyRegistry,
    pub account: AccountCodeCell,
    pub connectivity: ConnectivityCell,
    /// 0 = not yet announced by the gateway.
    next_order_id: AtomicI64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the book for `ticker_id`, creating an empty book on
    /// first touch (subscriptions the placement side set up may deliver
    /// depth before any local bookkeeping sees the ticker).
    pub fn with_book<T>(&self, ticker_id: i64, f: impl FnOnce(&mut MarketBook) -> T) -> T {
        let mut books = self.lock_books();
        f(books.entry(ticker_id).or_default())
    }

    /// Clone-out snapshot of one book, if it exists.
    pub fn book_snapshot(&self, ticker_id: i64) -> Option<MarketBook> {
        self.lock_books().get(&ticker_id).cloned()
    }

    /// Record the next usable order id announced by the gateway.
    pub fn set_next_order_id(&self, order_id: i64) {
        self.next_order_id.store(order_id, Ordering::SeqCst);
    }

    /// Consume one order id for placement. `None` until the gateway has
    /// announced the first valid id.
    pub fn take_next_order_id(&self) -> Option<i64> {
        self.next_order_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                (current != 0).then_some(current + 1)
            })
            .ok()
    }

    fn lock_books(&self) -> std::sync::MutexGuard<'_, HashMap<i64, MarketBook>> {
        self.books.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
