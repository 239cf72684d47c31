//! Account-code first-use barrier.

use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Process-wide account code, set once asynchronously by the account-value
/// callback.
///
/// Readers that need the code before it is known block in [`wait`] (contract:
/// block, don't poll-fail); the first [`set`] wakes all of them. Later sets
/// overwrite — the gateway re-sends account values on reconnect — but never
/// clear.
///
/// [`wait`]: AccountCodeCell::wait
/// [`set`]: AccountCodeCell::set
#[derive(Debug, Default)]
pub struct AccountCodeCell {
    slot: Mutex<Option<String>>,
    ready: Condvar,
}

impl AccountCodeCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the code and wake every blocked waiter.
    pub fn set(&self, code: impl Into<String>) {
        let mut slot = self.lock();
        *slot = Some(code.into());
        self.ready.notify_all();
    }

    /// Non-blocking probe.
    pub fn get(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Block until the code has been set at least once.
    pub fn wait(&self) -> String {
        let mut slot = self.lock();
        loop {
            if let Some(code) = slot.as_ref() {
                return code.clone();
            }
            slot = self
                .ready
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block until the code is set or `timeout` elapses. `None` on timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<String> {
        let deadline = std::time::Instant::now() + timeout;
        let mut slot = self.lock();
        loop {
            if let Some(code) = slot.as_ref() {
                return Some(code.clone());
            }
            let remaining = deadline.checked_duration_since(std::time::Instant::now())?;
            let (guard, result) = self
                .ready
                .wait_timeout(slot, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            slot = guard;
            if result.timed_out() && slot.is_none() {
                return None;
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
