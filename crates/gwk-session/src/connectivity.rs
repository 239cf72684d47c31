//! Gateway connectivity state machine.

use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// Connectivity of the gateway session.
///
/// Transitions (all driven by the dispatcher's error-code handler):
///
/// ```text
/// Connected ──1100──► Disconnected ──1101/1102──► Recovering ──► Connected
///                                                     │
///                               (re-request of executions completes)
/// ```
///
/// `Recovering` is entered before outstanding executions are re-requested
/// and left only after the re-request call returns, so no reader ever
/// observes `Connected` before recovery data has been asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityState {
    Disconnected,
    Connected,
    Recovering,
}

impl ConnectivityState {
    fn as_u8(self) -> u8 {
        match self {
            ConnectivityState::Disconnected => 0,
            ConnectivityState::Connected => 1,
            ConnectivityState::Recovering => 2,
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            1 => ConnectivityState::Connected,
            2 => ConnectivityState::Recovering,
            // Only `set` writes this cell, so other values cannot occur;
            // decode conservatively anyway.
            _ => ConnectivityState::Disconnected,
        }
    }
}

/// Tear-free connectivity cell. Single writer (the dispatcher), any number
/// of readers.
#[derive(Debug)]
pub struct ConnectivityCell(AtomicU8);

impl ConnectivityCell {
    /// Sessions start disconnected; the gateway announces connectivity.
    pub fn new() -> Self {
        Self(AtomicU8::new(ConnectivityState::Disconnected.as_u8()))
    }

    pub fn set(&self, state: ConnectivityState) {
        self.0.store(state.as_u8(), Ordering::SeqCst);
    }

    pub fn get(&self) -> ConnectivityState {
        ConnectivityState::from_u8(self.0.load(Ordering::SeqCst))
    }

    pub fn is_connected(&self) -> bool {
        self.get() == ConnectivityState::Connected
    }
}

impl Default for ConnectivityCell {
    fn default() -> Self {
        Self::new()
    }
}
