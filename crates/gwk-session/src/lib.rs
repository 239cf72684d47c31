//! gwk-session
//!
//! Session-scoped shared state: the gateway connectivity state machine and
//! the account-code first-use barrier.
//!
//! Both cells are written only from the dispatcher's transport-read context
//! and read from arbitrary threads, which fixes the synchronization budget:
//! an atomic for connectivity (tear-free visibility is all that is needed)
//! and a mutex + condvar for the account code (readers must be able to block
//! until the first write).

mod account;
mod connectivity;

pub use account::AccountCodeCell;
pub use connectivity::{ConnectivityCell, ConnectivityState};
