//! gwk-dispatch
//!
//! The event dispatcher: the single consumer of gateway callback events and
//! the only public surface of the reconciliation core.
//!
//! # The one contract that matters
//!
//! Callbacks arrive from the transport-read loop, and the gateway's
//! semantics define an escaped fault there as fatal to the session. Every
//! entry point on [`GatewayDispatcher`] therefore returns `()`: internal
//! handlers return `Result`, and a thin boundary converts every error into a
//! report-and-continue action. Nothing above the boundary ever observes a
//! fault; the triggering event is dropped, not retried. Callers that need
//! strict consistency monitor the report stream.
//!
//! # Routing
//!
//! Routing is decided solely by the event's declared kind/code — the
//! error-code policy is a finite classification table in [`codes`], not
//! state-dependent logic. Side effects are issued synchronously, in the
//! order the session contract lists them per callback.

mod codes;
mod config;
mod dispatcher;
mod sinks;
mod state;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use codes::{classify, CodeClass};
pub use config::DispatchConfig;
pub use dispatcher::{DispatchError, GatewayDispatcher};
pub use sinks::{
    AlertSink, BroadcastModelBus, ExecutionRequester, ModelEvent, ModelEventBus, ReportSink,
    TracingAlerter, TracingReporter,
};
pub use state::SessionState;
