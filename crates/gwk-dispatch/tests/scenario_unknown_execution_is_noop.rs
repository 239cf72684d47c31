//! Executions referencing unknown order ids must leave state unchanged:
//! at-least-once delivery routinely replays executions for orders that have
//! already completed and left the registry.

use gwk_dispatch::testkit::{exec_report, TestHarness};

#[test]
fn scenario_unknown_order_id_leaves_state_unchanged() {
    let h = TestHarness::new();
    let strategy = h.register_strategy("momentum", 101);
    h.track_order(10, strategy, 100);

    // A stream of executions for ids nobody is tracking.
    for (i, order_id) in [99, 11, -1, 0].iter().enumerate() {
        h.dispatcher
            .exec_details(&exec_report(*order_id, &format!("e{i}"), 50, 100.0));
    }

    // The tracked order is untouched, nothing was reported as a fault.
    assert_eq!(h.state.orders.open_count(), 1);
    assert!(h.state.orders.contains(10));
    assert_eq!(h.state.orders.snapshot()[0].filled_qty(), 0);
    assert!(h.reporter.lines().is_empty(), "a no-op is not a fault");

    let pos = h.state.strategies.get(strategy).unwrap().position().snapshot();
    assert!(pos.is_flat());
}

#[test]
fn scenario_unknown_order_id_swallows_invalid_payloads() {
    let h = TestHarness::new();

    // The payload never gets validated: the id lookup short-circuits first,
    // so even a garbage price on an untracked id is silent.
    h.dispatcher.exec_details(&exec_report(999, "e1", 50, f64::NAN));

    assert_eq!(h.state.orders.open_count(), 0);
    assert!(
        h.reporter.lines().is_empty(),
        "an untracked id is a no-op, not a fault"
    );
}

#[test]
fn scenario_execution_after_completion_is_a_noop() {
    let h = TestHarness::new();
    let strategy = h.register_strategy("momentum", 101);
    h.track_order(10, strategy, 100);

    h.dispatcher.exec_details(&exec_report(10, "e1", 100, 50.0));
    assert!(!h.state.orders.contains(10), "filled order must be removed");

    // Late redelivery of the same execution, and a fresh exec id too.
    h.dispatcher.exec_details(&exec_report(10, "e1", 100, 50.0));
    h.dispatcher.exec_details(&exec_report(10, "e2", 100, 50.0));

    let pos = h.state.strategies.get(strategy).unwrap().position().snapshot();
    assert_eq!(pos.qty, 100, "duplicates must not change the position");
}
