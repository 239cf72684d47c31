//! A full fill triggers exactly one position apply and exactly one registry
//! removal; the failed-apply fork follows the configured removal policy.

use gwk_dispatch::testkit::{exec_report, TestHarness};
use gwk_dispatch::DispatchConfig;
use gwk_events::{ExecutionSide, StrategyId};
use gwk_orders::OpenOrder;

#[test]
fn scenario_partial_fills_accumulate_then_apply_once() {
    let h = TestHarness::new();
    let strategy = h.register_strategy("momentum", 101);
    h.track_order(10, strategy, 100);

    h.dispatcher.exec_details(&exec_report(10, "e1", 40, 100.0));
    h.dispatcher.exec_details(&exec_report(10, "e2", 40, 100.0));

    // Still working: no position yet, order still tracked.
    let entry = h.state.strategies.get(strategy).unwrap();
    assert!(entry.position().snapshot().is_flat());
    assert!(h.state.orders.contains(10));

    h.dispatcher.exec_details(&exec_report(10, "e3", 20, 102.0));

    let pos = entry.position().snapshot();
    assert_eq!(pos.qty, 100);
    // 40@100 + 40@100 + 20@102, quantity-weighted.
    assert_eq!(pos.avg_price_micros, 100_400_000);
    assert!(!h.state.orders.contains(10));
}

#[test]
fn scenario_duplicate_partial_fill_does_not_double_count() {
    let h = TestHarness::new();
    let strategy = h.register_strategy("momentum", 101);
    h.track_order(10, strategy, 100);

    h.dispatcher.exec_details(&exec_report(10, "e1", 60, 100.0));
    // Transport redelivers the same execution.
    h.dispatcher.exec_details(&exec_report(10, "e1", 60, 100.0));

    assert!(h.state.orders.contains(10), "order must still be working");
    assert_eq!(h.state.orders.snapshot()[0].filled_qty(), 60);
}

#[test]
fn scenario_failed_apply_retains_order_by_default() {
    let h = TestHarness::new();
    let strategy = h.register_strategy("momentum", 101);

    // A sell order that flips the (flat) position past i64 range cannot be
    // built from valid fills, so provoke the apply failure with an absent
    // strategy: track an order pointing at a registry id that was never
    // registered.
    h.state
        .orders
        .insert(OpenOrder::new(
            11,
            StrategyId(99),
            "TEST",
            ExecutionSide::Buy,
            10,
        ))
        .unwrap();

    h.dispatcher.exec_details(&exec_report(11, "e1", 10, 100.0));

    // Fail-closed: fault reported, order retained for a later retry.
    assert!(h.reporter.contains("unknown strategy-99"));
    assert!(h.state.orders.contains(11));

    // The healthy strategy is unaffected.
    assert!(h
        .state
        .strategies
        .get(strategy)
        .unwrap()
        .position()
        .snapshot()
        .is_flat());
}

#[test]
fn scenario_failed_apply_removes_order_under_legacy_policy() {
    let h = TestHarness::with_config(DispatchConfig {
        retain_order_on_failed_apply: false,
    });
    h.state
        .orders
        .insert(OpenOrder::new(
            11,
            StrategyId(99),
            "TEST",
            ExecutionSide::Buy,
            10,
        ))
        .unwrap();

    h.dispatcher.exec_details(&exec_report(11, "e1", 10, 100.0));

    assert!(h.reporter.contains("unknown strategy-99"));
    assert!(
        !h.state.orders.contains(11),
        "legacy policy removes unconditionally"
    );
}
