//! The boundary contract: a fault inside any entry point never propagates to
//! the transport-read loop. The call returns normally and a report records
//! the dropped event.

use gwk_dispatch::testkit::{exec_report, TestHarness};
use gwk_events::DepthDelta;

#[test]
fn scenario_unknown_depth_operation_code_is_contained() {
    let h = TestHarness::new();

    h.dispatcher.update_market_depth(&DepthDelta {
        ticker_id: 7,
        position: 0,
        operation: 42, // not insert/update/delete
        side: 1,
        price: 100.0,
        size: 10,
    });

    assert!(h.reporter.contains("unknown depth operation code: 42"));
    assert!(
        h.state.book_snapshot(7).is_none(),
        "a rejected delta must not create or mutate a book"
    );
}

#[test]
fn scenario_unknown_depth_side_code_is_contained() {
    let h = TestHarness::new();
    h.dispatcher.update_market_depth(&DepthDelta {
        ticker_id: 7,
        position: 0,
        operation: 0,
        side: 5,
        price: 100.0,
        size: 10,
    });
    assert!(h.reporter.contains("unknown depth side code: 5"));
}

#[test]
fn scenario_out_of_range_depth_position_is_contained() {
    let h = TestHarness::new();
    // Update on an empty ladder.
    h.dispatcher.update_market_depth(&DepthDelta {
        ticker_id: 7,
        position: 3,
        operation: 1,
        side: 1,
        price: 100.0,
        size: 10,
    });
    assert!(h.reporter.contains("position 3"));
}

#[test]
fn scenario_non_finite_execution_price_is_contained() {
    let h = TestHarness::new();
    let strategy = h.register_strategy("momentum", 101);
    h.track_order(10, strategy, 100);

    h.dispatcher.exec_details(&exec_report(10, "e1", 100, f64::NAN));

    assert!(h.reporter.contains("non-finite"));
    // The event was dropped before touching the registry.
    assert!(h.state.orders.contains(10));
    assert_eq!(h.state.orders.snapshot()[0].filled_qty(), 0);
}

#[test]
fn scenario_every_entry_point_survives_a_hostile_event() {
    let h = TestHarness::new();

    // None of these may panic or propagate; most should leave a report.
    h.dispatcher.error(i64::MIN, 317, "reset for nobody");
    h.dispatcher.update_market_depth(&DepthDelta {
        ticker_id: -5,
        position: usize::MAX,
        operation: -1,
        side: -1,
        price: f64::INFINITY,
        size: i64::MIN,
    });
    h.dispatcher.exec_details(&exec_report(0, "", 0, f64::NAN));
    h.dispatcher.tick_size(-5, i32::MAX, i64::MIN);
    h.dispatcher.update_account_value("", "", "", "");
    h.dispatcher.error_message("");
    h.dispatcher.next_valid_id(i64::MIN);

    assert!(
        !h.reporter.lines().is_empty(),
        "contained faults must be visible in the report stream"
    );
}
