//! Error 317 clears exactly the targeted strategy's book; other instruments'
//! books are untouched.

use gwk_book::BookSide;
use gwk_dispatch::testkit::TestHarness;
use gwk_events::DepthDelta;

fn insert(h: &TestHarness, ticker_id: i64, position: usize, price: f64, size: i64) {
    h.dispatcher.update_market_depth(&DepthDelta {
        ticker_id,
        position,
        operation: 0, // insert
        side: 1,      // bid
        price,
        size,
    });
}

#[test]
fn scenario_depth_reset_clears_only_the_targeted_book() {
    let h = TestHarness::new();
    h.register_strategy("momentum", 101);
    h.register_strategy("reversion", 102);

    insert(&h, 101, 0, 100.0, 10);
    insert(&h, 101, 1, 99.5, 20);
    insert(&h, 102, 0, 50.0, 5);

    h.dispatcher.error(101, 317, "Market depth data has been reset.");

    let reset_book = h.state.book_snapshot(101).unwrap();
    assert!(reset_book.is_empty(), "targeted book must be empty");

    let other_book = h.state.book_snapshot(102).unwrap();
    assert_eq!(other_book.depth(BookSide::Bid), 1, "other books untouched");

    assert!(h.reporter.contains("Market depth data has been reset."));
    assert!(h.alerter.sent().is_empty(), "317 is alert-suppressed");
}

#[test]
fn scenario_depth_reset_for_unknown_ticker_is_contained() {
    let h = TestHarness::new();

    h.dispatcher.error(999, 317, "Market depth data has been reset.");

    assert!(h.reporter.contains("unregistered ticker id 999"));
    // The textual report of the code itself still happened first.
    assert!(h.reporter.contains("317: Market depth data has been reset."));
}
