//! Determinism tests for the Market Data Service
//!
//! Validates that identical input files produce identical books and that
//! derived views stay consistent with the raw snapshot.
//!
//! Tests include:
//! - Dual replay comparison
//! - Quantity conservation under aggregation
//! - Fail-fast on a corrupted record mid-file

use std::sync::Arc;

use market_data::{MarketDataConfig, MarketDataService};
use soa::Service;
use types::errors::ServiceError;
use types::ids::ProductId;
use types::numeric::{format_fractional, from_ticks};
use types::product::SecurityMaster;

const PRODUCTS: [&str; 3] = ["91282CFX4", "91282CFV8", "912810TL2"];

/// Five-level books around 100, spread widening with the snapshot index.
fn build_scenario() -> String {
    let mut lines = Vec::new();
    for snapshot in 0..4i64 {
        for product in PRODUCTS {
            let mid = 25_600 + snapshot;
            for level in 0..5i64 {
                let bid = from_ticks(mid - 1 - level - snapshot);
                let offer = from_ticks(mid + 1 + level + snapshot);
                let qty = (level + 1) * 10_000_000;
                let (bid, offer) = (format_fractional(bid), format_fractional(offer));
                lines.push(format!("{},{},{},BID", product, bid, qty));
                lines.push(format!("{},{},{},OFFER", product, offer, qty));
            }
        }
    }
    lines.join("\n")
}

fn replay(input: &str) -> MarketDataService {
    let mut service = MarketDataService::new(
        MarketDataConfig { book_depth: 5 },
        Arc::new(SecurityMaster::treasuries()),
    );
    soa::subscribe(&mut service, input.as_bytes()).unwrap();
    service
}

/// Test 1: Two identical replays produce identical books.
#[test]
fn test_deterministic_replay_produces_identical_state() {
    let input = build_scenario();
    let first = replay(&input);
    let second = replay(&input);

    assert_eq!(first.books_built(), 12);
    for product in PRODUCTS {
        let id = ProductId::new(product);
        assert_eq!(first.get_data(&id).unwrap(), second.get_data(&id).unwrap());
        assert_eq!(
            first.get_best_bid_offer(&id).unwrap(),
            second.get_best_bid_offer(&id).unwrap()
        );
    }
}

/// Test 2: Last snapshot wins and its top of book is the tightest level.
#[test]
fn test_latest_snapshot_top_of_book() {
    let service = replay(&build_scenario());
    let bbo = service
        .get_best_bid_offer(&ProductId::new("91282CFV8"))
        .unwrap();

    // Snapshot 3: mid tick 25_603, inner levels 3 ticks further out each side
    assert_eq!(bbo.bid.price, from_ticks(25_599));
    assert_eq!(bbo.offer.price, from_ticks(25_607));
    assert_eq!(bbo.bid.quantity, 10_000_000);
}

/// Test 3: Aggregation never changes total quantity.
#[test]
fn test_aggregation_conserves_quantity() {
    let service = replay(&build_scenario());
    for product in PRODUCTS {
        let id = ProductId::new(product);
        let book = service.get_data(&id).unwrap();
        let depth = service.aggregate_depth(&id).unwrap();
        assert_eq!(depth.total_bid_quantity(), book.total_bid_quantity());
        assert_eq!(depth.total_offer_quantity(), book.total_offer_quantity());
        assert_eq!(depth.bid_stack().len(), 5);
    }
}

/// Test 4: A corrupted record aborts the pass at its line.
#[test]
fn test_corrupted_record_aborts() {
    let mut lines: Vec<String> = build_scenario().lines().map(str::to_string).collect();
    lines[13] = "91282CFX4,99-3x0,10000000,BID".to_string();
    let input = lines.join("\n");

    let mut service = MarketDataService::new(
        MarketDataConfig { book_depth: 5 },
        Arc::new(SecurityMaster::treasuries()),
    );
    let err = soa::subscribe(&mut service, input.as_bytes()).unwrap_err();

    assert!(matches!(err, ServiceError::Parse { line: 14, .. }));
    assert_eq!(service.books_built(), 1);
}
