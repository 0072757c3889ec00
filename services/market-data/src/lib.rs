//! Market Data Service
//!
//! Consumes order records and produces:
//! - Order book snapshots, one per `2 * book_depth` records
//! - Best bid/offer per product
//! - Depth aggregated by price level
//!
//! # Architecture
//!
//! ```text
//! marketdata.txt
//!        │
//!    ┌───▼───┐
//!    │Ingest │  ← Decodes, batches per product
//!    └───┬───┘
//!        │ OrderBook
//!    ┌───▼───┐
//!    │ Store │  ← Latest book per product
//!    └───┬───┘
//!        │
//!   listeners (algo execution)
//! ```

pub mod ingestion;
pub mod order_book;

pub use ingestion::{MarketDataConfig, MarketDataConnector};
pub use order_book::MarketDataService;

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
