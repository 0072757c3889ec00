//! Back Office
//!
//! Builds every service, wires the listener graph, and drains the four
//! input files in order: prices, trades, market data, inquiries.
//!
//! ```text
//! prices.txt ─► Pricing ─┬─► GUI ─► gui.txt
//!                        └─► AlgoStreaming ─► Streaming ─► streaming.txt
//! marketdata.txt ─► MarketData ─► AlgoExecution ─► Execution
//!                                                    ├─► executions.txt
//!                                                    └─► TradeBooking
//! trades.txt ─► TradeBooking ─► Position ─┬─► Risk ─► risk.txt
//!                                         └─► positions.txt
//! inquiries.txt ─► Inquiry ─► allinquiries.txt
//! ```

pub mod cli;
pub mod config;
pub mod wiring;

pub use cli::Cli;
pub use config::Config;
pub use wiring::{run, BackOffice, RunSummary};
