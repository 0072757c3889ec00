//! Historical Data Service
//!
//! Append-only history of the values flowing through the back office.
//! One service instance per stream, each with its own output file:
//!
//! | Stream | File |
//! |---|---|
//! | positions | `positions.txt` |
//! | risk | `risk.txt` |
//! | executions | `executions.txt` |
//! | streaming | `streaming.txt` |
//! | inquiries | `allinquiries.txt` |
//!
//! Every line is `timestamp,<record fields...>`.

pub mod historical;
pub mod journal;
pub mod reader;

pub use historical::{HistoricalDataService, HistoricalListener};
pub use journal::{HistoryKind, JournalConnector};
pub use reader::{read_history, HistoryLine};
