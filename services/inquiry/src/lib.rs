//! Inquiry Service
//!
//! Customer inquiries from `inquiries.txt` move through
//!
//! ```text
//! RECEIVED ─► quote sent (QUOTED) ─► DONE
//!     └──────► REJECTED
//! ```
//!
//! Completed inquiries are stored by inquiry id and fanned out to the
//! historical sink.

pub mod ingestion;
pub mod lifecycle;

pub use ingestion::InquiryConnector;
pub use lifecycle::InquiryService;

pub const SERVICE_VERSION: &str = "0.1.0";
