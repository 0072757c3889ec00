//! Types library for the fixed-income back office
//!
//! Core type definitions shared by every service in the graph.
//!
//! # Modules
//! - `ids`: Identifiers (ProductId, TradeId, OrderId, InquiryId)
//! - `numeric`: `D-FFx` fractional price codec on the 1/256 grid
//! - `product`: Bonds and the security master
//! - `order`: Market-data orders and order books
//! - `pricing`: Mid/spread prices and two-way streams
//! - `execution`: Execution orders and venues
//! - `trade`: Booked trades
//! - `position`: Per-book positions
//! - `risk`: PV01 and bucketed sectors
//! - `inquiry`: Customer inquiries
//! - `record`: Keying and CSV rendering traits
//! - `errors`: Error taxonomy

pub mod errors;
pub mod execution;
pub mod ids;
pub mod inquiry;
pub mod numeric;
pub mod order;
pub mod position;
pub mod pricing;
pub mod product;
pub mod record;
pub mod risk;
pub mod trade;

pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::execution::*;
    pub use crate::ids::*;
    pub use crate::inquiry::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::position::*;
    pub use crate::pricing::*;
    pub use crate::product::*;
    pub use crate::record::*;
    pub use crate::risk::*;
    pub use crate::trade::*;
}
