//! Risk Engine Service
//!
//! Position keeping and interest-rate risk:
//! - Positions per product and book from booked trades
//! - PV01 per security from the injected PV01 table
//! - Bucketed sector risk (FrontEnd, Belly, LongEnd)

pub mod engine;
pub mod exposure;
pub mod position;

pub use engine::{PositionToRiskListener, RiskService};
pub use position::{PositionService, TradeBookingToPositionListener};
