//! Execution Service
//!
//! Turns market data into executed orders and booked trades:
//! - Algo execution: crosses the spread on tight books, alternating sides
//! - Execution: two notification stages (record-keeping, then execution)
//! - Trade booking: trades from `trades.txt` and from executions
//!
//! ```text
//! MarketData ─► AlgoExecution ─► Execution ─┬─(stage 1)─► record keepers
//!                                            └─(stage 2)─► TradeBooking
//! ```

pub mod algo_execution;
pub mod execution;
pub mod trade_booking;

pub use algo_execution::{
    AlgoExecutionConfig, AlgoExecutionService, MarketDataToAlgoExecutionListener,
};
pub use execution::{AlgoExecutionToExecutionListener, ExecutionConnector, ExecutionService};
pub use trade_booking::{
    ExecutionToTradeBookingListener, TradeBookingConnector, TradeBookingService,
};

pub const SERVICE_VERSION: &str = "0.1.0";
