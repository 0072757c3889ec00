//! Pricing Service
//!
//! Mid/spread prices from `prices.txt`, fanned out to:
//! - Algo streaming: two-way quotes with alternating size
//! - Streaming: publication of those quotes
//! - GUI: throttled snapshot file
//!
//! ```text
//! prices.txt ─► Pricing ─┬─► GUI ─► gui.txt
//!                        └─► AlgoStreaming ─► Streaming
//! ```

pub mod algo_streaming;
pub mod gui;
pub mod pricing;
pub mod streaming;

pub use algo_streaming::{AlgoStreamingService, PricingToAlgoStreamingListener};
pub use gui::{GuiConfig, GuiConnector, GuiService, PricingToGuiListener};
pub use pricing::{PricingConnector, PricingService};
pub use streaming::{AlgoStreamingToStreamingListener, StreamingConnector, StreamingService};

pub const SERVICE_VERSION: &str = "0.1.0";
