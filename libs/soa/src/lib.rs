//! Service-oriented dataflow framework
//!
//! Every component of the back office is a `Service`: a keyed store of the
//! latest value per key that pushes each update to its registered
//! `ServiceListener`s. Data enters and leaves through a `Connector`.
//!
//! # Modules
//! - `service`: `Service` trait and the reusable `Store`
//! - `listener`: `ServiceListener` trait, fan-out, shared service handles
//! - `connector`: `Connector` trait, CSV subscription driver, file sinks
//! - `clock`: Injectable wall clock and timestamp formatting

pub mod clock;
pub mod connector;
pub mod listener;
pub mod service;

pub use clock::{format_timestamp, Clock, ManualClock, SystemClock};
pub use connector::{subscribe, subscribe_file, Connector, CsvFileSink, Fields, NoConnector};
pub use listener::{notify, shared, ServiceListener, Shared};
pub use service::{Service, Store};
