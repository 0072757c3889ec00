//! Traits shared by every entity that flows through a service

use std::fmt;

/// An entity stored under a key derived from itself.
///
/// Services use this for last-write-wins storage in `on_message`.
pub trait Keyed {
    type Key: Ord + Clone + fmt::Display + Send + Sync;

    fn key(&self) -> Self::Key;
}

/// An entity that can be written as one comma-separated line.
///
/// Fields are rendered exactly as they appear in output files (prices in
/// `D-FFx` notation); sinks prepend their own timestamp.
pub trait CsvRecord {
    fn fields(&self) -> Vec<String>;
}
