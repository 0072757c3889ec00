//! Error types for the back-office service graph
//!
//! One taxonomy shared by every service and connector, using thiserror

use std::fmt;
use thiserror::Error;

/// Errors produced by the `D-FFx` price codec
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceParseError {
    #[error("Empty price string")]
    Empty,

    #[error("Missing '-' between handle and fraction: {0}")]
    MissingSeparator(String),

    #[error("Invalid integer handle: {0}")]
    InvalidHandle(String),

    #[error("Invalid 32nds fraction: {0}")]
    InvalidFraction(String),
}

/// Data-movement direction of a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Publish,
    Subscribe,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Publish => write!(f, "publish"),
            Direction::Subscribe => write!(f, "subscribe"),
        }
    }
}

/// Top-level service error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Not found: {key}")]
    NotFound { key: String },

    #[error("Parse error at line {line}: {reason}")]
    Parse { line: u64, reason: String },

    #[error("Invalid price: {0}")]
    Price(#[from] PriceParseError),

    #[error("Order book for {product} has no quotes")]
    EmptyBook { product: String },

    #[error("Connector {connector} does not support {direction}")]
    Config {
        connector: String,
        direction: Direction,
    },

    #[error("{} listener(s) failed: {}", .0.len(), format_failures(.0))]
    FanOut(Vec<ListenerFailure>),

    #[error("IO error on {path}: {reason}")]
    Io { path: String, reason: String },
}

impl ServiceError {
    pub fn not_found(key: impl fmt::Display) -> Self {
        ServiceError::NotFound {
            key: key.to_string(),
        }
    }

    pub fn parse(line: u64, reason: impl Into<String>) -> Self {
        ServiceError::Parse {
            line,
            reason: reason.into(),
        }
    }

    pub fn io(path: impl fmt::Display, err: &std::io::Error) -> Self {
        ServiceError::Io {
            path: path.to_string(),
            reason: err.to_string(),
        }
    }
}

/// A single listener failure collected during fan-out
#[derive(Debug, Clone, PartialEq)]
pub struct ListenerFailure {
    /// Position of the listener in registration order
    pub index: usize,
    pub error: ServiceError,
}

impl fmt::Display for ListenerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener #{}: {}", self.index, self.error)
    }
}

fn format_failures(failures: &[ListenerFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
