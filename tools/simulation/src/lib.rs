//! Synthetic Input Generator
//!
//! Writes the four back-office input files from a seeded RNG, so a given
//! seed always produces byte-identical inputs.
//!
//! # Modules
//! - `config`: Generator sizes and seed
//! - `error`: Generation failures
//! - `walk`: Central price oscillating on the tick grid
//! - `generator`: Per-file generators and `generate_all`

pub mod config;
pub mod error;
pub mod generator;
pub mod walk;

pub use config::GeneratorConfig;
pub use error::GenerationError;
pub use generator::{generate_all, GeneratedFiles, InputGenerator};

/// Crate version constant
pub const VERSION: &str = "1.0.0";
