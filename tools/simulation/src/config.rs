//! Generator configuration

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Number of order levels per side in each market data snapshot
pub const SNAPSHOT_LEVELS: usize = 5;

/// Sizes and seed for one generation run.
///
/// Counts are per product; every product of the security master gets the
/// same number of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// RNG seed; identical seeds give identical files
    pub seed: u64,
    /// Lines of `prices.txt` per product
    pub prices_per_product: usize,
    /// Lines of `marketdata.txt` per product (multiple of 10)
    pub market_data_per_product: usize,
    /// Lines of `trades.txt` per product
    pub trades_per_product: usize,
    /// Lines of `inquiries.txt` per product
    pub inquiries_per_product: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            prices_per_product: 1000,
            market_data_per_product: 1000,
            trades_per_product: 10,
            inquiries_per_product: 10,
        }
    }
}

impl GeneratorConfig {
    /// Market data is written in whole snapshots of `2 × SNAPSHOT_LEVELS`
    /// lines.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let snapshot = 2 * SNAPSHOT_LEVELS;
        if self.market_data_per_product % snapshot != 0 {
            return Err(GenerationError::InvalidConfig(format!(
                "market_data_per_product {} is not a multiple of {}",
                self.market_data_per_product, snapshot
            )));
        }
        Ok(())
    }
}
