//! Process configuration
//!
//! Loaded from an optional JSON file. Every section falls back to its
//! defaults, so `{}` is a complete configuration.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use execution::AlgoExecutionConfig;
use market_data::MarketDataConfig;
use pricing::GuiConfig;
use simulation::GeneratorConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the four input files
    pub data_dir: PathBuf,
    /// Directory receiving gui.txt and the history files
    pub output_dir: PathBuf,
    pub market_data: MarketDataConfig,
    pub gui: GuiConfig,
    pub algo_execution: AlgoExecutionConfig,
    pub generator: GeneratorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            market_data: MarketDataConfig::default(),
            gui: GuiConfig::default(),
            algo_execution: AlgoExecutionConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.market_data.book_depth > 0,
            "Book depth must be greater than 0"
        );
        anyhow::ensure!(
            self.gui.throttle_millis >= 0,
            "GUI throttle cannot be negative: {}",
            self.gui.throttle_millis
        );
        anyhow::ensure!(
            self.algo_execution.max_spread > Decimal::ZERO,
            "Algo execution max spread must be positive: {}",
            self.algo_execution.max_spread
        );
        self.generator
            .validate()
            .context("Invalid generator configuration")?;
        anyhow::ensure!(
            self.generator.market_data_per_product % self.market_data.batch_size() == 0,
            "Market data per product ({}) must be a multiple of the snapshot size ({})",
            self.generator.market_data_per_product,
            self.market_data.batch_size()
        );

        Ok(())
    }

    /// GUI output, resolved against `output_dir` when relative
    pub fn gui_path(&self) -> PathBuf {
        if self.gui.output_path.is_relative() {
            self.output_dir.join(&self.gui.output_path)
        } else {
            self.gui.output_path.clone()
        }
    }
}
