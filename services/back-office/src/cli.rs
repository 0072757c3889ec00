//! # Command Line Interface

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Fixed-income back office over file inputs
#[derive(Parser, Debug)]
#[command(name = "back-office")]
#[command(about = "Run the fixed-income back office over the input files")]
pub struct Cli {
    /// Regenerate the four input files before the run
    #[arg(long)]
    pub init: bool,

    /// Directory holding the input files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory receiving gui.txt and the history files
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Generator seed used with --init
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    /// Configuration from `--config` (or defaults) with flags applied on top.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(seed) = self.seed {
            config.generator.seed = seed;
        }

        config.validate()?;
        Ok(config)
    }
}
