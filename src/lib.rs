#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod utils;

// The signal service
pub mod engine;

// Re-export commonly used types
pub use data::{FixtureSource, PrioritySource, SeriesFile, SeriesFileSource, TimeframeSource};
pub use domain::{AssetClass, Instrument, MarketSample, Signal, Timeframe};
pub use engine::SignalEngine;
pub use models::{AnalysisReport, SourceTag, TimeframeSeries};

// CLI argument parsing
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Series bundle to read (.bin or .json). Defaults to the bundle for the instrument
    /// under the series directory.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Instrument symbol, e.g. BTCUSD
    #[arg(long)]
    pub instrument: String,

    /// Comma-separated timeframe labels
    #[arg(long, value_delimiter = ',', default_value = "15m,1h,4h,1d")]
    pub timeframes: Vec<String>,

    /// Timeframe whose price and ATR set the trade levels
    #[arg(long, default_value = "1h")]
    pub primary: String,

    /// Pretty-print the JSON report
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

impl Cli {
    pub fn input_path(&self) -> PathBuf {
        self.input
            .clone()
            .unwrap_or_else(|| SeriesFile::default_path(&self.instrument, "bin"))
    }
}
