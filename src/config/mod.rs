//! Configuration module for the confluence engine.

pub mod adapter;
pub mod analysis;

pub mod debug;

pub mod instruments;
pub mod levels;
pub mod persistence;

// Re-export commonly used items
pub use adapter::FETCH;
pub use analysis::{ANALYSIS, AnalysisConfig};
pub use instruments::{INSTRUMENTS, InstrumentSpec, provider_symbol};
pub use levels::{LEVEL_PROFILES, LevelProfile, decimals_for_price, level_profile};
pub use persistence::{SERIES_PATH, SERIES_VERSION, series_bundle_filename};
