// Timeframe data providers and fixtures
pub mod fixture;
pub mod series_file;
pub mod source;
pub mod synthetic;

// Re-export commonly used types
pub use fixture::FixtureSource;
pub use series_file::{SeriesFile, SeriesFileSource};
pub use source::{PrioritySource, TimeframeSource};
