// Domain types and value objects
pub mod instrument;
pub mod market_sample;
pub mod signal;
pub mod timeframe;

// Re-export commonly used types
pub use instrument::{AssetClass, Instrument};
pub use market_sample::MarketSample;
pub use signal::{Direction, Signal};
pub use timeframe::{Timeframe, parse_timeframes};
