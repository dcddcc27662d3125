// Indicator math, per-timeframe scoring and cross-timeframe aggregation
pub mod aggregation;
pub mod indicators;
pub mod report;
pub mod timeframe_scoring;
pub mod trade_levels;

// Re-export commonly used types
pub use aggregation::aggregate;
pub use indicators::compute_snapshot;
pub use report::{ReportParts, format_report};
pub use timeframe_scoring::{TimeframeAnalysis, score_series};
pub use trade_levels::compute_levels;
