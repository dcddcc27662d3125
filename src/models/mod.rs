// Domain models for the confluence pipeline
// These modules hold plain data; the computations live in `analysis`

pub mod report;
pub mod snapshot;
pub mod timeseries;
pub mod verdict;

// Re-export key types for convenience
pub use report::{
    AnalysisReport, IndicatorSummary, MultiTimeframeSummary, TimeframeBreakdown, TradeLevels,
};
pub use snapshot::{IndicatorSnapshot, MacdState, StructureLabel};
pub use timeseries::{SourceTag, TimeframeSeries};
pub use verdict::{AggregateVerdict, TimeframeVerdict, TrendBucket};
