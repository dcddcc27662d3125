//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet. All of them are further gated by `cfg(debug_assertions)`.

/// Emit the indicator snapshot and score breakdown for every timeframe.
pub const PRINT_TIMEFRAME_SCORING: bool = false;

/// Emit bull/bear totals and the gate decisions of the aggregator.
pub const PRINT_AGGREGATION: bool = false;

/// Emit per-timeframe fetch outcomes (bar counts, ages, fallbacks).
pub const PRINT_FETCH_EVENTS: bool = false;

/// Emit details of series file (de)serialization.
pub const PRINT_SERDE: bool = false;
