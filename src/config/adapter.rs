//! Data adapter configuration.

/// Limits applied around every timeframe fetch
pub struct FetchConfig {
    /// Per-timeframe fetch timeout (milliseconds)
    pub timeout_ms: u64,
}

pub const FETCH: FetchConfig = FetchConfig {
    timeout_ms: 8_000,
};
