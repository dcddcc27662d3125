//! Analysis and scoring configuration

use crate::domain::Timeframe;

/// Periods used by the indicator calculator
#[derive(Debug, Clone, Copy)]
pub struct IndicatorSettings {
    pub ema_fast: usize,
    pub ema_mid: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub adx_period: usize,
    // Bars on each side that a swing high/low must strictly exceed
    pub swing_window: usize,
    // Below this many bars, market structure is always undefined
    pub min_structure_bars: usize,
    pub volume_recent_bars: usize,
    pub volume_baseline_bars: usize,
    pub volume_spike_ratio: f64,
}

/// Thresholds used by the per-timeframe scorer
#[derive(Debug, Clone, Copy)]
pub struct ScoringSettings {
    // ADX above which a trend counts as confirmed (trend term is doubled, weak signals allowed)
    pub adx_trending: f64,
    // ADX required for a strong signal
    pub adx_strong: f64,
    pub rsi_oversold: f64,
    pub rsi_soft_oversold: f64,
    pub rsi_soft_overbought: f64,
    pub rsi_overbought: f64,
    // Multiplier for an RSI extreme that runs against the prevailing trend
    pub rsi_counter_trend_boost: f64,
    pub strong_score: f64,
    pub plain_score: f64,
    pub weak_score: f64,
    pub volume_spike_dampening: f64,
    // Hard ceiling on any per-timeframe confidence
    pub max_confidence: f64,
    // Fraction of price below which two levels (price, EMAs, MACD histogram) count as equal
    pub level_tolerance: f64,
}

/// Confidence penalties for data that is not live or not recent
#[derive(Debug, Clone, Copy)]
pub struct FreshnessSettings {
    pub unconfirmed_live_price_factor: f64,
    pub over_max_age_factor: f64,
    // Data older than `max_age * exclusion_age_multiple` is not used at all
    pub exclusion_age_multiple: f64,
}

/// Cross-timeframe aggregation constants
#[derive(Debug, Clone, Copy)]
pub struct AggregationSettings {
    // Timeframes at or above this one take part in the conflict gate
    pub higher_timeframe_floor: Timeframe,
    pub conflict_confidence: f64,
    pub dominance_ratio: f64,
    pub min_net_score: f64,
    pub strong_net_score: f64,
    pub plain_net_score: f64,
    pub divergence_threshold_pct: f64,
    pub divergence_penalty: f64,
    pub neutral_confidence_per_point: f64,
    pub neutral_confidence_cap: f64,
}

/// Trade level constants shared by every asset class
#[derive(Debug, Clone, Copy)]
pub struct LevelSettings {
    // Stop distance is never tighter than this fraction of price
    pub min_stop_fraction: f64,
    pub trailing_activation_fraction: f64,
}

/// Report assembly limits
#[derive(Debug, Clone, Copy)]
pub struct ReportSettings {
    pub max_reasons: usize,
}

/// The Master Analysis Configuration
#[derive(Debug, Clone, Copy)]
pub struct AnalysisConfig {
    // Minimum number of bars a series needs before any indicator is computed
    pub min_series_len: usize,

    // Sub-groups
    pub indicators: IndicatorSettings,
    pub scoring: ScoringSettings,
    pub freshness: FreshnessSettings,
    pub aggregation: AggregationSettings,
    pub levels: LevelSettings,
    pub report: ReportSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    min_series_len: 20,

    indicators: IndicatorSettings {
        ema_fast: 9,
        ema_mid: 21,
        ema_slow: 50,
        rsi_period: 14,
        macd_fast: 12,
        macd_slow: 26,
        macd_signal: 9,
        adx_period: 14,
        swing_window: 2,
        min_structure_bars: 20,
        volume_recent_bars: 5,
        volume_baseline_bars: 20,
        volume_spike_ratio: 2.0,
    },

    scoring: ScoringSettings {
        adx_trending: 25.0,
        adx_strong: 30.0,
        rsi_oversold: 30.0,
        rsi_soft_oversold: 40.0,
        rsi_soft_overbought: 60.0,
        rsi_overbought: 70.0,
        rsi_counter_trend_boost: 1.5,
        strong_score: 6.0,
        plain_score: 4.0,
        weak_score: 1.0,
        volume_spike_dampening: 0.8,
        max_confidence: 98.0,
        level_tolerance: 1e-9,
    },

    freshness: FreshnessSettings {
        unconfirmed_live_price_factor: 0.85,
        over_max_age_factor: 0.7,
        exclusion_age_multiple: 2.0,
    },

    aggregation: AggregationSettings {
        higher_timeframe_floor: Timeframe::H4,
        conflict_confidence: 25.0,
        dominance_ratio: 1.5,
        min_net_score: 2.0,
        strong_net_score: 6.0,
        plain_net_score: 4.0,
        divergence_threshold_pct: 1.5,
        divergence_penalty: 0.75,
        neutral_confidence_per_point: 10.0,
        neutral_confidence_cap: 50.0,
    },

    levels: LevelSettings {
        min_stop_fraction: 0.005,
        trailing_activation_fraction: 0.5,
    },

    report: ReportSettings { max_reasons: 8 },
};

impl Default for AnalysisConfig {
    fn default() -> Self {
        ANALYSIS
    }
}
