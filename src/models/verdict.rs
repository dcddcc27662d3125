use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{Signal, Timeframe};

/// Trend classification from price against the fast/mid/slow EMAs.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendBucket {
    StrongDowntrend,
    Downtrend,
    WeakDowntrend,
    Ranging,
    WeakUptrend,
    Uptrend,
    StrongUptrend,
}

impl TrendBucket {
    pub fn value(&self) -> f64 {
        match self {
            TrendBucket::StrongUptrend => 3.0,
            TrendBucket::Uptrend => 2.0,
            TrendBucket::WeakUptrend => 1.0,
            TrendBucket::Ranging => 0.0,
            TrendBucket::WeakDowntrend => -1.0,
            TrendBucket::Downtrend => -2.0,
            TrendBucket::StrongDowntrend => -3.0,
        }
    }

    pub fn is_up(&self) -> bool {
        self.value() > 0.0
    }

    pub fn is_down(&self) -> bool {
        self.value() < 0.0
    }
}

impl fmt::Display for TrendBucket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            TrendBucket::StrongUptrend => "strong_uptrend",
            TrendBucket::Uptrend => "uptrend",
            TrendBucket::WeakUptrend => "weak_uptrend",
            TrendBucket::Ranging => "ranging",
            TrendBucket::WeakDowntrend => "weak_downtrend",
            TrendBucket::Downtrend => "downtrend",
            TrendBucket::StrongDowntrend => "strong_downtrend",
        };
        f.write_str(label)
    }
}

/// One timeframe's opinion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeVerdict {
    pub timeframe: Timeframe,
    pub signal: Signal,
    /// 0..=100, after freshness penalties
    pub confidence: f64,
    pub price: f64,
    pub age_minutes: f64,
    pub max_age: f64,
    pub weight: f64,
    pub score: f64,
    pub trend: TrendBucket,
    pub reasons: Vec<String>,
}

/// The cross-timeframe decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateVerdict {
    pub signal: Signal,
    pub confidence: f64,
    pub net_score: f64,
    pub bull_total: f64,
    pub bear_total: f64,
    pub divergence_pct: f64,
    pub timeframe_count: usize,
    pub reasons: Vec<String>,
}

impl AggregateVerdict {
    pub fn no_trade(confidence: f64, reason: &str) -> Self {
        AggregateVerdict {
            signal: Signal::NoTrade,
            confidence,
            net_score: 0.0,
            bull_total: 0.0,
            bear_total: 0.0,
            divergence_pct: 0.0,
            timeframe_count: 0,
            reasons: vec![reason.to_string()],
        }
    }
}
