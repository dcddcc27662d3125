use serde::{Deserialize, Serialize};

use crate::domain::{Signal, Timeframe};

/// Entry, stop and target prices for a verdict. Stop, target and trailing activation are
/// `None` when there is no trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeLevels {
    pub entry: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub trailing_activation: Option<f64>,
    pub risk_reward: f64,
    pub decimals: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSummary {
    pub rsi: f64,
    pub adx: f64,
    pub atr: f64,
    pub trend: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiTimeframeSummary {
    pub net_score: f64,
    pub divergence_pct: f64,
    pub timeframe_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeframeBreakdown {
    pub timeframe: Timeframe,
    pub signal: Signal,
    pub confidence: f64,
    pub price: f64,
}

/// The structured result handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub instrument: String,
    pub primary_timeframe: Timeframe,
    pub signal: Signal,
    pub confidence: f64,
    pub current_price: Option<f64>,
    pub entry_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub trailing_activation: Option<f64>,
    pub risk_reward: f64,
    pub timestamp: String,
    pub indicators: Option<IndicatorSummary>,
    pub multi_timeframe: MultiTimeframeSummary,
    pub timeframes: Vec<TimeframeBreakdown>,
    pub reasoning: Vec<String>,
}
