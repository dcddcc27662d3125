use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdState {
    BullishExpanding,
    BullishContracting,
    BearishExpanding,
    BearishContracting,
}

impl fmt::Display for MacdState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MacdState::BullishExpanding => write!(f, "bullish_expanding"),
            MacdState::BullishContracting => write!(f, "bullish_contracting"),
            MacdState::BearishExpanding => write!(f, "bearish_expanding"),
            MacdState::BearishContracting => write!(f, "bearish_contracting"),
        }
    }
}

/// Market structure read from the two most recent swing highs and swing lows.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureLabel {
    BullishStructure,
    BullishBias,
    BearishStructure,
    BearishBias,
    Choppy,
    Undefined,
}

impl StructureLabel {
    pub fn score(&self) -> f64 {
        match self {
            StructureLabel::BullishStructure => 3.0,
            StructureLabel::BullishBias => 1.5,
            StructureLabel::BearishStructure => -3.0,
            StructureLabel::BearishBias => -1.5,
            StructureLabel::Choppy | StructureLabel::Undefined => 0.0,
        }
    }
}

impl fmt::Display for StructureLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            StructureLabel::BullishStructure => "bullish_structure",
            StructureLabel::BullishBias => "bullish_bias",
            StructureLabel::BearishStructure => "bearish_structure",
            StructureLabel::BearishBias => "bearish_bias",
            StructureLabel::Choppy => "choppy",
            StructureLabel::Undefined => "undefined",
        };
        f.write_str(label)
    }
}

/// Indicator values computed from exactly one timeframe series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub ema9: f64,
    pub ema21: f64,
    pub ema50: f64,
    pub rsi: f64,
    pub macd_histogram: f64,
    pub macd_state: MacdState,
    pub adx: f64,
    pub atr: f64,
    pub structure_label: StructureLabel,
    pub structure_score: f64,
    pub volume_spike: bool,
}
