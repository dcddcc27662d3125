use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::TimeUtils;

/// Bar width of a series. Ordered from shortest to longest.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    strum_macros::EnumIter,
)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "1w")]
    W1,
}

impl Timeframe {
    pub fn interval_ms(&self) -> i64 {
        match self {
            Timeframe::M1 => TimeUtils::MS_IN_MIN,
            Timeframe::M5 => TimeUtils::MS_IN_5_MIN,
            Timeframe::M15 => TimeUtils::MS_IN_15_MIN,
            Timeframe::M30 => TimeUtils::MS_IN_30_MIN,
            Timeframe::H1 => TimeUtils::MS_IN_H,
            Timeframe::H4 => TimeUtils::MS_IN_4_H,
            Timeframe::D1 => TimeUtils::MS_IN_D,
            Timeframe::W1 => TimeUtils::MS_IN_W,
        }
    }

    pub fn label(&self) -> &'static str {
        TimeUtils::interval_to_string(self.interval_ms())
    }

    /// Weight of this timeframe's vote in the cross-timeframe aggregate.
    pub fn weight(&self) -> f64 {
        match self {
            Timeframe::M1 => 0.5,
            Timeframe::M5 => 0.75,
            Timeframe::M15 => 1.0,
            Timeframe::M30 => 1.25,
            Timeframe::H1 => 1.5,
            Timeframe::H4 => 2.0,
            Timeframe::D1 => 2.5,
            Timeframe::W1 => 3.0,
        }
    }

    /// Oldest acceptable data age, in minutes: two bar widths.
    pub fn max_age_minutes(&self) -> f64 {
        2.0 * (self.interval_ms() / TimeUtils::MS_IN_MIN) as f64
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(label: &str) -> Result<Self> {
        use strum::IntoEnumIterator;
        let wanted = label.trim();
        Timeframe::iter()
            .find(|tf| tf.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| anyhow!("Unsupported timeframe label '{}'", label))
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse a list of labels, keeping the caller's order and dropping duplicates.
pub fn parse_timeframes<S: AsRef<str>>(labels: &[S]) -> Result<Vec<Timeframe>> {
    let mut parsed: Vec<Timeframe> = Vec::with_capacity(labels.len());
    for label in labels {
        let tf: Timeframe = label.as_ref().parse()?;
        if !parsed.contains(&tf) {
            parsed.push(tf);
        }
    }
    Ok(parsed)
}
