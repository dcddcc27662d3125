use serde::{Deserialize, Serialize};

/// One OHLCV bar. `timestamp_ms` is the bar's open time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MarketSample {
    pub timestamp_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl MarketSample {
    pub fn new(timestamp_ms: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        MarketSample {
            timestamp_ms,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// All prices and the volume are finite, volume is non-negative and the high/low
    /// envelope contains open and close.
    pub fn is_well_formed(&self) -> bool {
        let fields = [self.open, self.high, self.low, self.close, self.volume];
        fields.iter().all(|v| v.is_finite())
            && self.volume >= 0.0
            && self.high >= self.low
            && self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_requires_consistent_envelope() {
        let ok = MarketSample::new(0, 10.0, 11.0, 9.0, 10.5, 100.0);
        assert!(ok.is_well_formed());

        let inverted = MarketSample::new(0, 10.0, 9.0, 11.0, 10.0, 100.0);
        assert!(!inverted.is_well_formed());

        let nan_close = MarketSample::new(0, 10.0, 11.0, 9.0, f64::NAN, 1.0);
        assert!(!nan_close.is_well_formed());
    }
}
