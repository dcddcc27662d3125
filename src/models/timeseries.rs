use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::domain::{Instrument, MarketSample, Timeframe};

// ============================================================================
// TimeframeSeries: OHLCV bars for one (instrument, timeframe) pair
// ============================================================================

/// Where the price hint attached to a series came from.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    /// Streamed or polled price confirmed current by the adapter
    Live,
    /// Provider quote with a known lag
    Delayed,
    /// Read back from a stored bundle
    #[default]
    Historical,
}

/// Columnar OHLCV storage, oldest bar first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeframeSeries {
    pub instrument: Instrument,
    pub timeframe: Timeframe,

    pub timestamps_ms: Vec<i64>,

    // Prices
    pub open_prices: Vec<f64>,
    pub high_prices: Vec<f64>,
    pub low_prices: Vec<f64>,
    pub close_prices: Vec<f64>,

    pub volumes: Vec<f64>,

    // Freshness metadata supplied by the adapter
    pub live_price: Option<f64>,
    pub source_tag: SourceTag,
    pub age_minutes: f64,
}

impl TimeframeSeries {
    pub fn from_samples(
        instrument: Instrument,
        timeframe: Timeframe,
        samples: &[MarketSample],
    ) -> Self {
        TimeframeSeries {
            instrument,
            timeframe,
            timestamps_ms: samples.iter().map(|s| s.timestamp_ms).collect(),
            open_prices: samples.iter().map(|s| s.open).collect(),
            high_prices: samples.iter().map(|s| s.high).collect(),
            low_prices: samples.iter().map(|s| s.low).collect(),
            close_prices: samples.iter().map(|s| s.close).collect(),
            volumes: samples.iter().map(|s| s.volume).collect(),
            live_price: None,
            source_tag: SourceTag::default(),
            age_minutes: 0.0,
        }
    }

    pub fn with_live_price(mut self, live_price: f64, source_tag: SourceTag) -> Self {
        self.live_price = Some(live_price);
        self.source_tag = source_tag;
        self
    }

    pub fn with_age_minutes(mut self, age_minutes: f64) -> Self {
        self.age_minutes = age_minutes;
        self
    }

    pub fn get_sample(&self, idx: usize) -> MarketSample {
        MarketSample::new(
            self.timestamps_ms[idx],
            self.open_prices[idx],
            self.high_prices[idx],
            self.low_prices[idx],
            self.close_prices[idx],
            self.volumes[idx],
        )
    }

    pub fn len(&self) -> usize {
        self.close_prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close_prices.is_empty()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.close_prices.last().copied()
    }

    pub fn last_timestamp_ms(&self) -> Option<i64> {
        self.timestamps_ms.last().copied()
    }

    fn usable_live_price(&self) -> Option<f64> {
        self.live_price.filter(|p| p.is_finite() && *p > 0.0)
    }

    /// The live price takes priority over the last close when the adapter supplied one.
    pub fn current_price(&self) -> Option<f64> {
        self.usable_live_price().or_else(|| self.last_close())
    }

    /// A live price is only trusted when the adapter tagged it as live and it is usable.
    pub fn is_live_confirmed(&self) -> bool {
        self.usable_live_price().is_some() && self.source_tag == SourceTag::Live
    }

    /// Check the adapter contract: enough bars, equal column lengths, strictly increasing
    /// timestamps and well-formed OHLCV on every bar.
    pub fn validate(&self, min_len: usize) -> Result<()> {
        let n = self.len();
        let columns = [
            self.timestamps_ms.len(),
            self.open_prices.len(),
            self.high_prices.len(),
            self.low_prices.len(),
            self.volumes.len(),
        ];
        if columns.iter().any(|&len| len != n) {
            bail!(
                "{} {}: column lengths differ ({:?} vs {} closes)",
                self.instrument.symbol,
                self.timeframe,
                columns,
                n
            );
        }
        if n < min_len {
            bail!(
                "{} {}: only {} bars (minimum: {})",
                self.instrument.symbol,
                self.timeframe,
                n,
                min_len
            );
        }
        if let Some(idx) = self.timestamps_ms.windows(2).position(|w| w[1] <= w[0]) {
            bail!(
                "{} {}: timestamps not strictly increasing at bar {}",
                self.instrument.symbol,
                self.timeframe,
                idx + 1
            );
        }
        if let Some(idx) = (0..n).find(|&idx| !self.get_sample(idx).is_well_formed()) {
            bail!(
                "{} {}: malformed bar at index {}",
                self.instrument.symbol,
                self.timeframe,
                idx
            );
        }
        if !self.age_minutes.is_finite() || self.age_minutes < 0.0 {
            bail!(
                "{} {}: invalid age {}",
                self.instrument.symbol,
                self.timeframe,
                self.age_minutes
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic;

    #[test]
    fn live_price_overrides_last_close() {
        let series = synthetic::flat_series(Instrument::new("EURUSD"), Timeframe::H1, 30, 1.1);
        assert_eq!(series.current_price(), Some(1.1));
        assert!(!series.is_live_confirmed());

        let live = series.clone().with_live_price(1.2, SourceTag::Live);
        assert_eq!(live.current_price(), Some(1.2));
        assert!(live.is_live_confirmed());
    }

    #[test]
    fn discarded_live_price_is_not_confirmed() {
        let series = synthetic::flat_series(Instrument::new("EURUSD"), Timeframe::H1, 30, 1.1);
        for bad in [f64::NAN, 0.0, -1.2, f64::INFINITY] {
            let tagged = series.clone().with_live_price(bad, SourceTag::Live);
            assert_eq!(tagged.current_price(), Some(1.1));
            assert!(!tagged.is_live_confirmed());
        }
    }

    #[test]
    fn validate_rejects_short_and_unordered_series() {
        let short = synthetic::flat_series(Instrument::new("EURUSD"), Timeframe::H1, 10, 1.1);
        assert!(short.validate(20).is_err());

        let mut unordered =
            synthetic::flat_series(Instrument::new("EURUSD"), Timeframe::H1, 25, 1.1);
        unordered.timestamps_ms[5] = unordered.timestamps_ms[4];
        assert!(unordered.validate(20).is_err());

        let ok = synthetic::flat_series(Instrument::new("EURUSD"), Timeframe::H1, 25, 1.1);
        assert!(ok.validate(20).is_ok());
    }

    #[test]
    fn validate_rejects_malformed_bars() {
        let mut series =
            synthetic::flat_series(Instrument::new("EURUSD"), Timeframe::H1, 25, 1.1);
        series.high_prices[3] = f64::NAN;
        assert!(series.validate(20).is_err());
    }
}
