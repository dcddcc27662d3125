use std::collections::BTreeMap;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::data::TimeframeSource;
use crate::domain::{Instrument, Timeframe};
use crate::models::TimeframeSeries;

/// In-memory series keyed by (symbol, timeframe). Returns clones, so the same fixture can
/// serve any number of analyses.
#[derive(Debug, Default, Clone)]
pub struct FixtureSource {
    series: BTreeMap<(String, Timeframe), TimeframeSeries>,
}

impl FixtureSource {
    pub const SIGNATURE: &'static str = "In-Memory Fixture";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, series: TimeframeSeries) {
        let key = (series.instrument.symbol.clone(), series.timeframe);
        self.series.insert(key, series);
    }

    pub fn with(mut self, series: TimeframeSeries) -> Self {
        self.insert(series);
        self
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl FromIterator<TimeframeSeries> for FixtureSource {
    fn from_iter<I: IntoIterator<Item = TimeframeSeries>>(iter: I) -> Self {
        let mut source = FixtureSource::new();
        for series in iter {
            source.insert(series);
        }
        source
    }
}

#[async_trait]
impl TimeframeSource for FixtureSource {
    async fn fetch(
        &self,
        instrument: &Instrument,
        timeframe: Timeframe,
    ) -> Result<TimeframeSeries> {
        self.series
            .get(&(instrument.symbol.clone(), timeframe))
            .cloned()
            .ok_or_else(|| anyhow!("No fixture for {} {}", instrument, timeframe))
    }

    fn signature(&self) -> &'static str {
        Self::SIGNATURE
    }
}
