use anyhow::{Result, anyhow};
use async_trait::async_trait;

#[cfg(debug_assertions)]
use crate::config::debug::PRINT_FETCH_EVENTS;
use crate::domain::{Instrument, Timeframe};
use crate::models::TimeframeSeries;

/// Anything that can hand the engine an OHLCV series for one timeframe.
#[async_trait]
pub trait TimeframeSource: Send + Sync {
    // Either return the series OR an anyhow::Error saying why it is unavailable
    async fn fetch(&self, instrument: &Instrument, timeframe: Timeframe)
    -> Result<TimeframeSeries>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

/// Ordered chain of providers. The first one that returns a series wins.
pub struct PrioritySource {
    providers: Vec<Box<dyn TimeframeSource>>,
}

impl PrioritySource {
    pub fn new(providers: Vec<Box<dyn TimeframeSource>>) -> Self {
        Self { providers }
    }

    /// Like [`TimeframeSource::fetch`], but also reports which provider answered.
    pub async fn fetch_with_signature(
        &self,
        instrument: &Instrument,
        timeframe: Timeframe,
    ) -> Result<(TimeframeSeries, &'static str)> {
        for provider in &self.providers {
            match provider.fetch(instrument, timeframe).await {
                Ok(series) => {
                    #[cfg(debug_assertions)]
                    if PRINT_FETCH_EVENTS {
                        log::info!(
                            "{} {} served by {}",
                            instrument,
                            timeframe,
                            provider.signature()
                        );
                    }
                    return Ok((series, provider.signature()));
                }
                Err(e) => {
                    log::info!(
                        "{} could not serve {} {}: {:#}",
                        provider.signature(),
                        instrument,
                        timeframe,
                        e
                    );
                    // Continue to the next provider
                }
            }
        }
        Err(anyhow!(
            "All providers failed to supply {} {}",
            instrument,
            timeframe
        ))
    }
}

#[async_trait]
impl TimeframeSource for PrioritySource {
    async fn fetch(
        &self,
        instrument: &Instrument,
        timeframe: Timeframe,
    ) -> Result<TimeframeSeries> {
        self.fetch_with_signature(instrument, timeframe)
            .await
            .map(|(series, _)| series)
    }

    fn signature(&self) -> &'static str {
        "Priority Chain"
    }
}
