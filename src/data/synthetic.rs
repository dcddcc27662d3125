//! Deterministic series generators for tests and demo bundles.

use crate::domain::{Instrument, MarketSample, Timeframe};
use crate::models::TimeframeSeries;

/// Open time of the first generated bar (2024-01-01T00:00:00Z).
pub const SYNTHETIC_START_MS: i64 = 1_704_067_200_000;

const BASE_VOLUME: f64 = 1_000.0;
const BAR_GROWTH: f64 = 0.01;
const WICK: f64 = 0.004;
const BODY: f64 = 0.002;
const SWING_EXTENSION: f64 = 0.03;
const SWING_PERIOD: usize = 8;

fn build(
    instrument: Instrument,
    timeframe: Timeframe,
    n: usize,
    bar: impl Fn(usize) -> (f64, f64, f64, f64),
) -> TimeframeSeries {
    let interval = timeframe.interval_ms();
    let samples: Vec<MarketSample> = (0..n)
        .map(|i| {
            let (open, high, low, close) = bar(i);
            MarketSample::new(
                SYNTHETIC_START_MS + i as i64 * interval,
                open,
                high,
                low,
                close,
                BASE_VOLUME,
            )
        })
        .collect();
    TimeframeSeries::from_samples(instrument, timeframe, &samples)
}

/// Every bar has identical OHLC at `price`.
pub fn flat_series(
    instrument: Instrument,
    timeframe: Timeframe,
    n: usize,
    price: f64,
) -> TimeframeSeries {
    build(instrument, timeframe, n, |_| (price, price, price, price))
}

/// Close compounds up 1% per bar. Every 8th bar pokes a higher wick and the bar midway
/// between them dips, so swings form higher highs and higher lows.
pub fn trending_series(
    instrument: Instrument,
    timeframe: Timeframe,
    n: usize,
    start_price: f64,
) -> TimeframeSeries {
    build(instrument, timeframe, n, |i| {
        let close = start_price * (1.0 + BAR_GROWTH).powi(i as i32);
        let mut high = close * (1.0 + WICK);
        let mut low = close * (1.0 - WICK);
        if i % SWING_PERIOD == 0 {
            high *= 1.0 + SWING_EXTENSION;
        }
        if i % SWING_PERIOD == SWING_PERIOD / 2 {
            low *= 1.0 - SWING_EXTENSION;
        }
        (close * (1.0 - BODY), high, low, close)
    })
}

/// Mirror of [`trending_series`]: close decays 1% per bar with lower highs and lower lows.
pub fn falling_series(
    instrument: Instrument,
    timeframe: Timeframe,
    n: usize,
    start_price: f64,
) -> TimeframeSeries {
    build(instrument, timeframe, n, |i| {
        let close = start_price * (1.0 - BAR_GROWTH).powi(i as i32);
        let mut high = close * (1.0 + WICK);
        let mut low = close * (1.0 - WICK);
        if i % SWING_PERIOD == SWING_PERIOD / 2 {
            high *= 1.0 + SWING_EXTENSION;
        }
        if i % SWING_PERIOD == 0 {
            low *= 1.0 - SWING_EXTENSION;
        }
        (close * (1.0 + BODY), high, low, close)
    })
}

/// Close oscillates around `price` by `amplitude_pct` on a fixed-period triangle wave.
pub fn sawtooth_series(
    instrument: Instrument,
    timeframe: Timeframe,
    n: usize,
    price: f64,
    amplitude_pct: f64,
) -> TimeframeSeries {
    let amplitude = price * amplitude_pct / 100.0;
    build(instrument, timeframe, n, |i| {
        let phase = (i % SWING_PERIOD) as f64 / SWING_PERIOD as f64;
        let wave = 1.0 - 4.0 * (phase - 0.5).abs(); // -1..1
        let close = price + amplitude * wave;
        let open = price + amplitude * (wave * 0.9);
        let high = open.max(close) * (1.0 + WICK);
        let low = open.min(close) * (1.0 - WICK);
        (open, high, low, close)
    })
}
