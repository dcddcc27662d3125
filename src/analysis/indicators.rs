//! Indicator calculator.
//!
//! Every function here is a pure function of its input slices. Series that are too short
//! for an indicator get a documented fallback value instead of an error.

use crate::config::analysis::IndicatorSettings;
use crate::models::{IndicatorSnapshot, MacdState, StructureLabel, TimeframeSeries};
use crate::utils::maths_utils::{mean, mean_of_last};

/// Exponential moving average seeded with the simple mean of the first `period` values.
///
/// The output is tail-aligned with `values`: its first point corresponds to input index
/// `period - 1` and its last point to the last input. With fewer than `period` values the
/// last raw value is repeated `values.len()` times.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&last) = values.last() else {
        return Vec::new();
    };
    if period == 0 || values.len() < period {
        return vec![last; values.len()];
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len() - period + 1);
    let mut prev = mean(&values[..period]);
    out.push(prev);
    for &x in &values[period..] {
        prev = (x - prev) * alpha + prev;
        out.push(prev);
    }
    out
}

/// Last value of [`ema`], or 0.0 for an empty input.
pub fn ema_last(values: &[f64], period: usize) -> f64 {
    ema(values, period).last().copied().unwrap_or(0.0)
}

/// Relative Strength Index with Wilder smoothing.
///
/// The first average is the simple mean of the first `period` gains/losses; later deltas are
/// smoothed with `avg = (avg * (period - 1) + new) / period`. With fewer than `period` deltas
/// the simple mean over all deltas is used. No deltas, or a completely flat window, reads 50.
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    if closes.len() < 2 || period == 0 {
        return 50.0;
    }
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let gain = |d: &f64| d.max(0.0);
    let loss = |d: &f64| (-d).max(0.0);

    let seed_len = period.min(deltas.len());
    let mut avg_gain = deltas[..seed_len].iter().map(gain).sum::<f64>() / seed_len as f64;
    let mut avg_loss = deltas[..seed_len].iter().map(loss).sum::<f64>() / seed_len as f64;

    let p = period as f64;
    for d in &deltas[seed_len..] {
        avg_gain = (avg_gain * (p - 1.0) + gain(d)) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss(d)) / p;
    }

    if avg_loss == 0.0 {
        // A flat window has no momentum either way.
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Subtract two tail-aligned series, keeping only the overlapping tail.
fn tail_diff(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = a.iter().rev().zip(b.iter().rev()).map(|(x, y)| x - y).collect();
    out.reverse();
    out
}

/// MACD histogram series: `(EMA_fast - EMA_slow) - EMA_signal(EMA_fast - EMA_slow)`.
pub fn macd_histogram(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Vec<f64> {
    let line = tail_diff(&ema(closes, fast), &ema(closes, slow));
    let signal_line = ema(&line, signal);
    tail_diff(&line, &signal_line)
}

/// Classify the last histogram bar by sign and by whether its magnitude grew versus the
/// bar before it. A zero histogram counts as bullish and contracting.
pub fn macd_state(histogram: &[f64]) -> (f64, MacdState) {
    let last = histogram.last().copied().unwrap_or(0.0);
    let prev = if histogram.len() >= 2 {
        histogram[histogram.len() - 2]
    } else {
        last
    };
    let expanding = last.abs() > prev.abs();
    let state = match (last >= 0.0, expanding) {
        (true, true) => MacdState::BullishExpanding,
        (true, false) => MacdState::BullishContracting,
        (false, true) => MacdState::BearishExpanding,
        (false, false) => MacdState::BearishContracting,
    };
    (last, state)
}

/// Directional strength and volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendStrength {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub atr: f64,
}

/// ADX and ATR from simple means over the last `period` bars.
///
/// This is the non-recursive form: DI values come from plain averages of the last `period`
/// true ranges and directional moves rather than Wilder smoothing, and ADX is the
/// directional index of that window.
pub fn adx_atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> TrendStrength {
    let n = highs.len().min(lows.len()).min(closes.len());
    if n < 2 || period == 0 {
        return TrendStrength {
            adx: 0.0,
            plus_di: 0.0,
            minus_di: 0.0,
            atr: 0.0,
        };
    }

    let mut true_ranges = Vec::with_capacity(n - 1);
    let mut plus_dm = Vec::with_capacity(n - 1);
    let mut minus_dm = Vec::with_capacity(n - 1);
    for i in 1..n {
        let prev_close = closes[i - 1];
        let tr = (highs[i] - lows[i])
            .max((highs[i] - prev_close).abs())
            .max((lows[i] - prev_close).abs());
        true_ranges.push(tr);

        let up_move = highs[i] - highs[i - 1];
        let down_move = lows[i - 1] - lows[i];
        plus_dm.push(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        });
        minus_dm.push(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        });
    }

    let atr = mean_of_last(&true_ranges, period);
    let (plus_di, minus_di) = if atr > 0.0 {
        (
            100.0 * mean_of_last(&plus_dm, period) / atr,
            100.0 * mean_of_last(&minus_dm, period) / atr,
        )
    } else {
        (0.0, 0.0)
    };
    let di_sum = plus_di + minus_di;
    let adx = if di_sum > 0.0 {
        100.0 * (plus_di - minus_di).abs() / di_sum
    } else {
        0.0
    };

    TrendStrength {
        adx,
        plus_di,
        minus_di,
        atr,
    }
}

/// Indices of bars that strictly exceed every bar within `window` on both sides.
fn swing_points(values: &[f64], window: usize, is_higher: impl Fn(f64, f64) -> bool) -> Vec<usize> {
    if values.len() < 2 * window + 1 {
        return Vec::new();
    }
    (window..values.len() - window)
        .filter(|&i| {
            (1..=window).all(|k| is_higher(values[i], values[i - k]) && is_higher(values[i], values[i + k]))
        })
        .collect()
}

pub fn swing_highs(highs: &[f64], window: usize) -> Vec<usize> {
    swing_points(highs, window, |a, b| a > b)
}

pub fn swing_lows(lows: &[f64], window: usize) -> Vec<usize> {
    swing_points(lows, window, |a, b| a < b)
}

/// Market structure from the two latest swing highs and swing lows.
pub fn market_structure(
    highs: &[f64],
    lows: &[f64],
    window: usize,
    min_bars: usize,
) -> StructureLabel {
    if highs.len() < min_bars || lows.len() < min_bars {
        return StructureLabel::Undefined;
    }
    let peaks = swing_highs(highs, window);
    let troughs = swing_lows(lows, window);
    if peaks.len() < 2 || troughs.len() < 2 {
        return StructureLabel::Undefined;
    }

    let (h_prev, h_last) = (highs[peaks[peaks.len() - 2]], highs[peaks[peaks.len() - 1]]);
    let (l_prev, l_last) = (lows[troughs[troughs.len() - 2]], lows[troughs[troughs.len() - 1]]);

    let bullish_legs = (h_last > h_prev) as u8 + (l_last > l_prev) as u8;
    let bearish_legs = (h_last < h_prev) as u8 + (l_last < l_prev) as u8;

    match (bullish_legs, bearish_legs) {
        (2, _) => StructureLabel::BullishStructure,
        (_, 2) => StructureLabel::BearishStructure,
        (1, 0) => StructureLabel::BullishBias,
        (0, 1) => StructureLabel::BearishBias,
        _ => StructureLabel::Choppy,
    }
}

/// Recent volume well above its baseline. A zero baseline never counts as a spike.
pub fn volume_spike(volumes: &[f64], recent: usize, baseline: usize, ratio: f64) -> bool {
    let baseline_mean = mean_of_last(volumes, baseline);
    baseline_mean > 0.0 && mean_of_last(volumes, recent) > ratio * baseline_mean
}

/// Compute every indicator the scorer needs from one series.
pub fn compute_snapshot(series: &TimeframeSeries, settings: &IndicatorSettings) -> IndicatorSnapshot {
    let closes = &series.close_prices;
    let histogram = macd_histogram(
        closes,
        settings.macd_fast,
        settings.macd_slow,
        settings.macd_signal,
    );
    let (macd_histogram, macd_state) = macd_state(&histogram);
    let strength = adx_atr(
        &series.high_prices,
        &series.low_prices,
        closes,
        settings.adx_period,
    );
    let structure_label = market_structure(
        &series.high_prices,
        &series.low_prices,
        settings.swing_window,
        settings.min_structure_bars,
    );

    IndicatorSnapshot {
        ema9: ema_last(closes, settings.ema_fast),
        ema21: ema_last(closes, settings.ema_mid),
        ema50: ema_last(closes, settings.ema_slow),
        rsi: rsi(closes, settings.rsi_period),
        macd_histogram,
        macd_state,
        adx: strength.adx,
        atr: strength.atr,
        structure_label,
        structure_score: structure_label.score(),
        volume_spike: volume_spike(
            &series.volumes,
            settings.volume_recent_bars,
            settings.volume_baseline_bars,
            settings.volume_spike_ratio,
        ),
    }
}
