//! Per-timeframe scorer: one series in, one verdict out.

use crate::config::AnalysisConfig;
use crate::config::analysis::{FreshnessSettings, ScoringSettings};
#[cfg(debug_assertions)]
use crate::config::debug::PRINT_TIMEFRAME_SCORING;
use crate::analysis::indicators::compute_snapshot;
use crate::domain::{Signal, Timeframe};
use crate::models::{IndicatorSnapshot, MacdState, TimeframeSeries, TimeframeVerdict, TrendBucket};

/// Verdict plus the snapshot it was computed from. The engine needs the snapshot of the
/// primary timeframe for ATR-based levels and the indicator summary.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeframeAnalysis {
    pub verdict: TimeframeVerdict,
    pub snapshot: IndicatorSnapshot,
}

/// Individual contributions to the composite score, kept for reasons and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub trend: TrendBucket,
    pub trend_term: f64,
    pub rsi_term: f64,
    pub macd_term: f64,
    pub structure_term: f64,
    pub volume_dampened: bool,
    pub total: f64,
}

/// Ordering of price against the three EMAs. Two levels closer than `tolerance` (absolute,
/// in price units) compare equal, and anything not strictly ordered is ranging.
pub fn trend_bucket(
    price: f64,
    ema_fast: f64,
    ema_mid: f64,
    ema_slow: f64,
    tolerance: f64,
) -> TrendBucket {
    let above = |a: f64, b: f64| a - b > tolerance;
    let below = |a: f64, b: f64| b - a > tolerance;

    if above(price, ema_fast) && above(ema_fast, ema_mid) && above(ema_mid, ema_slow) {
        TrendBucket::StrongUptrend
    } else if below(price, ema_fast) && below(ema_fast, ema_mid) && below(ema_mid, ema_slow) {
        TrendBucket::StrongDowntrend
    } else if above(price, ema_mid) && above(ema_mid, ema_slow) {
        TrendBucket::Uptrend
    } else if below(price, ema_mid) && below(ema_mid, ema_slow) {
        TrendBucket::Downtrend
    } else if above(price, ema_slow) {
        TrendBucket::WeakUptrend
    } else if below(price, ema_slow) {
        TrendBucket::WeakDowntrend
    } else {
        TrendBucket::Ranging
    }
}

/// RSI contribution. An extreme reading that runs against the trend (oversold inside an
/// uptrend, overbought inside a downtrend) is boosted.
pub fn rsi_term(rsi: f64, trend: TrendBucket, settings: &ScoringSettings) -> f64 {
    if rsi < settings.rsi_oversold {
        if trend.is_up() {
            3.0 * settings.rsi_counter_trend_boost
        } else {
            3.0
        }
    } else if rsi < settings.rsi_soft_oversold {
        1.0
    } else if rsi > settings.rsi_overbought {
        if trend.is_down() {
            -3.0 * settings.rsi_counter_trend_boost
        } else {
            -3.0
        }
    } else if rsi > settings.rsi_soft_overbought {
        -1.0
    } else {
        0.0
    }
}

/// A histogram within `tolerance` of zero carries no momentum.
pub fn macd_term(histogram: f64, state: MacdState, tolerance: f64) -> f64 {
    if histogram.abs() <= tolerance {
        return 0.0;
    }
    match state {
        MacdState::BullishExpanding => 2.0,
        MacdState::BullishContracting => 1.0,
        MacdState::BearishExpanding => -2.0,
        MacdState::BearishContracting => -1.0,
    }
}

pub fn composite_score(
    snapshot: &IndicatorSnapshot,
    price: f64,
    settings: &ScoringSettings,
) -> ScoreBreakdown {
    let tolerance = price.abs() * settings.level_tolerance;
    let trend = trend_bucket(
        price,
        snapshot.ema9,
        snapshot.ema21,
        snapshot.ema50,
        tolerance,
    );
    let escalation = if snapshot.adx > settings.adx_trending {
        2.0
    } else {
        1.0
    };
    let trend_term = trend.value() * escalation;
    let rsi_term = rsi_term(snapshot.rsi, trend, settings);
    let macd_term = macd_term(snapshot.macd_histogram, snapshot.macd_state, tolerance);
    let structure_term = snapshot.structure_score;

    let mut total = trend_term + rsi_term + macd_term + structure_term;
    if snapshot.volume_spike {
        total *= settings.volume_spike_dampening;
    }

    ScoreBreakdown {
        trend,
        trend_term,
        rsi_term,
        macd_term,
        structure_term,
        volume_dampened: snapshot.volume_spike,
        total,
    }
}

pub fn classify(score: f64, adx: f64, settings: &ScoringSettings) -> Signal {
    let magnitude = score.abs();
    let grade = if magnitude >= settings.strong_score && adx > settings.adx_strong {
        Signal::StrongBuy
    } else if magnitude >= settings.plain_score {
        Signal::Buy
    } else if magnitude > settings.weak_score && adx > settings.adx_trending {
        Signal::WeakBuy
    } else {
        return Signal::NoTrade;
    };

    if score > 0.0 {
        grade
    } else {
        match grade {
            Signal::StrongBuy => Signal::StrongSell,
            Signal::Buy => Signal::Sell,
            _ => Signal::WeakSell,
        }
    }
}

/// Confidence before freshness penalties. Every grade has its own ceiling, all of them at or
/// below `max_confidence`.
pub fn base_confidence(signal: Signal, score: f64, settings: &ScoringSettings) -> f64 {
    let s = score.abs();
    let confidence = match signal {
        Signal::StrongBuy | Signal::StrongSell => (85.0 + s).min(98.0),
        Signal::Buy | Signal::Sell => (70.0 + 2.0 * s).min(90.0),
        Signal::WeakBuy | Signal::WeakSell => (55.0 + 3.0 * s).min(75.0),
        Signal::NoTrade => (50.0 - 10.0 * s).max(20.0),
    };
    confidence.min(settings.max_confidence)
}

/// Data older than the exclusion multiple of its max age is not scored at all.
pub fn is_excluded(series: &TimeframeSeries, settings: &FreshnessSettings) -> bool {
    series.age_minutes > series.timeframe.max_age_minutes() * settings.exclusion_age_multiple
}

/// Apply freshness penalties, returning the penalised confidence and the reasons for it.
pub fn apply_freshness(
    confidence: f64,
    series: &TimeframeSeries,
    settings: &FreshnessSettings,
) -> (f64, Vec<String>) {
    let tf = series.timeframe;
    let max_age = tf.max_age_minutes();
    let mut confidence = confidence;
    let mut reasons = Vec::new();

    if !series.is_live_confirmed() {
        confidence *= settings.unconfirmed_live_price_factor;
        reasons.push(format!("{}: live price not confirmed", tf));
    }
    if series.age_minutes > max_age {
        confidence *= settings.over_max_age_factor;
        reasons.push(format!(
            "{}: data {:.0} min old (max {:.0})",
            tf, series.age_minutes, max_age
        ));
    }
    (confidence, reasons)
}

fn score_reasons(
    verdict_tf: Timeframe,
    breakdown: &ScoreBreakdown,
    snapshot: &IndicatorSnapshot,
) -> Vec<String> {
    let mut reasons = vec![format!("{}: {}", verdict_tf, breakdown.trend)];
    if breakdown.rsi_term != 0.0 {
        let zone = if breakdown.rsi_term > 0.0 {
            "oversold"
        } else {
            "overbought"
        };
        reasons.push(format!("{}: RSI {:.1} {}", verdict_tf, snapshot.rsi, zone));
    }
    if breakdown.macd_term != 0.0 {
        reasons.push(format!("{}: MACD {}", verdict_tf, snapshot.macd_state));
    }
    if breakdown.structure_term != 0.0 {
        reasons.push(format!("{}: {}", verdict_tf, snapshot.structure_label));
    }
    if breakdown.volume_dampened {
        reasons.push(format!("{}: volume spike, conviction reduced", verdict_tf));
    }
    reasons
}

/// Score one series. The caller is responsible for dropping excluded or invalid series first.
pub fn score_series(series: &TimeframeSeries, config: &AnalysisConfig) -> TimeframeAnalysis {
    let tf = series.timeframe;
    let snapshot = compute_snapshot(series, &config.indicators);
    let price = series.current_price().unwrap_or(0.0);

    let breakdown = composite_score(&snapshot, price, &config.scoring);
    let signal = classify(breakdown.total, snapshot.adx, &config.scoring);
    let confidence = base_confidence(signal, breakdown.total, &config.scoring);
    let (confidence, freshness_reasons) = apply_freshness(confidence, series, &config.freshness);

    #[cfg(debug_assertions)]
    if PRINT_TIMEFRAME_SCORING {
        log::info!(
            "{} {}: {:?} => score {:.2} adx {:.1} -> {} ({:.1}%)",
            series.instrument.symbol,
            tf,
            breakdown,
            breakdown.total,
            snapshot.adx,
            signal,
            confidence
        );
    }

    let mut reasons = score_reasons(tf, &breakdown, &snapshot);
    reasons.extend(freshness_reasons);

    TimeframeAnalysis {
        verdict: TimeframeVerdict {
            timeframe: tf,
            signal,
            confidence,
            price,
            age_minutes: series.age_minutes,
            max_age: tf.max_age_minutes(),
            weight: tf.weight(),
            score: breakdown.total,
            trend: breakdown.trend,
            reasons,
        },
        snapshot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ANALYSIS;
    use crate::data::synthetic;
    use crate::domain::Instrument;
    use crate::models::{SourceTag, StructureLabel};

    fn snapshot() -> IndicatorSnapshot {
        IndicatorSnapshot {
            ema9: 100.0,
            ema21: 100.0,
            ema50: 100.0,
            rsi: 50.0,
            macd_histogram: 0.0,
            macd_state: MacdState::BullishContracting,
            adx: 0.0,
            atr: 1.0,
            structure_label: StructureLabel::Undefined,
            structure_score: 0.0,
            volume_spike: false,
        }
    }

    #[test]
    fn trend_buckets_follow_ema_ordering() {
        let tb = |p, f, m, s| trend_bucket(p, f, m, s, 1e-7);
        assert_eq!(tb(104.0, 103.0, 102.0, 101.0), TrendBucket::StrongUptrend);
        assert_eq!(tb(104.0, 101.5, 102.0, 101.0), TrendBucket::Uptrend);
        assert_eq!(tb(104.0, 101.5, 100.0, 101.0), TrendBucket::WeakUptrend);
        assert_eq!(tb(100.0, 100.0, 100.0, 100.0), TrendBucket::Ranging);
        assert_eq!(tb(98.0, 99.0, 100.0, 101.0), TrendBucket::StrongDowntrend);
        assert_eq!(tb(98.0, 97.5, 100.0, 101.0), TrendBucket::Downtrend);
        assert_eq!(tb(98.0, 99.0, 102.0, 101.0), TrendBucket::WeakDowntrend);
    }

    #[test]
    fn rounding_noise_between_levels_is_ranging() {
        let noise = 1.1 * 1e-12;
        assert_eq!(
            trend_bucket(1.1, 1.1 - noise, 1.1 + noise, 1.1 - noise, 1.1e-9),
            TrendBucket::Ranging
        );
        assert_eq!(
            trend_bucket(1.1, 1.1 + noise, 1.1 + 2.0 * noise, 1.1 + 3.0 * noise, 1.1e-9),
            TrendBucket::Ranging
        );
    }

    #[test]
    fn rsi_extremes_against_trend_are_boosted() {
        let s = &ANALYSIS.scoring;
        assert_eq!(rsi_term(25.0, TrendBucket::Ranging, s), 3.0);
        assert_eq!(rsi_term(25.0, TrendBucket::Uptrend, s), 4.5);
        assert_eq!(rsi_term(35.0, TrendBucket::Uptrend, s), 1.0);
        assert_eq!(rsi_term(50.0, TrendBucket::Uptrend, s), 0.0);
        assert_eq!(rsi_term(65.0, TrendBucket::Downtrend, s), -1.0);
        assert_eq!(rsi_term(75.0, TrendBucket::StrongUptrend, s), -3.0);
        assert_eq!(rsi_term(75.0, TrendBucket::WeakDowntrend, s), -4.5);
    }

    #[test]
    fn zero_histogram_scores_nothing() {
        assert_eq!(macd_term(0.0, MacdState::BullishContracting, 1e-7), 0.0);
        assert_eq!(macd_term(3e-15, MacdState::BullishExpanding, 1e-7), 0.0);
        assert_eq!(macd_term(-3e-15, MacdState::BearishExpanding, 1e-7), 0.0);
        assert_eq!(macd_term(0.3, MacdState::BullishExpanding, 1e-7), 2.0);
        assert_eq!(macd_term(-0.3, MacdState::BearishContracting, 1e-7), -1.0);
    }

    #[test]
    fn classification_thresholds_mirror() {
        let s = &ANALYSIS.scoring;
        assert_eq!(classify(6.0, 31.0, s), Signal::StrongBuy);
        assert_eq!(classify(6.0, 29.0, s), Signal::Buy);
        assert_eq!(classify(4.0, 0.0, s), Signal::Buy);
        assert_eq!(classify(2.0, 26.0, s), Signal::WeakBuy);
        assert_eq!(classify(2.0, 20.0, s), Signal::NoTrade);
        assert_eq!(classify(1.0, 40.0, s), Signal::NoTrade);
        assert_eq!(classify(-6.5, 35.0, s), Signal::StrongSell);
        assert_eq!(classify(-4.0, 0.0, s), Signal::Sell);
        assert_eq!(classify(-1.5, 26.0, s), Signal::WeakSell);
    }

    #[test]
    fn confidence_saturates_below_100() {
        let s = &ANALYSIS.scoring;
        assert_eq!(base_confidence(Signal::StrongBuy, 30.0, s), 98.0);
        assert_eq!(base_confidence(Signal::Sell, -15.0, s), 90.0);
        assert_eq!(base_confidence(Signal::WeakBuy, 1.5, s), 59.5);
        assert_eq!(base_confidence(Signal::NoTrade, 0.0, s), 50.0);
        assert_eq!(base_confidence(Signal::NoTrade, 9.0, s), 20.0);
    }

    #[test]
    fn volume_spike_dampens_score() {
        let mut snap = snapshot();
        snap.rsi = 20.0;
        snap.structure_label = StructureLabel::BullishStructure;
        snap.structure_score = 3.0;
        let calm = composite_score(&snap, 100.0, &ANALYSIS.scoring).total;
        snap.volume_spike = true;
        let spiked = composite_score(&snap, 100.0, &ANALYSIS.scoring);
        assert_eq!(calm, 6.0);
        assert!((spiked.total - 4.8).abs() < 1e-9);
        assert!(spiked.volume_dampened);
    }

    #[test]
    fn trend_term_doubles_when_adx_confirms() {
        let mut snap = snapshot();
        snap.ema9 = 103.0;
        snap.ema21 = 102.0;
        snap.ema50 = 101.0;
        assert_eq!(composite_score(&snap, 104.0, &ANALYSIS.scoring).trend_term, 3.0);
        snap.adx = 26.0;
        assert_eq!(composite_score(&snap, 104.0, &ANALYSIS.scoring).trend_term, 6.0);
    }

    #[test]
    fn freshness_penalties_compound() {
        let f = &ANALYSIS.freshness;
        let series = synthetic::flat_series(Instrument::new("EURUSD"), Timeframe::H1, 30, 1.1);

        let live = series.clone().with_live_price(1.1, SourceTag::Live);
        assert_eq!(apply_freshness(80.0, &live, f).0, 80.0);

        let (unconfirmed, reasons) = apply_freshness(80.0, &series, f);
        assert!((unconfirmed - 68.0).abs() < 1e-9);
        assert_eq!(reasons.len(), 1);

        let old = series.with_age_minutes(121.0);
        let (both, reasons) = apply_freshness(80.0, &old, f);
        assert!((both - 80.0 * 0.85 * 0.7).abs() < 1e-9);
        assert_eq!(reasons.len(), 2);
    }

    #[test]
    fn exclusion_beyond_twice_max_age() {
        let f = &ANALYSIS.freshness;
        let series = synthetic::flat_series(Instrument::new("EURUSD"), Timeframe::H1, 30, 1.1);
        assert!(!is_excluded(&series.clone().with_age_minutes(240.0), f));
        assert!(is_excluded(&series.with_age_minutes(360.0), f));
    }

    #[test]
    fn rising_series_scores_strong_buy() {
        let series =
            synthetic::trending_series(Instrument::new("BTCUSD"), Timeframe::H1, 60, 100.0);
        let price = series.last_close().unwrap();
        let series = series.with_live_price(price, SourceTag::Live);
        let analysis = score_series(&series, &ANALYSIS);
        assert_eq!(analysis.verdict.trend, TrendBucket::StrongUptrend);
        assert_eq!(analysis.verdict.signal, Signal::StrongBuy);
        assert!((analysis.verdict.score - 8.0).abs() < 1e-9);
        assert_eq!(analysis.verdict.confidence, 93.0);
        assert_eq!(analysis.verdict.weight, 1.5);
    }

    #[test]
    fn flat_series_scores_no_trade() {
        for price in [100.0, 1.1, 1.0843, 0.65, 1.27, 1.3333, 150.3, 2400.7, 64000.1] {
            let series =
                synthetic::flat_series(Instrument::new("BTCUSD"), Timeframe::H1, 60, price);
            let analysis = score_series(&series, &ANALYSIS);
            assert_eq!(analysis.verdict.trend, TrendBucket::Ranging, "price {}", price);
            assert_eq!(analysis.verdict.signal, Signal::NoTrade, "price {}", price);
            assert_eq!(analysis.verdict.score, 0.0, "price {}", price);
            assert_eq!(
                analysis.snapshot.structure_label,
                StructureLabel::Undefined,
                "price {}",
                price
            );
        }
    }
}
