//! Cross-timeframe aggregator.
//!
//! Combines whatever verdicts survived fetching and freshness checks into one decision.
//! Missing timeframes are simply absent from the input.

use itertools::Itertools;

use crate::config::analysis::AggregationSettings;
#[cfg(debug_assertions)]
use crate::config::debug::PRINT_AGGREGATION;
use crate::domain::Signal;
use crate::models::{AggregateVerdict, TimeframeVerdict};
use crate::utils::maths_utils::spread_pct;

/// Weighted bull and bear vote totals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VoteTotals {
    pub bull: f64,
    pub bear: f64,
}

impl VoteTotals {
    pub fn net(&self) -> f64 {
        self.bull - self.bear
    }
}

/// One verdict's vote: `weight * confidence/100 * multiplier`.
pub fn vote(verdict: &TimeframeVerdict) -> f64 {
    verdict.weight * (verdict.confidence / 100.0) * verdict.signal.vote_multiplier()
}

pub fn tally(verdicts: &[TimeframeVerdict]) -> VoteTotals {
    verdicts.iter().fold(VoteTotals::default(), |mut totals, v| {
        if v.signal.is_buy() {
            totals.bull += vote(v);
        } else if v.signal.is_sell() {
            totals.bear += vote(v);
        }
        totals
    })
}

/// True when at least two higher timeframes are present and they disagree on direction.
pub fn higher_timeframes_conflict(
    verdicts: &[TimeframeVerdict],
    settings: &AggregationSettings,
) -> bool {
    let higher: Vec<&TimeframeVerdict> = verdicts
        .iter()
        .filter(|v| v.timeframe >= settings.higher_timeframe_floor)
        .collect();
    higher.len() >= 2
        && higher.iter().any(|v| v.signal.is_buy())
        && higher.iter().any(|v| v.signal.is_sell())
}

/// Price spread across timeframes in percent.
pub fn divergence_pct(verdicts: &[TimeframeVerdict]) -> f64 {
    let prices: Vec<f64> = verdicts.iter().map(|v| v.price).collect();
    spread_pct(&prices)
}

fn grade_net_score(net: f64, settings: &AggregationSettings) -> Signal {
    let magnitude = net.abs();
    let buy_grade = if magnitude >= settings.strong_net_score {
        Signal::StrongBuy
    } else if magnitude >= settings.plain_net_score {
        Signal::Buy
    } else {
        Signal::WeakBuy
    };
    if net > 0.0 {
        buy_grade
    } else {
        match buy_grade {
            Signal::StrongBuy => Signal::StrongSell,
            Signal::Buy => Signal::Sell,
            _ => Signal::WeakSell,
        }
    }
}

/// Timeframe-weighted mean confidence of the verdicts on the winning side.
fn side_confidence(verdicts: &[TimeframeVerdict], buy_side: bool) -> f64 {
    let (weighted, weights) = verdicts
        .iter()
        .filter(|v| if buy_side { v.signal.is_buy() } else { v.signal.is_sell() })
        .fold((0.0, 0.0), |(weighted, weights), v| {
            (weighted + v.confidence * v.weight, weights + v.weight)
        });
    if weights > 0.0 { weighted / weights } else { 0.0 }
}

pub fn aggregate(verdicts: &[TimeframeVerdict], settings: &AggregationSettings) -> AggregateVerdict {
    if verdicts.is_empty() {
        return AggregateVerdict::no_trade(0.0, "No data");
    }

    let divergence = divergence_pct(verdicts);
    let totals = tally(verdicts);

    // A lone verdict passes through as is: nothing to vote against, nothing to diverge from.
    if let [only] = verdicts {
        return AggregateVerdict {
            signal: only.signal,
            confidence: only.confidence,
            net_score: totals.net(),
            bull_total: totals.bull,
            bear_total: totals.bear,
            divergence_pct: 0.0,
            timeframe_count: 1,
            reasons: vec![format!(
                "Single timeframe {}: {} ({:.1}%)",
                only.timeframe, only.signal, only.confidence
            )],
        };
    }

    if higher_timeframes_conflict(verdicts, settings) {
        let detail = verdicts
            .iter()
            .filter(|v| v.timeframe >= settings.higher_timeframe_floor)
            .map(|v| format!("{} {}", v.timeframe, v.signal))
            .join(", ");
        #[cfg(debug_assertions)]
        if PRINT_AGGREGATION {
            log::info!("Higher timeframe conflict gate tripped: {}", detail);
        }
        return AggregateVerdict {
            signal: Signal::NoTrade,
            confidence: settings.conflict_confidence,
            net_score: 0.0,
            bull_total: 0.0,
            bear_total: 0.0,
            divergence_pct: divergence,
            timeframe_count: verdicts.len(),
            reasons: vec![
                "Higher timeframes conflict".to_string(),
                format!("Higher timeframes: {}", detail),
            ],
        };
    }

    let net = totals.net();
    let bull_wins = totals.bull > totals.bear * settings.dominance_ratio && net > settings.min_net_score;
    let bear_wins =
        totals.bear > totals.bull * settings.dominance_ratio && -net > settings.min_net_score;

    let mut reasons = vec![format!(
        "Weighted vote: bull {:.2} vs bear {:.2} (net {:.2})",
        totals.bull, totals.bear, net
    )];

    let (signal, mut confidence) = if bull_wins || bear_wins {
        let side_total = if bull_wins { totals.bull } else { totals.bear };
        let share = side_total / (totals.bull + totals.bear);
        let confidence = (side_confidence(verdicts, bull_wins) * share).min(98.0);
        let agreeing = verdicts
            .iter()
            .filter(|v| if bull_wins { v.signal.is_buy() } else { v.signal.is_sell() })
            .map(|v| v.timeframe.to_string())
            .join(", ");
        reasons.push(format!("Aligned timeframes: {}", agreeing));
        (grade_net_score(net, settings), confidence)
    } else {
        reasons.push("No dominant direction across timeframes".to_string());
        let confidence = (net.abs() * settings.neutral_confidence_per_point)
            .min(settings.neutral_confidence_cap);
        (Signal::NoTrade, confidence)
    };

    if divergence > settings.divergence_threshold_pct {
        confidence *= settings.divergence_penalty;
        reasons.push(format!(
            "Price divergence {:.2}% across timeframes",
            divergence
        ));
    }

    #[cfg(debug_assertions)]
    if PRINT_AGGREGATION {
        log::info!(
            "Aggregate: {:?} -> {} ({:.1}%), divergence {:.2}%",
            totals,
            signal,
            confidence,
            divergence
        );
    }

    AggregateVerdict {
        signal,
        confidence,
        net_score: net,
        bull_total: totals.bull,
        bear_total: totals.bear,
        divergence_pct: divergence,
        timeframe_count: verdicts.len(),
        reasons,
    }
}
