//! Report formatter: rounds, caps and assembles the final structured result.

use chrono::{DateTime, Utc};
use itertools::Itertools;

use crate::analysis::timeframe_scoring::TimeframeAnalysis;
use crate::analysis::trade_levels::compute_levels;
use crate::config::{AnalysisConfig, decimals_for_price};
use crate::domain::{Instrument, Timeframe};
use crate::models::{
    AggregateVerdict, AnalysisReport, IndicatorSummary, MultiTimeframeSummary,
    TimeframeBreakdown, TimeframeVerdict,
};
use crate::utils::maths_utils::round_dp;
use crate::utils::time_utils::report_timestamp;

/// Everything the formatter needs from one analysis run.
pub struct ReportParts<'a> {
    pub instrument: &'a Instrument,
    pub primary: Timeframe,
    pub aggregate: &'a AggregateVerdict,
    /// Scored primary timeframe (or its fallback). None when no timeframe had data.
    pub primary_analysis: Option<&'a TimeframeAnalysis>,
    pub verdicts: &'a [TimeframeVerdict],
    /// Engine-level notes (exclusions, fallbacks) that lead the reasoning list.
    pub notes: &'a [String],
    pub generated_at: DateTime<Utc>,
}

/// Notes first, then the aggregate's reasons, then the primary timeframe's. Duplicates are
/// dropped and the list is capped.
fn reasoning(parts: &ReportParts, max_reasons: usize) -> Vec<String> {
    let primary_reasons = parts
        .primary_analysis
        .map(|a| a.verdict.reasons.as_slice())
        .unwrap_or_default();
    parts
        .notes
        .iter()
        .chain(parts.aggregate.reasons.iter())
        .chain(primary_reasons.iter())
        .unique()
        .take(max_reasons)
        .cloned()
        .collect()
}

pub fn format_report(parts: ReportParts, config: &AnalysisConfig) -> AnalysisReport {
    let aggregate = parts.aggregate;
    let reasoning = reasoning(&parts, config.report.max_reasons);

    let multi_timeframe = MultiTimeframeSummary {
        net_score: round_dp(aggregate.net_score, 2),
        divergence_pct: round_dp(aggregate.divergence_pct, 2),
        timeframe_count: aggregate.timeframe_count,
    };

    let timeframes = parts
        .verdicts
        .iter()
        .map(|v| TimeframeBreakdown {
            timeframe: v.timeframe,
            signal: v.signal,
            confidence: round_dp(v.confidence, 1),
            price: round_dp(v.price, decimals_for_price(v.price)),
        })
        .collect();

    let Some(primary) = parts.primary_analysis else {
        return AnalysisReport {
            instrument: parts.instrument.symbol.clone(),
            primary_timeframe: parts.primary,
            signal: aggregate.signal,
            confidence: round_dp(aggregate.confidence, 1),
            current_price: None,
            entry_price: None,
            stop_loss: None,
            take_profit: None,
            trailing_activation: None,
            risk_reward: 0.0,
            timestamp: report_timestamp(parts.generated_at),
            indicators: None,
            multi_timeframe,
            timeframes,
            reasoning,
        };
    };

    let levels = compute_levels(
        aggregate.signal,
        primary.verdict.price,
        primary.snapshot.atr,
        parts.instrument.asset_class,
        &config.levels,
    );
    let snapshot = &primary.snapshot;

    AnalysisReport {
        instrument: parts.instrument.symbol.clone(),
        primary_timeframe: parts.primary,
        signal: aggregate.signal,
        confidence: round_dp(aggregate.confidence, 1),
        current_price: Some(levels.entry),
        entry_price: Some(levels.entry),
        stop_loss: levels.stop_loss,
        take_profit: levels.take_profit,
        trailing_activation: levels.trailing_activation,
        risk_reward: levels.risk_reward,
        timestamp: report_timestamp(parts.generated_at),
        indicators: Some(IndicatorSummary {
            rsi: round_dp(snapshot.rsi, 1),
            adx: round_dp(snapshot.adx, 1),
            atr: round_dp(snapshot.atr, levels.decimals),
            trend: primary.verdict.trend.to_string(),
        }),
        multi_timeframe,
        timeframes,
        reasoning,
    }
}
