use std::time::Duration;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::analysis::timeframe_scoring::{TimeframeAnalysis, is_excluded, score_series};
use crate::analysis::{ReportParts, aggregate, format_report};
#[cfg(debug_assertions)]
use crate::config::debug::PRINT_FETCH_EVENTS;
use crate::config::{ANALYSIS, AnalysisConfig, FETCH, provider_symbol};
use crate::data::TimeframeSource;
use crate::domain::{Instrument, Timeframe, parse_timeframes};
use crate::models::{AggregateVerdict, AnalysisReport, TimeframeSeries, TimeframeVerdict};

/// The multi-timeframe signal service.
///
/// Owns an injected data source and an analysis configuration. Every call to
/// [`SignalEngine::analyze`] builds its entities fresh; nothing is shared between requests.
pub struct SignalEngine<S: TimeframeSource> {
    source: S,
    config: AnalysisConfig,
}

impl<S: TimeframeSource> SignalEngine<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, ANALYSIS)
    }

    pub fn with_config(source: S, config: AnalysisConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch every requested timeframe in parallel and analyse whatever arrives.
    ///
    /// Only malformed requests fail: unknown labels, an empty timeframe list or a blank symbol.
    /// Missing, invalid or timed-out timeframes are dropped and the analysis degrades.
    pub async fn analyze<L: AsRef<str>>(
        &self,
        instrument: &str,
        timeframe_labels: &[L],
        primary: &str,
    ) -> Result<AnalysisReport> {
        let mut timeframes = parse_timeframes(timeframe_labels)?;
        let primary: Timeframe = primary.parse()?;
        if instrument.trim().is_empty() {
            bail!("Instrument symbol is empty");
        }
        if timeframes.is_empty() {
            bail!("No timeframes requested");
        }
        if !timeframes.contains(&primary) {
            timeframes.push(primary);
        }

        let instrument = Instrument::new(instrument);
        let fetches = timeframes
            .iter()
            .map(|&tf| self.fetch_timeframe(&instrument, tf));
        let series: Vec<TimeframeSeries> = join_all(fetches).await.into_iter().flatten().collect();

        log::info!(
            "{} ({}): {} of {} timeframes available from {}",
            instrument.symbol,
            provider_symbol(&instrument.symbol),
            series.len(),
            timeframes.len(),
            self.source.signature()
        );

        Ok(self.analyze_series(&instrument, primary, series, Utc::now()))
    }

    /// One bounded fetch. Any failure is logged and reported as absence.
    async fn fetch_timeframe(
        &self,
        instrument: &Instrument,
        timeframe: Timeframe,
    ) -> Option<TimeframeSeries> {
        let limit = Duration::from_millis(FETCH.timeout_ms);
        let fetched = tokio::time::timeout(limit, self.source.fetch(instrument, timeframe)).await;

        let series = match fetched {
            Ok(Ok(series)) => series,
            Ok(Err(e)) => {
                log::warn!("{} {} unavailable: {:#}", instrument.symbol, timeframe, e);
                return None;
            }
            Err(_) => {
                log::warn!(
                    "{} {} timed out after {} ms",
                    instrument.symbol,
                    timeframe,
                    FETCH.timeout_ms
                );
                return None;
            }
        };

        if series.timeframe != timeframe || series.instrument.symbol != instrument.symbol {
            log::warn!(
                "{} {}: source returned {} {} instead",
                instrument.symbol,
                timeframe,
                series.instrument.symbol,
                series.timeframe
            );
            return None;
        }

        #[cfg(debug_assertions)]
        if PRINT_FETCH_EVENTS {
            log::info!(
                "{} {}: {} bars, age {:.1} min",
                instrument.symbol,
                timeframe,
                series.len(),
                series.age_minutes
            );
        }
        Some(series)
    }

    /// The pure pipeline: series in, report out. The timestamp is injected so that identical
    /// inputs give byte-identical reports.
    pub fn analyze_series(
        &self,
        instrument: &Instrument,
        primary: Timeframe,
        series: Vec<TimeframeSeries>,
        generated_at: DateTime<Utc>,
    ) -> AnalysisReport {
        let config = &self.config;
        let mut notes: Vec<String> = Vec::new();
        let mut seen: Vec<Timeframe> = Vec::new();
        let mut stale_primary: Option<TimeframeSeries> = None;
        let mut usable: Vec<TimeframeSeries> = Vec::new();

        for s in series {
            if seen.contains(&s.timeframe) {
                continue;
            }
            seen.push(s.timeframe);

            if let Err(e) = s.validate(config.min_series_len) {
                log::warn!("Dropping series: {:#}", e);
                notes.push(format!("{}: rejected ({})", s.timeframe, e));
                continue;
            }
            if is_excluded(&s, &config.freshness) {
                notes.push(format!(
                    "{}: excluded, data {:.0} min old (limit {:.0})",
                    s.timeframe,
                    s.age_minutes,
                    s.timeframe.max_age_minutes() * config.freshness.exclusion_age_multiple
                ));
                if s.timeframe == primary {
                    stale_primary = Some(s);
                }
                continue;
            }
            usable.push(s);
        }

        let analyses: Vec<TimeframeAnalysis> =
            usable.iter().map(|s| score_series(s, config)).collect();
        let verdicts: Vec<TimeframeVerdict> = analyses.iter().map(|a| a.verdict.clone()).collect();

        let (aggregate_verdict, primary_analysis, effective_primary) =
            if let Some(stale) = stale_primary {
                let stale_analysis = score_series(&stale, config);
                (
                    AggregateVerdict::no_trade(0.0, "Data too stale"),
                    Some(stale_analysis),
                    primary,
                )
            } else if analyses.is_empty() {
                (
                    AggregateVerdict::no_trade(0.0, "No data available"),
                    None,
                    primary,
                )
            } else {
                let chosen = analyses
                    .iter()
                    .find(|a| a.verdict.timeframe == primary)
                    .or_else(|| analyses.first())
                    .cloned();
                let effective = chosen
                    .as_ref()
                    .map(|a| a.verdict.timeframe)
                    .unwrap_or(primary);
                if effective != primary {
                    notes.push(format!(
                        "Primary {} unavailable, using {}",
                        primary, effective
                    ));
                }
                (
                    aggregate(&verdicts, &config.aggregation),
                    chosen,
                    effective,
                )
            };

        let report = format_report(
            ReportParts {
                instrument,
                primary: effective_primary,
                aggregate: &aggregate_verdict,
                primary_analysis: primary_analysis.as_ref(),
                verdicts: &verdicts,
                notes: &notes,
                generated_at,
            },
            config,
        );

        log::info!(
            "{} {}: {} ({:.1}%) across {} timeframes",
            instrument.symbol,
            effective_primary,
            report.signal,
            report.confidence,
            verdicts.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FixtureSource, synthetic};
    use crate::domain::Signal;
    use crate::models::SourceTag;
    use async_trait::async_trait;
    use chrono::TimeZone;

    /// Serves fixtures, but never answers in time for `slow`.
    struct SlowSource {
        inner: FixtureSource,
        slow: Timeframe,
    }

    #[async_trait]
    impl TimeframeSource for SlowSource {
        async fn fetch(
            &self,
            instrument: &Instrument,
            timeframe: Timeframe,
        ) -> Result<TimeframeSeries> {
            if timeframe == self.slow {
                tokio::time::sleep(Duration::from_millis(FETCH.timeout_ms * 2)).await;
            }
            self.inner.fetch(instrument, timeframe).await
        }

        fn signature(&self) -> &'static str {
            "Slow Fixture"
        }
    }

    /// Answers every request with the same series, whatever was asked for.
    struct FixedSource(TimeframeSeries);

    #[async_trait]
    impl TimeframeSource for FixedSource {
        async fn fetch(&self, _: &Instrument, _: Timeframe) -> Result<TimeframeSeries> {
            Ok(self.0.clone())
        }

        fn signature(&self) -> &'static str {
            "Fixed"
        }
    }

    fn live(series: TimeframeSeries) -> TimeframeSeries {
        let price = series.last_close().unwrap();
        series.with_live_price(price, SourceTag::Live)
    }

    fn rising(symbol: &str, tf: Timeframe) -> TimeframeSeries {
        live(synthetic::trending_series(Instrument::new(symbol), tf, 60, 100.0))
    }

    fn falling(symbol: &str, tf: Timeframe) -> TimeframeSeries {
        live(synthetic::falling_series(Instrument::new(symbol), tf, 60, 100.0))
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    #[tokio::test]
    async fn rising_series_gives_strong_buy_with_levels() {
        let engine = SignalEngine::new(FixtureSource::new().with(rising("BTCUSD", Timeframe::H1)));
        let report = engine.analyze("BTCUSD", &["1h"], "1h").await.unwrap();

        assert_eq!(report.signal, Signal::StrongBuy);
        assert_eq!(report.confidence, 93.0);
        let entry = report.entry_price.unwrap();
        assert!(report.take_profit.unwrap() > entry);
        assert!(report.stop_loss.unwrap() < entry);
        assert!(report.trailing_activation.unwrap() > entry);
        assert_eq!(report.risk_reward, 2.5);
        assert_eq!(report.indicators.unwrap().trend, "strong_uptrend");
    }

    #[tokio::test]
    async fn aligned_timeframes_agree() {
        let source: FixtureSource = [Timeframe::M15, Timeframe::H1, Timeframe::H4]
            .into_iter()
            .map(|tf| rising("ETHUSD", tf))
            .collect();
        let engine = SignalEngine::new(source);
        let report = engine
            .analyze("ETHUSD", &["15m", "1h", "4h"], "1h")
            .await
            .unwrap();
        assert_eq!(report.signal, Signal::StrongBuy);
        assert_eq!(report.multi_timeframe.timeframe_count, 3);
        assert_eq!(report.multi_timeframe.divergence_pct, 0.0);
        assert_eq!(report.timeframes.len(), 3);
    }

    #[tokio::test]
    async fn flat_market_is_no_trade() {
        let flat = synthetic::flat_series(Instrument::new("EURUSD"), Timeframe::H1, 60, 1.1);
        let engine = SignalEngine::new(FixtureSource::new().with(flat));
        let report = engine.analyze("EURUSD", &["1h"], "1h").await.unwrap();
        assert_eq!(report.signal, Signal::NoTrade);
        assert_eq!(report.indicators.as_ref().unwrap().trend, "ranging");
        assert_eq!(report.stop_loss, None);
        assert_eq!(report.take_profit, None);
        assert_eq!(report.current_price, Some(1.1));
    }

    #[tokio::test]
    async fn stale_timeframe_is_excluded_not_penalised() {
        let h4 = rising("BTCUSD", Timeframe::H4);
        let stale_age = Timeframe::H4.max_age_minutes() * 3.0;
        let source = FixtureSource::new()
            .with(rising("BTCUSD", Timeframe::H1))
            .with(h4.with_age_minutes(stale_age));
        let engine = SignalEngine::new(source);
        let report = engine.analyze("BTCUSD", &["1h", "4h"], "1h").await.unwrap();

        assert_eq!(report.multi_timeframe.timeframe_count, 1);
        assert!(report.timeframes.iter().all(|t| t.timeframe != Timeframe::H4));
        assert!(report.reasoning[0].starts_with("4h: excluded"));
        assert_eq!(report.signal, Signal::StrongBuy);
    }

    #[tokio::test]
    async fn stale_primary_short_circuits() {
        let stale_age = Timeframe::H1.max_age_minutes() * 3.0;
        let source = FixtureSource::new()
            .with(rising("BTCUSD", Timeframe::H1).with_age_minutes(stale_age))
            .with(rising("BTCUSD", Timeframe::H4));
        let engine = SignalEngine::new(source);
        let report = engine.analyze("BTCUSD", &["1h", "4h"], "1h").await.unwrap();

        assert_eq!(report.signal, Signal::NoTrade);
        assert!(report.reasoning.iter().any(|r| r == "Data too stale"));
        assert_eq!(report.stop_loss, None);
        assert_eq!(report.multi_timeframe.timeframe_count, 0);
    }

    #[tokio::test]
    async fn no_data_reports_unavailability() {
        let engine = SignalEngine::new(FixtureSource::new());
        let report = engine.analyze("XAUUSD", &["1h", "4h"], "4h").await.unwrap();
        assert_eq!(report.signal, Signal::NoTrade);
        assert_eq!(report.confidence, 0.0);
        assert_eq!(report.current_price, None);
        assert_eq!(report.entry_price, None);
        assert_eq!(report.reasoning, vec!["No data available".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_timeframe_is_dropped() {
        let inner: FixtureSource = [Timeframe::H1, Timeframe::H4, Timeframe::D1]
            .into_iter()
            .map(|tf| rising("BTCUSD", tf))
            .collect();
        let engine = SignalEngine::new(SlowSource {
            inner,
            slow: Timeframe::D1,
        });
        let report = engine
            .analyze("BTCUSD", &["1h", "4h", "1d"], "1h")
            .await
            .unwrap();

        assert_eq!(report.multi_timeframe.timeframe_count, 2);
        assert!(report.timeframes.iter().all(|t| t.timeframe != Timeframe::D1));
        assert_eq!(report.signal, Signal::StrongBuy);
    }

    #[tokio::test]
    async fn mismatched_series_are_ignored() {
        let other_symbol = SignalEngine::new(FixedSource(rising("ETHUSD", Timeframe::H1)));
        let report = other_symbol.analyze("BTCUSD", &["1h"], "1h").await.unwrap();
        assert_eq!(report.signal, Signal::NoTrade);
        assert_eq!(report.reasoning, vec!["No data available".to_string()]);

        let other_timeframe = SignalEngine::new(FixedSource(rising("BTCUSD", Timeframe::H4)));
        let report = other_timeframe.analyze("BTCUSD", &["1h"], "1h").await.unwrap();
        assert_eq!(report.signal, Signal::NoTrade);
        assert_eq!(report.multi_timeframe.timeframe_count, 0);
    }

    #[tokio::test]
    async fn bad_requests_fail_before_fetching() {
        let engine = SignalEngine::new(FixtureSource::new());
        assert!(engine.analyze("BTCUSD", &["2h"], "1h").await.is_err());
        assert!(engine.analyze("BTCUSD", &["1h"], "3d").await.is_err());
        assert!(engine.analyze("BTCUSD", &[] as &[&str], "1h").await.is_err());
        assert!(engine.analyze("  ", &["1h"], "1h").await.is_err());
    }

    #[tokio::test]
    async fn missing_primary_falls_back_to_first_available() {
        let engine = SignalEngine::new(FixtureSource::new().with(rising("BTCUSD", Timeframe::H4)));
        let report = engine.analyze("BTCUSD", &["1h", "4h"], "1h").await.unwrap();
        assert_eq!(report.primary_timeframe, Timeframe::H4);
        assert!(
            report
                .reasoning
                .iter()
                .any(|r| r == "Primary 1h unavailable, using 4h")
        );
    }

    #[tokio::test]
    async fn opposing_higher_timeframes_block_the_trade() {
        let source = FixtureSource::new()
            .with(rising("BTCUSD", Timeframe::H1))
            .with(rising("BTCUSD", Timeframe::H4))
            .with(falling("BTCUSD", Timeframe::D1));
        let engine = SignalEngine::new(source);
        let report = engine
            .analyze("BTCUSD", &["1h", "4h", "1d"], "1h")
            .await
            .unwrap();
        assert_eq!(report.signal, Signal::NoTrade);
        assert!(report.confidence <= 25.0);
        assert!(report.reasoning.iter().any(|r| r == "Higher timeframes conflict"));
    }

    #[test]
    fn identical_inputs_give_identical_reports() {
        let engine = SignalEngine::new(FixtureSource::new());
        let instrument = Instrument::new("BTCUSD");
        let input = vec![
            rising("BTCUSD", Timeframe::H1),
            rising("BTCUSD", Timeframe::H4),
            synthetic::sawtooth_series(instrument.clone(), Timeframe::M15, 60, 150.0, 3.0),
        ];
        let first = engine.analyze_series(&instrument, Timeframe::H1, input.clone(), at());
        let second = engine.analyze_series(&instrument, Timeframe::H1, input, at());
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn short_series_are_rejected() {
        let engine = SignalEngine::new(FixtureSource::new());
        let instrument = Instrument::new("BTCUSD");
        let short = synthetic::trending_series(instrument.clone(), Timeframe::H1, 10, 100.0);
        let report = engine.analyze_series(&instrument, Timeframe::H1, vec![short], at());
        assert_eq!(report.signal, Signal::NoTrade);
        assert_eq!(report.current_price, None);
        assert!(report.reasoning[0].starts_with("1h: rejected"));
    }
}
