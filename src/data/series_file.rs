use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(debug_assertions)]
use crate::config::debug::PRINT_SERDE;
use crate::config::{SERIES_PATH, SERIES_VERSION, series_bundle_filename};
use crate::data::TimeframeSource;
use crate::domain::{Instrument, Timeframe};
use crate::models::TimeframeSeries;
use crate::utils::time_utils::{minutes_between, utc_now_as_timestamp_ms};

/// Serialized bundle of series for one or more instruments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SeriesFile {
    pub version: f64,
    pub timestamp_ms: i64,
    pub series: Vec<TimeframeSeries>,
}

impl SeriesFile {
    pub fn new(series: Vec<TimeframeSeries>) -> Self {
        Self {
            version: SERIES_VERSION,
            timestamp_ms: utc_now_as_timestamp_ms(),
            series,
        }
    }

    /// `.json` files are read as JSON, anything else as bincode.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open series file: {:?}", path))?;
        let reader = BufReader::new(file);
        let bundle: SeriesFile = if is_json(path) {
            serde_json::from_reader(reader)
                .context(format!("Failed to parse series JSON: {:?}", path))?
        } else {
            bincode::deserialize_from(reader)
                .context(format!("Failed to deserialize series file: {:?}", path))?
        };
        if bundle.version != SERIES_VERSION {
            bail!(
                "Series file {:?} has version {} (expected {})",
                path,
                bundle.version,
                SERIES_VERSION
            );
        }

        #[cfg(debug_assertions)]
        if PRINT_SERDE {
            log::info!(
                "Loaded {} series from {:?} (written at {})",
                bundle.series.len(),
                path,
                crate::utils::time_utils::epoch_ms_to_utc(bundle.timestamp_ms)
            );
        }
        Ok(bundle)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        let file =
            File::create(path).context(format!("Failed to create file: {}", path.display()))?;
        let writer = BufWriter::new(file);
        if is_json(path) {
            serde_json::to_writer_pretty(writer, self)
                .context(format!("Failed to write series JSON to: {}", path.display()))
        } else {
            bincode::serialize_into(writer, self)
                .context(format!("Failed to serialize series to: {}", path.display()))
        }
    }

    pub fn default_path(symbol: &str, extension: &str) -> PathBuf {
        PathBuf::from(SERIES_PATH).join(series_bundle_filename(symbol, extension))
    }

    pub fn find(&self, symbol: &str, timeframe: Timeframe) -> Option<&TimeframeSeries> {
        self.series
            .iter()
            .find(|s| s.instrument.symbol == symbol && s.timeframe == timeframe)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Serves series out of a [`SeriesFile`].
///
/// Stored ages are meaningless once the file sits on disk, so the age of each series is
/// recomputed at fetch time: minutes from the close of its last bar to the clock.
pub struct SeriesFileSource {
    bundle: SeriesFile,
    // Fixed clock for reproducible runs; None reads the system clock
    now_ms: Option<i64>,
}

impl SeriesFileSource {
    pub fn new(bundle: SeriesFile) -> Self {
        Self {
            bundle,
            now_ms: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(SeriesFile::load_from_path(path)?))
    }

    pub fn with_clock(mut self, now_ms: i64) -> Self {
        self.now_ms = Some(now_ms);
        self
    }

    fn now_ms(&self) -> i64 {
        self.now_ms.unwrap_or_else(utc_now_as_timestamp_ms)
    }
}

#[async_trait]
impl TimeframeSource for SeriesFileSource {
    async fn fetch(
        &self,
        instrument: &Instrument,
        timeframe: Timeframe,
    ) -> Result<TimeframeSeries> {
        let stored = self
            .bundle
            .find(&instrument.symbol, timeframe)
            .ok_or_else(|| anyhow!("{} {} not in series file", instrument, timeframe))?;
        let last_ms = stored
            .last_timestamp_ms()
            .ok_or_else(|| anyhow!("{} {} series file entry is empty", instrument, timeframe))?;

        let age = minutes_between(last_ms, self.now_ms());
        Ok(stored.clone().with_age_minutes(age))
    }

    fn signature(&self) -> &'static str {
        "Series File"
    }
}
