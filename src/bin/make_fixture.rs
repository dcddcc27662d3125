use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use mtf_confluence::data::SeriesFile;
use mtf_confluence::data::synthetic;
use mtf_confluence::{Instrument, SourceTag, Timeframe, TimeframeSeries};

/// Write a synthetic series bundle for trying the analyser without a data feed.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "BTCUSD")]
    instrument: String,

    /// rising, falling, flat or sawtooth
    #[arg(long, default_value = "rising")]
    shape: String,

    #[arg(long, default_value_t = 100.0)]
    start_price: f64,

    #[arg(long, default_value_t = 120)]
    bars: usize,

    /// Write JSON instead of bincode
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Output path. Defaults to the bundle path the analyser reads.
    #[arg(long)]
    output: Option<PathBuf>,
}

const TIMEFRAMES: [Timeframe; 4] = [Timeframe::M15, Timeframe::H1, Timeframe::H4, Timeframe::D1];

fn generate(args: &Args, timeframe: Timeframe) -> Result<TimeframeSeries> {
    let instrument = Instrument::new(&args.instrument);
    let (n, price) = (args.bars, args.start_price);
    let series = match args.shape.as_str() {
        "rising" => synthetic::trending_series(instrument, timeframe, n, price),
        "falling" => synthetic::falling_series(instrument, timeframe, n, price),
        "flat" => synthetic::flat_series(instrument, timeframe, n, price),
        "sawtooth" => synthetic::sawtooth_series(instrument, timeframe, n, price, 2.0),
        other => anyhow::bail!("Unknown shape '{}'", other),
    };
    let last = series
        .last_close()
        .ok_or_else(|| anyhow::anyhow!("Requested an empty series"))?;
    Ok(series.with_live_price(last, SourceTag::Historical))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let series = TIMEFRAMES
        .iter()
        .map(|&tf| generate(&args, tf))
        .collect::<Result<Vec<_>>>()?;
    let bundle = SeriesFile::new(series);

    let extension = if args.json { "json" } else { "bin" };
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| SeriesFile::default_path(&args.instrument, extension));
    bundle.save_to_path(&path)?;

    println!(
        "✅ Wrote {} {} series for {} to {:?}",
        bundle.series.len(),
        args.shape,
        args.instrument.to_uppercase(),
        path
    );
    Ok(())
}
