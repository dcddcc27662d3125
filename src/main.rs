use anyhow::{Context, Result};
use clap::Parser;
use tokio::runtime::Runtime;

use mtf_confluence::{Cli, SeriesFileSource, SignalEngine};

fn main() -> Result<()> {
    // A. Init Logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Load the series bundle
    let path = args.input_path();
    let source = SeriesFileSource::load(&path)
        .context(format!("Failed to load series bundle {}", path.display()))?;

    // D. Analyse (blocking)
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let engine = SignalEngine::new(source);
    let report = rt.block_on(engine.analyze(&args.instrument, &args.timeframes, &args.primary))?;

    // E. Print
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);
    Ok(())
}
