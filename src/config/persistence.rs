//! Series bundle file configuration

/// Directory path for storing series bundles
pub const SERIES_PATH: &str = "series_data";

/// Base filename for series bundles (without extension)
pub const SERIES_FILENAME_WITHOUT_EXT: &str = "series";

/// Current version of the series bundle format
pub const SERIES_VERSION: f64 = 1.0;

/// Bundle filename for an instrument.
/// Example: "series_BTCUSD_v1.bin"
pub fn series_bundle_filename(symbol: &str, extension: &str) -> String {
    format!(
        "{}_{}_v{}.{}",
        SERIES_FILENAME_WITHOUT_EXT,
        symbol.to_uppercase(),
        SERIES_VERSION,
        extension
    )
}
