//! Known instrument catalogue.

use crate::domain::AssetClass;

/// One catalogue entry: our symbol, the symbol an upstream quote provider uses for it,
/// and the asset class that drives trade levels.
#[derive(Debug, Clone, Copy)]
pub struct InstrumentSpec {
    pub symbol: &'static str,
    pub provider_symbol: &'static str,
    pub asset_class: AssetClass,
}

const fn spec(
    symbol: &'static str,
    provider_symbol: &'static str,
    asset_class: AssetClass,
) -> InstrumentSpec {
    InstrumentSpec {
        symbol,
        provider_symbol,
        asset_class,
    }
}

pub const INSTRUMENTS: &[InstrumentSpec] = &[
    spec("EURUSD", "EURUSD=X", AssetClass::Forex),
    spec("GBPUSD", "GBPUSD=X", AssetClass::Forex),
    spec("USDJPY", "USDJPY=X", AssetClass::Forex),
    spec("AUDUSD", "AUDUSD=X", AssetClass::Forex),
    spec("USDCAD", "USDCAD=X", AssetClass::Forex),
    spec("USDCHF", "USDCHF=X", AssetClass::Forex),
    spec("NZDUSD", "NZDUSD=X", AssetClass::Forex),
    spec("EURGBP", "EURGBP=X", AssetClass::Forex),
    spec("EURJPY", "EURJPY=X", AssetClass::Forex),
    spec("GBPJPY", "GBPJPY=X", AssetClass::Forex),
    spec("AUDJPY", "AUDJPY=X", AssetClass::Forex),
    spec("XAUUSD", "GC=F", AssetClass::PreciousMetal),
    spec("XAGUSD", "SI=F", AssetClass::PreciousMetal),
    spec("BTCUSD", "BTC-USD", AssetClass::Crypto),
    spec("ETHUSD", "ETH-USD", AssetClass::Crypto),
    spec("USOIL", "CL=F", AssetClass::Commodity),
    spec("UKOIL", "BZ=F", AssetClass::Commodity),
];

/// Upstream symbol for `symbol`, following the `<PAIR>=X` convention for pairs that are
/// not catalogued.
pub fn provider_symbol(symbol: &str) -> String {
    INSTRUMENTS
        .iter()
        .find(|spec| spec.symbol.eq_ignore_ascii_case(symbol))
        .map(|spec| spec.provider_symbol.to_string())
        .unwrap_or_else(|| format!("{}=X", symbol.to_uppercase()))
}
