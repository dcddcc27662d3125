use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::INSTRUMENTS;

/// Instrument class used to pick stop multipliers and risk-reward targets.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Crypto,
    PreciousMetal,
    Commodity,
    #[default]
    Forex,
}

#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct Instrument {
    pub symbol: String,
    pub asset_class: AssetClass,
}

impl Instrument {
    /// Look the symbol up in the instrument catalogue; unknown symbols fall back to the
    /// quote-suffix heuristic and finally to the default class.
    pub fn new(symbol: &str) -> Self {
        let symbol = symbol.trim().to_uppercase();
        let asset_class = INSTRUMENTS
            .iter()
            .find(|spec| spec.symbol == symbol)
            .map(|spec| spec.asset_class)
            .unwrap_or_else(|| Self::infer_asset_class(&symbol));
        Self {
            symbol,
            asset_class,
        }
    }

    // Finds the quote currency at the end of the symbol and returns it.
    pub fn get_quote(text: &str) -> Option<&str> {
        static QUOTES: &[&str] = &["USDT", "USDC", "USD", "EUR", "GBP", "JPY", "CHF", "CAD"];
        QUOTES.iter().find(|&&ext| text.ends_with(ext)).copied()
    }

    pub fn get_base(text: &str) -> Option<&str> {
        let quote = Self::get_quote(text)?;
        text.strip_suffix(quote).filter(|base| !base.is_empty())
    }

    fn infer_asset_class(symbol: &str) -> AssetClass {
        static CRYPTO_BASES: &[&str] = &["BTC", "ETH", "SOL", "BNB", "XRP", "ADA", "DOGE"];
        static METAL_BASES: &[&str] = &["XAU", "XAG", "XPT", "XPD", "PAXG"];
        match Self::get_base(symbol) {
            Some(base) if CRYPTO_BASES.contains(&base) => AssetClass::Crypto,
            Some(base) if METAL_BASES.contains(&base) => AssetClass::PreciousMetal,
            _ if symbol.ends_with("OIL") => AssetClass::Commodity,
            _ => AssetClass::Forex,
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({:?})", self.symbol, self.asset_class)
    }
}
