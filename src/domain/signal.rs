use serde::{Deserialize, Serialize};
use std::fmt;

/// Trading signal, ordered from most bearish to most bullish.
///
/// The derived `Ord` follows declaration order, so
/// `StrongSell < Sell < WeakSell < NoTrade < WeakBuy < Buy < StrongBuy`.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Debug,
    Serialize,
    Deserialize,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    StrongSell,
    Sell,
    WeakSell,
    #[default]
    NoTrade,
    WeakBuy,
    Buy,
    StrongBuy,
}

/// Which side of the market a signal leans to.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl Signal {
    pub fn direction(&self) -> Direction {
        match self {
            Signal::WeakBuy | Signal::Buy | Signal::StrongBuy => Direction::Bullish,
            Signal::WeakSell | Signal::Sell | Signal::StrongSell => Direction::Bearish,
            Signal::NoTrade => Direction::Neutral,
        }
    }

    pub fn is_buy(&self) -> bool {
        self.direction() == Direction::Bullish
    }

    pub fn is_sell(&self) -> bool {
        self.direction() == Direction::Bearish
    }

    /// Vote multiplier used when weighting timeframes against each other.
    pub fn vote_multiplier(&self) -> f64 {
        match self {
            Signal::StrongBuy | Signal::StrongSell => 2.0,
            Signal::Buy | Signal::Sell => 1.0,
            Signal::WeakBuy | Signal::WeakSell => 0.5,
            Signal::NoTrade => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::StrongSell => "STRONG_SELL",
            Signal::Sell => "SELL",
            Signal::WeakSell => "WEAK_SELL",
            Signal::NoTrade => "NO_TRADE",
            Signal::WeakBuy => "WEAK_BUY",
            Signal::Buy => "BUY",
            Signal::StrongBuy => "STRONG_BUY",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn signals_are_totally_ordered_bearish_to_bullish() {
        let ordered: Vec<Signal> = Signal::iter().collect();
        assert!(ordered.windows(2).all(|w| w[0] < w[1]));
        assert!(Signal::StrongSell < Signal::NoTrade);
        assert!(Signal::WeakBuy > Signal::NoTrade);
        assert_eq!(Signal::iter().max(), Some(Signal::StrongBuy));
    }

    #[test]
    fn families_and_multipliers() {
        assert!(Signal::WeakBuy.is_buy());
        assert!(Signal::StrongSell.is_sell());
        assert_eq!(Signal::StrongBuy.vote_multiplier(), 2.0);
        assert_eq!(Signal::Sell.vote_multiplier(), 1.0);
        assert_eq!(Signal::WeakSell.vote_multiplier(), 0.5);
    }

    #[test]
    fn serializes_as_screaming_tags() {
        let json = serde_json::to_string(&Signal::StrongBuy).unwrap();
        assert_eq!(json, "\"STRONG_BUY\"");
        assert_eq!(Signal::NoTrade.to_string(), "NO_TRADE");
    }
}
