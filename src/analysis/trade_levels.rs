use crate::config::analysis::LevelSettings;
use crate::config::{decimals_for_price, level_profile};
use crate::domain::{AssetClass, Direction, Signal};
use crate::models::TradeLevels;
use crate::utils::maths_utils::round_dp;

/// Stop distance from ATR, floored at a fraction of price so quiet markets still get room.
pub fn stop_distance(atr: f64, price: f64, atr_multiplier: f64, settings: &LevelSettings) -> f64 {
    (atr * atr_multiplier).max(price * settings.min_stop_fraction)
}

/// Entry, stop, target and trailing activation for a final signal.
///
/// Levels are only produced for a trade; `NO_TRADE` keeps the entry and nulls the rest.
/// All prices are rounded to the decimal tier of the entry price.
pub fn compute_levels(
    signal: Signal,
    entry: f64,
    atr: f64,
    asset_class: AssetClass,
    settings: &LevelSettings,
) -> TradeLevels {
    let decimals = decimals_for_price(entry);
    let profile = level_profile(asset_class);

    let side = match signal.direction() {
        Direction::Bullish => 1.0,
        Direction::Bearish => -1.0,
        Direction::Neutral => {
            return TradeLevels {
                entry: round_dp(entry, decimals),
                stop_loss: None,
                take_profit: None,
                trailing_activation: None,
                risk_reward: 0.0,
                decimals,
            };
        }
    };

    let distance = stop_distance(atr, entry, profile.atr_multiplier, settings);
    TradeLevels {
        entry: round_dp(entry, decimals),
        stop_loss: Some(round_dp(entry - side * distance, decimals)),
        take_profit: Some(round_dp(
            entry + side * distance * profile.risk_reward,
            decimals,
        )),
        trailing_activation: Some(round_dp(
            entry + side * distance * settings.trailing_activation_fraction,
            decimals,
        )),
        risk_reward: profile.risk_reward,
        decimals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ANALYSIS;

    #[test]
    fn buy_levels_for_crypto() {
        // distance = max(500 * 2.0, 50_000 * 0.005) = 1000
        let levels = compute_levels(
            Signal::StrongBuy,
            50_000.0,
            500.0,
            AssetClass::Crypto,
            &ANALYSIS.levels,
        );
        assert_eq!(levels.decimals, 2);
        assert_eq!(levels.stop_loss, Some(49_000.0));
        assert_eq!(levels.take_profit, Some(52_500.0));
        assert_eq!(levels.trailing_activation, Some(50_500.0));
        assert_eq!(levels.risk_reward, 2.5);
    }

    #[test]
    fn sell_levels_mirror_for_metals() {
        // distance = max(10 * 1.5, 2000 * 0.005) = 15
        let levels = compute_levels(
            Signal::Sell,
            2_000.0,
            10.0,
            AssetClass::PreciousMetal,
            &ANALYSIS.levels,
        );
        assert_eq!(levels.decimals, 3);
        assert_eq!(levels.stop_loss, Some(2_015.0));
        assert_eq!(levels.take_profit, Some(1_970.0));
        assert_eq!(levels.trailing_activation, Some(1_992.5));
    }

    #[test]
    fn minimum_stop_distance_applies_when_atr_is_tiny() {
        // forex: max(0.0001 * 1.0, 1.1 * 0.005) = 0.0055
        let levels = compute_levels(
            Signal::WeakBuy,
            1.1,
            0.0001,
            AssetClass::Forex,
            &ANALYSIS.levels,
        );
        assert_eq!(levels.decimals, 5);
        assert_eq!(levels.stop_loss, Some(1.0945));
        assert_eq!(levels.take_profit, Some(1.10825));
        assert_eq!(levels.risk_reward, 1.5);
    }

    #[test]
    fn no_trade_has_no_levels() {
        let levels = compute_levels(
            Signal::NoTrade,
            150.123_456,
            2.0,
            AssetClass::Commodity,
            &ANALYSIS.levels,
        );
        assert_eq!(levels.entry, 150.1235);
        assert_eq!(levels.stop_loss, None);
        assert_eq!(levels.take_profit, None);
        assert_eq!(levels.trailing_activation, None);
        assert_eq!(levels.risk_reward, 0.0);
    }
}
