//! Per-asset-class trade level profiles.
//!
//! Adding an instrument class means adding a row here, not a branch in the calculator.

use crate::domain::AssetClass;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelProfile {
    /// ATR multiple used for the stop distance
    pub atr_multiplier: f64,
    /// Take-profit distance as a multiple of the stop distance
    pub risk_reward: f64,
}

pub const DEFAULT_LEVEL_PROFILE: LevelProfile = LevelProfile {
    atr_multiplier: 1.0,
    risk_reward: 1.5,
};

pub const LEVEL_PROFILES: &[(AssetClass, LevelProfile)] = &[
    (
        AssetClass::Crypto,
        LevelProfile {
            atr_multiplier: 2.0,
            risk_reward: 2.5,
        },
    ),
    (
        AssetClass::PreciousMetal,
        LevelProfile {
            atr_multiplier: 1.5,
            risk_reward: 2.0,
        },
    ),
    (
        AssetClass::Commodity,
        LevelProfile {
            atr_multiplier: 1.5,
            risk_reward: 2.0,
        },
    ),
    (AssetClass::Forex, DEFAULT_LEVEL_PROFILE),
];

pub fn level_profile(asset_class: AssetClass) -> LevelProfile {
    LEVEL_PROFILES
        .iter()
        .find(|(class, _)| *class == asset_class)
        .map(|(_, profile)| *profile)
        .unwrap_or(DEFAULT_LEVEL_PROFILE)
}

/// Price-magnitude rounding tiers: `(exclusive lower bound, decimals)`, checked in order.
pub const DECIMAL_TIERS: &[(f64, u32)] = &[(10_000.0, 2), (1_000.0, 3), (100.0, 4)];
pub const DEFAULT_DECIMALS: u32 = 5;

pub fn decimals_for_price(price: f64) -> u32 {
    DECIMAL_TIERS
        .iter()
        .find(|(floor, _)| price > *floor)
        .map(|(_, decimals)| *decimals)
        .unwrap_or(DEFAULT_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_by_class() {
        assert_eq!(level_profile(AssetClass::Crypto).risk_reward, 2.5);
        assert_eq!(level_profile(AssetClass::PreciousMetal).atr_multiplier, 1.5);
        assert_eq!(level_profile(AssetClass::Forex), DEFAULT_LEVEL_PROFILE);
    }

    #[test]
    fn decimal_tiers() {
        assert_eq!(decimals_for_price(65_000.0), 2);
        assert_eq!(decimals_for_price(2_400.0), 3);
        assert_eq!(decimals_for_price(150.2), 4);
        assert_eq!(decimals_for_price(100.0), 5);
        assert_eq!(decimals_for_price(1.0843), 5);
    }
}
