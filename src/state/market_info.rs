use odra::casper_types::U256;

use crate::math::Rate;

/// Risk parameters of a listed market.
#[odra::odra_type]
pub struct MarketInfo {
    /// Set once the market is listed; markets are never delisted.
    pub is_listed: bool,
    /// Collateral weight scaled by WAD, in `[0, 1]`.
    pub adjust_factor: U256,
    /// Decimals of the market's underlying asset, read at listing time.
    pub decimals: u8,
}

impl MarketInfo {
    /// Info for a freshly listed market.
    pub fn listed(adjust_factor: Rate, decimals: u8) -> Self {
        Self {
            is_listed: true,
            adjust_factor: adjust_factor.to_scaled_val(),
            decimals,
        }
    }

    /// Info reported for a market the auditor does not know.
    pub fn unlisted() -> Self {
        Self {
            is_listed: false,
            adjust_factor: U256::zero(),
            decimals: 0,
        }
    }

    /// Collateral weight as a [`Rate`].
    pub fn adjust_factor(&self) -> Rate {
        Rate::from_scaled_val(self.adjust_factor)
    }
}
