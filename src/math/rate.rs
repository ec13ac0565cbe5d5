//! Fractions such as adjust factors and the liquidation incentive.

use {
    crate::math::common::*,
    alloc::format,
    alloc::string::ToString,
    core::fmt,
    odra::casper_types::U256,
};

/// Fraction scaled by WAD, `Rate::one()` being 100%
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Eq, Ord)]
pub struct Rate(pub U256);

impl Rate {
    /// One (100%)
    pub fn one() -> Self {
        Self(Self::wad())
    }

    fn wad() -> U256 {
        U256::from(WAD)
    }

    /// Create rate from percent value
    pub fn from_percent(percent: u8) -> Self {
        Self(U256::from(percent as u64 * PERCENT_SCALER))
    }

    /// Return raw scaled value
    pub fn to_scaled_val(&self) -> U256 {
        self.0
    }

    /// Create rate from scaled value
    pub fn from_scaled_val(scaled_val: U256) -> Self {
        Self(scaled_val)
    }

    /// Whether the rate lies in `[0, 1]`.
    pub fn is_fraction(&self) -> bool {
        *self <= Self::one()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut scaled_val = self.0.to_string();
        if scaled_val.len() <= SCALE {
            let padding = "0".repeat(SCALE - scaled_val.len());
            scaled_val = format!("0.{}{}", padding, scaled_val);
        } else {
            scaled_val.insert(scaled_val.len() - SCALE, '.');
        }
        f.write_str(&scaled_val)
    }
}
