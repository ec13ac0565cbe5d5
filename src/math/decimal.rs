//! Value denominated in the price feed's base currency, precise to 18 digits.

use {
    crate::{
        error::LendingError,
        math::{common::*, Rate},
    },
    alloc::string::ToString,
    core::fmt,
    odra::casper_types::U256,
};

/// Large decimal values, precise to 18 digits
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Eq, Ord)]
pub struct Decimal(pub U256);

impl Decimal {
    /// Zero
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    fn wad() -> U256 {
        U256::from(WAD)
    }

    /// Create decimal from scaled value
    pub fn from_scaled_val(scaled_val: U256) -> Self {
        Self(scaled_val)
    }

    /// Return raw scaled value
    #[allow(clippy::wrong_self_convention)]
    pub fn to_scaled_val(&self) -> U256 {
        self.0
    }

    /// Value of `amount` token units priced at `price` (scaled by WAD) for a
    /// token with `decimals` decimals, rounded down.
    pub fn from_amount(amount: U256, price: U256, decimals: u8) -> Result<Self, LendingError> {
        Ok(Self(mul_div_down(amount, price, base_unit(decimals)?)?))
    }

    /// Same as [`Decimal::from_amount`] but rounded up.
    pub fn from_amount_up(amount: U256, price: U256, decimals: u8) -> Result<Self, LendingError> {
        Ok(Self(mul_div_up(amount, price, base_unit(decimals)?)?))
    }

    /// Token units of a token with `decimals` decimals worth this value at
    /// `price`, rounded down.
    pub fn to_amount(&self, price: U256, decimals: u8) -> Result<U256, LendingError> {
        mul_div_down(self.0, base_unit(decimals)?, price)
    }

    /// Multiply by a rate, rounding up.
    pub fn try_mul_up(self, rhs: Rate) -> Result<Self, LendingError> {
        Ok(Self(mul_div_up(self.0, rhs.0, Self::wad())?))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut scaled_val = self.0.to_string();
        if scaled_val.len() <= SCALE {
            let padding = "0".repeat(SCALE - scaled_val.len());
            scaled_val.insert_str(0, &padding);
            scaled_val.insert_str(0, "0.");
        } else {
            scaled_val.insert(scaled_val.len() - SCALE, '.');
        }
        f.write_str(&scaled_val)
    }
}

impl From<u64> for Decimal {
    fn from(val: u64) -> Self {
        Self(Self::wad() * U256::from(val))
    }
}

impl TryAdd for Decimal {
    fn try_add(self, rhs: Self) -> Result<Self, LendingError> {
        Ok(Self(self.0.checked_add(rhs.0).ok_or(LendingError::MathOverflow)?))
    }
}

impl TryMul<Rate> for Decimal {
    fn try_mul(self, rhs: Rate) -> Result<Self, LendingError> {
        Ok(Self(mul_div_down(self.0, rhs.0, Self::wad())?))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_scaler() {
        assert_eq!(U256::from(WAD), Decimal::wad());
    }

    #[test]
    fn values_amounts_with_token_decimals() {
        // 1.5 units of a 6 decimals token at 2.0
        let value =
            Decimal::from_amount(U256::from(1_500_000u64), U256::from(2 * WAD), 6).unwrap();
        assert_eq!(value, Decimal::from(3u64));
        assert_eq!(
            value.to_amount(U256::from(2 * WAD), 6).unwrap(),
            U256::from(1_500_000u64)
        );
    }

    #[test]
    fn weighted_value_rounds_in_both_directions() {
        let value = Decimal::from_scaled_val(U256::from(3u64));
        let half = Rate::from_percent(50);
        assert_eq!(value.try_mul(half).unwrap().0, U256::one());
        assert_eq!(value.try_mul_up(half).unwrap().0, U256::from(2u64));
    }

    #[test]
    fn display_pads_fraction() {
        assert_eq!(Decimal::from(95u64).to_string(), "95.000000000000000000");
        assert_eq!(
            Decimal::from_scaled_val(U256::from(5u64)).to_string(),
            "0.000000000000000005"
        );
    }
}
