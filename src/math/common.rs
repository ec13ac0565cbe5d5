//! Shared scalers and checked arithmetic traits for [`Decimal`] and [`Rate`].
//!
//! [`Decimal`]: super::Decimal
//! [`Rate`]: super::Rate

use crate::error::LendingError;
use odra::casper_types::U256;

/// Scale of precision
pub const SCALE: usize = 18;
/// Identity
pub const WAD: u64 = 1_000_000_000_000_000_000;
/// Scale for percentages
pub const PERCENT_SCALER: u64 = 10_000_000_000_000_000;

/// Try to add, return an error on overflow
pub trait TryAdd: Sized {
    /// Add
    fn try_add(self, rhs: Self) -> Result<Self, LendingError>;
}

/// Try to multiply, return an error on overflow
pub trait TryMul<RHS>: Sized {
    /// Multiply
    fn try_mul(self, rhs: RHS) -> Result<Self, LendingError>;
}

/// `a * b / denominator`, rounded down.
pub fn mul_div_down(a: U256, b: U256, denominator: U256) -> Result<U256, LendingError> {
    a.checked_mul(b)
        .ok_or(LendingError::MathOverflow)?
        .checked_div(denominator)
        .ok_or(LendingError::MathOverflow)
}

/// `a * b / denominator`, rounded up.
pub fn mul_div_up(a: U256, b: U256, denominator: U256) -> Result<U256, LendingError> {
    if denominator.is_zero() {
        return Err(LendingError::MathOverflow);
    }
    let product = a.checked_mul(b).ok_or(LendingError::MathOverflow)?;
    let quotient = product / denominator;
    if (product % denominator).is_zero() {
        Ok(quotient)
    } else {
        quotient
            .checked_add(U256::one())
            .ok_or(LendingError::MathOverflow)
    }
}

/// Largest decimals count whose base unit fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

/// `10^decimals` as a base unit for a token with `decimals` decimals.
pub fn base_unit(decimals: u8) -> Result<U256, LendingError> {
    if decimals > MAX_DECIMALS {
        return Err(LendingError::MathOverflow);
    }
    Ok(U256::exp10(decimals as usize))
}
