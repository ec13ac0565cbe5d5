//! Fixed-point math used for pricing and share accounting.

pub mod common;
pub mod decimal;
pub mod rate;

pub use common::{base_unit, mul_div_down, mul_div_up, TryAdd, TryMul, MAX_DECIMALS, WAD};
pub use decimal::Decimal;
pub use rate::Rate;
