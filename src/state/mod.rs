//! Storage types and protocol constants shared by the contracts.

pub mod market_info;
pub mod membership;

pub use market_info::*;
pub use membership::*;

use crate::math::common::WAD;
use odra::casper_types::account::AccountHash;
use odra::prelude::Address;

/// Lowest accepted liquidation incentive (exclusive): the liquidator must earn
/// a bonus.
pub const MIN_LIQUIDATION_INCENTIVE: u64 = WAD;
/// Highest accepted liquidation incentive (inclusive), 150%.
pub const MAX_LIQUIDATION_INCENTIVE: u64 = WAD + WAD / 2;
/// Liquidation incentive used by the deploy script, 110%.
pub const DEFAULT_LIQUIDATION_INCENTIVE: u64 = WAD + WAD / 10;

/// The all-zero account hash, used as the "nobody" address.
pub fn zero_address() -> Address {
    Address::Account(AccountHash::new([0u8; 32]))
}

/// Whether `address` is the zero address.
pub fn is_zero_address(address: &Address) -> bool {
    *address == zero_address()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn incentive_bounds_sanity() {
        assert!(DEFAULT_LIQUIDATION_INCENTIVE > MIN_LIQUIDATION_INCENTIVE);
        assert!(DEFAULT_LIQUIDATION_INCENTIVE <= MAX_LIQUIDATION_INCENTIVE);
    }

    #[test]
    fn zero_address_detection() {
        assert!(is_zero_address(&zero_address()));
        assert!(!is_zero_address(&Address::Account(AccountHash::new([7u8; 32]))));
    }
}
