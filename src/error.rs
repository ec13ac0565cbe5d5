//! Error types shared by the ledger and the auditor.

use core::fmt;

use odra::prelude::*;

/// Errors raised by the lending core contracts.
///
/// Codes are grouped by area and stable across versions.
#[odra::odra_error]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LendingError {
    // 0
    Unauthorized = 0,
    MathOverflow = 1,
    InvalidParameter = 2,
    InvalidAmount = 3,

    // 10 - ledger
    InvalidRecipient = 10,
    ZeroAddressTransfer = 11,
    InsufficientBalance = 12,
    InsufficientAllowance = 13,
    NoHolders = 14,

    // 20 - auditor
    MarketNotListed = 20,
    MarketAlreadyListed = 21,
    NotMarket = 22,
    InvalidPrice = 23,
    InsufficientShortfall = 24,
    NonzeroBorrowBalance = 25,
    InsufficientAccountLiquidity = 26,
}

impl LendingError {
    /// Human readable description of the error.
    pub fn message(&self) -> &str {
        match self {
            LendingError::Unauthorized => "Caller is not allowed to perform this operation",
            LendingError::MathOverflow => "Math operation overflow",
            LendingError::InvalidParameter => "Input parameter is out of bounds",
            LendingError::InvalidAmount => "Input amount is invalid",
            LendingError::InvalidRecipient => "Cannot mint to the zero address",
            LendingError::ZeroAddressTransfer => "Transfer to the zero address",
            LendingError::InsufficientBalance => "Transfer amount exceeds balance",
            LendingError::InsufficientAllowance => "Transfer amount exceeds allowance",
            LendingError::NoHolders => "Cannot accrue earnings without holders",
            LendingError::MarketNotListed => "Market is not listed",
            LendingError::MarketAlreadyListed => "Market is already listed",
            LendingError::NotMarket => "Caller is not the listed market",
            LendingError::InvalidPrice => "Price feed returned an invalid price",
            LendingError::InsufficientShortfall => "Cannot liquidate a solvent account",
            LendingError::NonzeroBorrowBalance => "Account has debt in the market",
            LendingError::InsufficientAccountLiquidity => "Account liquidity is insufficient",
        }
    }
}

impl fmt::Display for LendingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
