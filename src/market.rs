//! Market boundary consumed by the auditor, plus a bookkeeping market used in
//! tests and local deployments.

use odra::casper_types::U256;
use odra::prelude::*;
use odra::ContractRef;

use crate::auditor::AuditorContractRef;
use crate::error::LendingError;
use crate::math::WAD;

/// Balances of an account in a market.
#[odra::odra_type]
pub struct AccountSnapshot {
    /// Deposited underlying units, shares times `exchange_rate`.
    pub deposits: U256,
    /// Borrowed underlying units, interest included.
    pub borrows: U256,
    /// Underlying units per deposit share, scaled by WAD.
    pub exchange_rate: U256,
}

/// Interface every market listed in the auditor implements.
#[odra::external_contract]
pub trait Market {
    fn account_snapshot(&self, account: Address) -> AccountSnapshot;
    fn decimals(&self) -> u8;
}

/// Market that only keeps books. It asks the auditor for permission the same
/// way a real money market does, but holds no assets.
#[odra::module(errors = LendingError)]
pub struct MockMarket {
    auditor: Var<Address>,
    decimals: Var<u8>,
    exchange_rate: Var<U256>,
    deposits: Mapping<Address, U256>,
    borrows: Mapping<Address, U256>,
}

#[odra::module]
impl MockMarket {
    pub fn init(&mut self, auditor: Address, decimals: u8) {
        self.auditor.set(auditor);
        self.decimals.set(decimals);
        self.exchange_rate.set(U256::from(WAD));
    }

    /// Underlying units per deposit share, scaled by WAD.
    pub fn set_exchange_rate(&mut self, exchange_rate: U256) {
        self.exchange_rate.set(exchange_rate);
    }

    pub fn deposit(&mut self, account: Address, amount: U256) {
        let deposits = self
            .deposits
            .get_or_default(&account)
            .checked_add(amount)
            .unwrap_or_revert_with(&self.env(), LendingError::MathOverflow);
        self.deposits.set(&account, deposits);
    }

    /// Withdraws after the auditor confirms the account stays solvent.
    pub fn withdraw(&mut self, account: Address, amount: U256) {
        let deposits = self
            .deposits
            .get_or_default(&account)
            .checked_sub(amount)
            .unwrap_or_revert_with(&self.env(), LendingError::InsufficientBalance);
        self.auditor_ref()
            .check_shortfall(self.env().self_address(), account, amount);
        self.deposits.set(&account, deposits);
    }

    /// Records the debt first, then lets the auditor validate it.
    pub fn borrow(&mut self, account: Address, amount: U256) {
        let borrows = self
            .borrows
            .get_or_default(&account)
            .checked_add(amount)
            .unwrap_or_revert_with(&self.env(), LendingError::MathOverflow);
        self.borrows.set(&account, borrows);
        self.auditor_ref()
            .check_borrow(self.env().self_address(), account);
    }

    pub fn repay(&mut self, account: Address, amount: U256) {
        let borrows = self
            .borrows
            .get_or_default(&account)
            .checked_sub(amount)
            .unwrap_or_revert_with(&self.env(), LendingError::InvalidAmount);
        self.borrows.set(&account, borrows);
    }

    /// Repays up to `max_repay` of `borrower`'s debt and returns the shares of
    /// `collateral_market` the liquidator is owed.
    pub fn liquidate(
        &mut self,
        borrower: Address,
        max_repay: U256,
        collateral_market: Address,
    ) -> U256 {
        let this = self.env().self_address();
        let auditor = self.auditor_ref();
        let repay = auditor.check_liquidation(collateral_market, this, borrower, max_repay);
        let seize = auditor.calculate_seize(collateral_market, this, borrower, repay);
        self.repay(borrower, repay);
        seize
    }

    pub fn account_snapshot(&self, account: Address) -> AccountSnapshot {
        AccountSnapshot {
            deposits: self.deposits.get_or_default(&account),
            borrows: self.borrows.get_or_default(&account),
            exchange_rate: self.exchange_rate.get_or_default(),
        }
    }

    pub fn decimals(&self) -> u8 {
        self.decimals.get_or_default()
    }
}

impl MockMarket {
    fn auditor_ref(&self) -> AuditorContractRef {
        let auditor = self
            .auditor
            .get_or_revert_with(LendingError::MarketNotListed);
        AuditorContractRef::new(self.env(), auditor)
    }
}
