//! Scaled-balance accounting token for pooled deposits.
//!
//! Holders own shares of the pool. The reported balance of a holder is its
//! share of the reported total supply, so accruing earnings to the pool raises
//! every balance in proportion without touching per-holder storage.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::error::LendingError;
use crate::math::{mul_div_down, mul_div_up};
use crate::state::is_zero_address;

/// Pooled-deposit token whose balances appreciate as earnings accrue.
#[odra::module(events = [Transfer, Approval, EarningsAccrued], errors = LendingError)]
pub struct ScaledLedger {
    name: Var<String>,
    symbol: Var<String>,
    decimals: Var<u8>,
    /// Only address allowed to mint and accrue, fixed at deployment.
    market: Var<Address>,
    total_supply: Var<U256>,
    total_shares: Var<U256>,
    shares: Mapping<Address, U256>,
    allowances: Mapping<(Address, Address), U256>,
}

#[odra::module]
impl ScaledLedger {
    /// Initializes the token. `market` becomes the only minter.
    pub fn init(&mut self, name: String, symbol: String, decimals: u8, market: Address) {
        self.name.set(name);
        self.symbol.set(symbol);
        self.decimals.set(decimals);
        self.market.set(market);
        self.total_supply.set(U256::zero());
        self.total_shares.set(U256::zero());
    }

    /// Credits `amount` to `to` at the current index.
    pub fn mint(&mut self, to: Address, amount: U256) {
        self.assert_market();
        if is_zero_address(&to) {
            self.env().revert(LendingError::InvalidRecipient);
        }
        if amount.is_zero() {
            self.env().revert(LendingError::InvalidAmount);
        }

        let shares = self.shares_for_mint(amount).unwrap_or_revert(&self.env());
        let total_supply = self
            .total_supply()
            .checked_add(amount)
            .unwrap_or_revert_with(&self.env(), LendingError::MathOverflow);
        let total_shares = self
            .total_shares()
            .checked_add(shares)
            .unwrap_or_revert_with(&self.env(), LendingError::MathOverflow);
        let holder_shares = self.shares_of(to) + shares;

        self.shares.set(&to, holder_shares);
        self.total_shares.set(total_shares);
        self.total_supply.set(total_supply);

        log::debug!("minted {} ({} shares)", amount, shares);
        self.env().emit_event(Transfer {
            from: None,
            to: Some(to),
            amount,
        });
    }

    /// Distributes `amount` among all holders in proportion to their shares.
    pub fn accrue_earnings(&mut self, amount: U256) {
        self.assert_market();
        if self.total_shares().is_zero() {
            self.env().revert(LendingError::NoHolders);
        }

        let total_supply = self
            .total_supply()
            .checked_add(amount)
            .unwrap_or_revert_with(&self.env(), LendingError::MathOverflow);
        self.total_supply.set(total_supply);

        log::info!("accrued {} earnings, total supply {}", amount, total_supply);
        self.env().emit_event(EarningsAccrued {
            amount,
            total_supply,
        });
    }

    /// Moves `amount` from the caller to `to`.
    pub fn transfer(&mut self, to: Address, amount: U256) {
        let caller = self.env().caller();
        self.raw_transfer(caller, to, amount);
    }

    /// Moves `amount` from `from` to `to` using the caller's allowance.
    pub fn transfer_from(&mut self, from: Address, to: Address, amount: U256) {
        let spender = self.env().caller();
        if is_zero_address(&to) {
            self.env().revert(LendingError::ZeroAddressTransfer);
        }
        self.spend_allowance(from, spender, amount);
        self.raw_transfer(from, to, amount);
    }

    /// Sets the caller's allowance for `spender`.
    pub fn approve(&mut self, spender: Address, amount: U256) {
        let owner = self.env().caller();
        self.set_allowance(owner, spender, amount);
    }

    /// Raises the caller's allowance for `spender` by `delta`.
    pub fn increase_allowance(&mut self, spender: Address, delta: U256) {
        let owner = self.env().caller();
        let amount = self
            .allowance(owner, spender)
            .checked_add(delta)
            .unwrap_or_revert_with(&self.env(), LendingError::MathOverflow);
        self.set_allowance(owner, spender, amount);
    }

    /// Lowers the caller's allowance for `spender` by `delta`.
    pub fn decrease_allowance(&mut self, spender: Address, delta: U256) {
        let owner = self.env().caller();
        let amount = self
            .allowance(owner, spender)
            .checked_sub(delta)
            .unwrap_or_revert_with(&self.env(), LendingError::InsufficientAllowance);
        self.set_allowance(owner, spender, amount);
    }

    /// Reported balance of `holder`, earnings included.
    pub fn balance_of(&self, holder: Address) -> U256 {
        self.shares_to_amount(self.shares_of(holder)).unwrap_or_revert(&self.env())
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply.get_or_default()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get_or_default(&(owner, spender))
    }

    /// Raw shares held by `holder`.
    pub fn shares_of(&self, holder: Address) -> U256 {
        self.shares.get_or_default(&holder)
    }

    pub fn total_shares(&self) -> U256 {
        self.total_shares.get_or_default()
    }

    pub fn name(&self) -> String {
        self.name.get_or_default()
    }

    pub fn symbol(&self) -> String {
        self.symbol.get_or_default()
    }

    pub fn decimals(&self) -> u8 {
        self.decimals.get_or_default()
    }

    /// The market allowed to mint and accrue.
    pub fn market(&self) -> Address {
        self.market.get_or_revert_with(LendingError::Unauthorized)
    }
}

impl ScaledLedger {
    fn assert_market(&self) {
        if self.env().caller() != self.market() {
            self.env().revert(LendingError::Unauthorized);
        }
    }

    fn raw_transfer(&mut self, from: Address, to: Address, amount: U256) {
        if is_zero_address(&to) {
            self.env().revert(LendingError::ZeroAddressTransfer);
        }
        let balance = self.balance_of(from);
        if amount > balance {
            self.env().revert(LendingError::InsufficientBalance);
        }

        let from_shares = self.shares_of(from);
        let shares = if amount == balance {
            from_shares
        } else {
            // rounding up never exceeds the sender's shares when amount < balance
            self.amount_to_shares_up(amount)
                .unwrap_or_revert(&self.env())
                .min(from_shares)
        };

        self.shares.set(&from, from_shares - shares);
        let to_shares = self.shares_of(to) + shares;
        self.shares.set(&to, to_shares);

        self.env().emit_event(Transfer {
            from: Some(from),
            to: Some(to),
            amount,
        });
    }

    fn spend_allowance(&mut self, owner: Address, spender: Address, amount: U256) {
        let allowance = self.allowance(owner, spender);
        if allowance == U256::max_value() {
            return;
        }
        if amount > allowance {
            self.env().revert(LendingError::InsufficientAllowance);
        }
        self.allowances.set(&(owner, spender), allowance - amount);
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.set(&(owner, spender), amount);
        self.env().emit_event(Approval {
            owner,
            spender,
            amount,
        });
    }

    /// Shares minted for `amount`, rounded down so existing holders keep
    /// their claim. An amount worth less than one share is rejected.
    fn shares_for_mint(&self, amount: U256) -> Result<U256, LendingError> {
        let total_shares = self.total_shares();
        let total_supply = self.total_supply();
        if total_shares.is_zero() || total_supply.is_zero() {
            return Ok(amount);
        }
        let shares = mul_div_down(amount, total_shares, total_supply)?;
        if shares.is_zero() {
            return Err(LendingError::InvalidAmount);
        }
        Ok(shares)
    }

    fn amount_to_shares_up(&self, amount: U256) -> Result<U256, LendingError> {
        mul_div_up(amount, self.total_shares(), self.total_supply())
    }

    fn shares_to_amount(&self, shares: U256) -> Result<U256, LendingError> {
        let total_shares = self.total_shares();
        if total_shares.is_zero() {
            return Ok(U256::zero());
        }
        mul_div_down(shares, self.total_supply(), total_shares)
    }
}

/// Emitted on mint (`from` is `None`) and on every transfer.
#[odra::event]
pub struct Transfer {
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub amount: U256,
}

#[odra::event]
pub struct Approval {
    pub owner: Address,
    pub spender: Address,
    pub amount: U256,
}

#[odra::event]
pub struct EarningsAccrued {
    pub amount: U256,
    pub total_supply: U256,
}
