//! Cross-market solvency engine.
//!
//! The auditor keeps the registry of listed markets and the markets each
//! account has entered as collateral. Markets ask it for permission before
//! borrows, withdrawals and liquidations.
//!
//! Every check reads the price feed and the markets first and only then
//! touches local storage, so an external call can never observe or act on a
//! half-updated membership.

use odra::casper_types::U256;
use odra::prelude::*;
use odra::ContractRef;

use crate::error::LendingError;
use crate::market::MarketContractRef;
use crate::math::{Rate, MAX_DECIMALS};
use crate::oracle::PriceFeedContractRef;
use crate::risk::{self, Liquidity, Position, PricedMarket, Withdrawal};
use crate::state::{MarketInfo, MarketSet, MAX_LIQUIDATION_INCENTIVE, MIN_LIQUIDATION_INCENTIVE};

#[odra::module(
    events = [
        MarketListed,
        AdjustFactorSet,
        LiquidationIncentiveSet,
        OracleSet,
        MarketEntered,
        MarketExited
    ],
    errors = LendingError
)]
pub struct Auditor {
    /// Governance actor (multisig / timelock).
    admin: Var<Address>,
    oracle: Var<Address>,
    liquidation_incentive: Var<U256>,
    markets: Mapping<Address, MarketInfo>,
    market_list: List<Address>,
    account_markets: Mapping<Address, MarketSet>,
}

#[odra::module]
impl Auditor {
    // ===========================================================================
    // CONSTRUCTOR
    // ===========================================================================
    pub fn init(&mut self, admin: Address, oracle: Address, liquidation_incentive: U256) {
        Self::validate_incentive(liquidation_incentive).unwrap_or_revert(&self.env());
        self.admin.set(admin);
        self.oracle.set(oracle);
        self.liquidation_incentive.set(liquidation_incentive);
    }

    // ===========================================================================
    // GOVERNANCE
    // ===========================================================================

    /// Lists `market` with the given collateral weight. Decimals are read from
    /// the market once and never refreshed.
    pub fn enable_market(&mut self, market: Address, adjust_factor: U256) {
        self.assert_admin();
        if self.market_info(market).is_listed {
            self.env().revert(LendingError::MarketAlreadyListed);
        }
        let adjust_factor =
            Self::validate_adjust_factor(adjust_factor).unwrap_or_revert(&self.env());

        let decimals = MarketContractRef::new(self.env(), market).decimals();
        if decimals > MAX_DECIMALS {
            self.env().revert(LendingError::InvalidParameter);
        }
        self.markets.set(&market, MarketInfo::listed(adjust_factor, decimals));
        self.market_list.push(market);

        log::info!("listed market with adjust factor {}", adjust_factor);
        self.env().emit_event(MarketListed {
            market,
            adjust_factor: adjust_factor.to_scaled_val(),
            decimals,
        });
    }

    pub fn set_adjust_factor(&mut self, market: Address, adjust_factor: U256) {
        self.assert_admin();
        let mut info = self.listed_market(market).unwrap_or_revert(&self.env());
        let adjust_factor =
            Self::validate_adjust_factor(adjust_factor).unwrap_or_revert(&self.env());

        info.adjust_factor = adjust_factor.to_scaled_val();
        self.markets.set(&market, info);

        self.env().emit_event(AdjustFactorSet {
            market,
            adjust_factor: adjust_factor.to_scaled_val(),
        });
    }

    pub fn set_liquidation_incentive(&mut self, liquidation_incentive: U256) {
        self.assert_admin();
        Self::validate_incentive(liquidation_incentive).unwrap_or_revert(&self.env());
        self.liquidation_incentive.set(liquidation_incentive);
        self.env().emit_event(LiquidationIncentiveSet {
            liquidation_incentive,
        });
    }

    pub fn set_oracle(&mut self, oracle: Address) {
        self.assert_admin();
        self.oracle.set(oracle);
        self.env().emit_event(OracleSet { oracle });
    }

    // ===========================================================================
    // MEMBERSHIP
    // ===========================================================================

    /// Lets the caller's deposits in `market` count as collateral. Entering a
    /// market twice is a no-op.
    pub fn enter_market(&mut self, market: Address) {
        self.listed_market(market).unwrap_or_revert(&self.env());
        let account = self.env().caller();

        let mut entered = self.memberships(account);
        if !entered.insert(market) {
            return;
        }
        log::debug!("account entered market, {} markets", entered.len());
        self.account_markets.set(&account, entered);

        self.env().emit_event(MarketEntered { market, account });
    }

    /// Stops counting the caller's deposits in `market` as collateral.
    pub fn exit_market(&mut self, market: Address) {
        self.listed_market(market).unwrap_or_revert(&self.env());
        let account = self.env().caller();

        let mut entered = self.memberships(account);
        if !entered.contains(&market) {
            return;
        }

        let snapshot = MarketContractRef::new(self.env(), market).account_snapshot(account);
        if !snapshot.borrows.is_zero() {
            self.env().revert(LendingError::NonzeroBorrowBalance);
        }

        entered.remove(&market);
        let liquidity = self
            .liquidity_of(account, &entered, None)
            .unwrap_or_revert(&self.env());
        if liquidity.has_shortfall() {
            self.env().revert(LendingError::InsufficientAccountLiquidity);
        }

        self.account_markets.set(&account, entered);

        log::debug!("account exited market");
        self.env().emit_event(MarketExited { market, account });
    }

    // ===========================================================================
    // LIQUIDITY
    // ===========================================================================

    /// Returns `(collateral, debt)` of `account` across its entered markets,
    /// both in base currency scaled by WAD. `withdraw_amount` units of
    /// `market_to_simulate` are treated as already withdrawn.
    pub fn account_liquidity(
        &self,
        account: Address,
        market_to_simulate: Option<Address>,
        withdraw_amount: U256,
    ) -> (U256, U256) {
        let withdrawal = market_to_simulate.map(|market| (market, withdraw_amount));
        self.liquidity_of(account, &self.memberships(account), withdrawal)
            .unwrap_or_revert(&self.env())
            .into_raw()
    }

    /// Called by a market after it records new debt for `account`. Enters the
    /// market on the account's behalf and requires the account to stay
    /// solvent.
    pub fn check_borrow(&mut self, market: Address, account: Address) {
        let listed = self.market_info(market).is_listed;
        if !listed || self.env().caller() != market {
            self.env().revert(LendingError::NotMarket);
        }

        let mut entered = self.memberships(account);
        let newly_entered = entered.insert(market);

        let liquidity = self
            .liquidity_of(account, &entered, None)
            .unwrap_or_revert(&self.env());
        if liquidity.has_shortfall() {
            self.env().revert(LendingError::InsufficientAccountLiquidity);
        }

        if newly_entered {
            self.account_markets.set(&account, entered);
            self.env().emit_event(MarketEntered { market, account });
        }
    }

    /// Called by a market before `account` withdraws `amount`. Deposits in
    /// markets the account has not entered are free to leave.
    pub fn check_shortfall(&self, market: Address, account: Address, amount: U256) {
        self.listed_market(market).unwrap_or_revert(&self.env());
        let entered = self.memberships(account);
        if !entered.contains(&market) {
            return;
        }

        let liquidity = self
            .liquidity_of(account, &entered, Some((market, amount)))
            .unwrap_or_revert(&self.env());
        if liquidity.has_shortfall() {
            self.env().revert(LendingError::InsufficientAccountLiquidity);
        }
    }

    // ===========================================================================
    // LIQUIDATION
    // ===========================================================================

    /// Returns how much of `account`'s debt in `debt_market` may be repaid,
    /// at most `max_debt_to_cover`. Fails unless the account has a shortfall.
    pub fn check_liquidation(
        &self,
        collateral_market: Address,
        debt_market: Address,
        account: Address,
        max_debt_to_cover: U256,
    ) -> U256 {
        self.listed_market(collateral_market).unwrap_or_revert(&self.env());
        self.listed_market(debt_market).unwrap_or_revert(&self.env());

        let liquidity = self
            .liquidity_of(account, &self.memberships(account), None)
            .unwrap_or_revert(&self.env());
        if !liquidity.has_shortfall() {
            self.env().revert(LendingError::InsufficientShortfall);
        }

        let debt = MarketContractRef::new(self.env(), debt_market)
            .account_snapshot(account)
            .borrows;
        max_debt_to_cover.min(debt)
    }

    /// Shares of `collateral_market` owed to a liquidator repaying
    /// `actual_repay_amount` units of `debt_market`, capped at the account's
    /// deposit shares.
    pub fn calculate_seize(
        &self,
        collateral_market: Address,
        debt_market: Address,
        account: Address,
        actual_repay_amount: U256,
    ) -> U256 {
        self.seize_shares(collateral_market, debt_market, account, actual_repay_amount)
            .unwrap_or_revert(&self.env())
    }

    // ===========================================================================
    // READS
    // ===========================================================================

    /// Risk parameters of `market`; unknown markets report as unlisted.
    pub fn market_info(&self, market: Address) -> MarketInfo {
        self.markets
            .get(&market)
            .unwrap_or_else(MarketInfo::unlisted)
    }

    pub fn all_markets(&self) -> Vec<Address> {
        self.market_list.iter().collect()
    }

    /// Markets `account` has entered, in entry order.
    pub fn account_markets(&self, account: Address) -> Vec<Address> {
        self.memberships(account).to_vec()
    }

    pub fn is_member(&self, account: Address, market: Address) -> bool {
        self.memberships(account).contains(&market)
    }

    pub fn liquidation_incentive(&self) -> U256 {
        self.liquidation_incentive.get_or_default()
    }

    pub fn oracle(&self) -> Address {
        self.oracle.get_or_revert_with(LendingError::InvalidPrice)
    }

    pub fn admin(&self) -> Address {
        self.admin.get_or_revert_with(LendingError::Unauthorized)
    }
}

impl Auditor {
    fn assert_admin(&self) {
        if self.env().caller() != self.admin() {
            self.env().revert(LendingError::Unauthorized);
        }
    }

    fn memberships(&self, account: Address) -> MarketSet {
        self.account_markets.get(&account).unwrap_or_default()
    }

    fn incentive(&self) -> Rate {
        Rate::from_scaled_val(self.liquidation_incentive())
    }

    fn listed_market(&self, market: Address) -> Result<MarketInfo, LendingError> {
        match self.markets.get(&market) {
            Some(info) if info.is_listed => Ok(info),
            _ => Err(LendingError::MarketNotListed),
        }
    }

    /// Reads the current price of a listed market. Any price that is flagged
    /// invalid or is not strictly positive fails the whole computation.
    fn priced_market(&self, market: Address) -> Result<PricedMarket, LendingError> {
        let info = self.listed_market(market)?;
        let (price, valid) = PriceFeedContractRef::new(self.env(), self.oracle()).get_price(market);
        if !valid || price.is_zero() {
            return Err(LendingError::InvalidPrice);
        }
        Ok(PricedMarket {
            market,
            price,
            decimals: info.decimals,
            adjust_factor: info.adjust_factor(),
        })
    }

    /// Reads both prices and the collateral snapshot, then converts the
    /// seized value into collateral shares.
    fn seize_shares(
        &self,
        collateral_market: Address,
        debt_market: Address,
        account: Address,
        repay_amount: U256,
    ) -> Result<U256, LendingError> {
        let debt = self.priced_market(debt_market)?;
        let collateral = self.priced_market(collateral_market)?;
        let snapshot =
            MarketContractRef::new(self.env(), collateral_market).account_snapshot(account);

        let seize = risk::seize_amount(repay_amount, &debt, &collateral, self.incentive())?;
        let shares = risk::underlying_to_shares(seize, snapshot.exchange_rate)?;
        let deposit_shares = risk::underlying_to_shares(snapshot.deposits, snapshot.exchange_rate)?;
        Ok(shares.min(deposit_shares))
    }

    /// Snapshots every market in `entered`, then aggregates.
    fn liquidity_of(
        &self,
        account: Address,
        entered: &MarketSet,
        withdrawal: Option<(Address, U256)>,
    ) -> Result<Liquidity, LendingError> {
        let mut positions = Vec::with_capacity(entered.len());
        for market in entered.iter() {
            let priced = self.priced_market(*market)?;
            let snapshot = MarketContractRef::new(self.env(), *market).account_snapshot(account);
            positions.push(Position {
                priced,
                deposits: snapshot.deposits,
                borrows: snapshot.borrows,
            });
        }

        let withdrawal = match withdrawal {
            Some((market, amount)) => {
                let priced = match positions.iter().find(|p| p.priced.market == market) {
                    Some(position) => position.priced,
                    None => self.priced_market(market)?,
                };
                Some(Withdrawal { priced, amount })
            }
            None => None,
        };

        risk::aggregate(&positions, withdrawal)
    }

    fn validate_adjust_factor(adjust_factor: U256) -> Result<Rate, LendingError> {
        let rate = Rate::from_scaled_val(adjust_factor);
        if !rate.is_fraction() {
            return Err(LendingError::InvalidParameter);
        }
        Ok(rate)
    }

    fn validate_incentive(incentive: U256) -> Result<(), LendingError> {
        if incentive <= U256::from(MIN_LIQUIDATION_INCENTIVE)
            || incentive > U256::from(MAX_LIQUIDATION_INCENTIVE)
        {
            return Err(LendingError::InvalidParameter);
        }
        Ok(())
    }
}

#[odra::event]
pub struct MarketListed {
    pub market: Address,
    pub adjust_factor: U256,
    pub decimals: u8,
}

#[odra::event]
pub struct AdjustFactorSet {
    pub market: Address,
    pub adjust_factor: U256,
}

#[odra::event]
pub struct LiquidationIncentiveSet {
    pub liquidation_incentive: U256,
}

#[odra::event]
pub struct OracleSet {
    pub oracle: Address,
}

#[odra::event]
pub struct MarketEntered {
    pub market: Address,
    pub account: Address,
}

#[odra::event]
pub struct MarketExited {
    pub market: Address,
    pub account: Address,
}
