//! Liquidity aggregation and liquidation math.
//!
//! Everything here works on values already read from the price feed and the
//! markets, so a computation either sees one consistent snapshot or fails.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::error::LendingError;
use crate::math::{mul_div_down, Decimal, Rate, TryAdd, TryMul, WAD};

/// Price and risk parameters of one market, as read for a single computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PricedMarket {
    pub market: Address,
    pub price: U256,
    pub decimals: u8,
    pub adjust_factor: Rate,
}

impl PricedMarket {
    /// Value of `amount` underlying units, rounded down.
    pub fn value_of(&self, amount: U256) -> Result<Decimal, LendingError> {
        Decimal::from_amount(amount, self.price, self.decimals)
    }

    /// Value of `amount` underlying units, rounded up.
    pub fn value_of_up(&self, amount: U256) -> Result<Decimal, LendingError> {
        Decimal::from_amount_up(amount, self.price, self.decimals)
    }
}

/// Balances of an account in one market together with the market's pricing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub priced: PricedMarket,
    pub deposits: U256,
    pub borrows: U256,
}

/// A withdrawal to simulate on top of the current positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Withdrawal {
    pub priced: PricedMarket,
    pub amount: U256,
}

/// Weighted collateral against debt, both in base currency scaled by WAD.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Liquidity {
    pub collateral: Decimal,
    pub debt: Decimal,
}

impl Liquidity {
    pub fn has_shortfall(&self) -> bool {
        self.debt > self.collateral
    }

    pub fn into_raw(self) -> (U256, U256) {
        (self.collateral.to_scaled_val(), self.debt.to_scaled_val())
    }
}

/// Sums weighted collateral and debt over `positions`.
///
/// Collateral is rounded down and debt rounded up. A simulated withdrawal is
/// charged to the debt side at its collateral weight.
pub fn aggregate(
    positions: &[Position],
    withdrawal: Option<Withdrawal>,
) -> Result<Liquidity, LendingError> {
    let mut liquidity = Liquidity::default();

    for position in positions {
        let priced = &position.priced;
        let collateral = priced
            .value_of(position.deposits)?
            .try_mul(priced.adjust_factor)?;
        liquidity.collateral = liquidity.collateral.try_add(collateral)?;
        liquidity.debt = liquidity.debt.try_add(priced.value_of_up(position.borrows)?)?;
    }

    if let Some(withdrawal) = withdrawal {
        let charge = withdrawal
            .priced
            .value_of_up(withdrawal.amount)?
            .try_mul_up(withdrawal.priced.adjust_factor)?;
        liquidity.debt = liquidity.debt.try_add(charge)?;
    }

    Ok(liquidity)
}

/// Collateral units paid to a liquidator repaying `repay_amount` of debt.
///
/// Every step rounds down, so the seized value at the collateral price never
/// exceeds the repaid value times `incentive`.
pub fn seize_amount(
    repay_amount: U256,
    debt: &PricedMarket,
    collateral: &PricedMarket,
    incentive: Rate,
) -> Result<U256, LendingError> {
    debt.value_of(repay_amount)?
        .try_mul(incentive)?
        .to_amount(collateral.price, collateral.decimals)
}

/// Market shares worth `amount` underlying units at `exchange_rate`
/// (underlying per share, scaled by WAD), rounded down.
pub fn underlying_to_shares(amount: U256, exchange_rate: U256) -> Result<U256, LendingError> {
    mul_div_down(amount, U256::from(WAD), exchange_rate)
}

#[cfg(test)]
mod test {
    use super::*;
    use odra::casper_types::account::AccountHash;

    fn units(amount: u64) -> U256 {
        U256::from(amount) * U256::from(WAD)
    }

    fn priced(byte: u8, price: u64, decimals: u8, adjust_percent: u8) -> PricedMarket {
        PricedMarket {
            market: Address::Account(AccountHash::new([byte; 32])),
            price: units(price),
            decimals,
            adjust_factor: Rate::from_percent(adjust_percent),
        }
    }

    #[test]
    fn weighted_collateral_without_debt() {
        let dai = priced(1, 1, 18, 95);
        let liquidity = aggregate(
            &[Position {
                priced: dai,
                deposits: units(100),
                borrows: U256::zero(),
            }],
            None,
        )
        .unwrap();

        assert_eq!(liquidity.collateral, Decimal::from(95u64));
        assert_eq!(liquidity.debt, Decimal::zero());
        assert!(!liquidity.has_shortfall());
    }

    #[test]
    fn mixed_decimals_and_prices() {
        let usdc = priced(1, 1, 6, 90);
        let weth = priced(2, 1000, 18, 80);
        let liquidity = aggregate(
            &[
                Position {
                    priced: usdc,
                    deposits: U256::from(500_000_000u64),
                    borrows: U256::zero(),
                },
                Position {
                    priced: weth,
                    deposits: units(1),
                    borrows: units(1) / U256::from(2u64),
                },
            ],
            None,
        )
        .unwrap();

        assert_eq!(liquidity.collateral, Decimal::from(1250u64));
        assert_eq!(liquidity.debt, Decimal::from(500u64));
    }

    #[test]
    fn withdrawal_is_charged_at_collateral_weight() {
        let weth = priced(2, 1000, 18, 80);
        let position = Position {
            priced: weth,
            deposits: units(1),
            borrows: U256::zero(),
        };
        let liquidity = aggregate(
            &[position],
            Some(Withdrawal {
                priced: weth,
                amount: units(1),
            }),
        )
        .unwrap();

        assert_eq!(liquidity.collateral, liquidity.debt);
        assert!(!liquidity.has_shortfall());
    }

    #[test]
    fn debt_rounds_up() {
        let odd = priced(3, 1, 18, 100);
        let liquidity = aggregate(
            &[Position {
                priced: PricedMarket {
                    price: U256::from(3u64),
                    ..odd
                },
                deposits: U256::zero(),
                borrows: U256::one(),
            }],
            None,
        )
        .unwrap();
        assert_eq!(liquidity.debt.to_scaled_val(), U256::one());
        assert!(liquidity.has_shortfall());
    }

    #[test]
    fn seize_applies_incentive_across_prices() {
        let dai = priced(1, 1, 18, 95);
        let weth = priced(2, 800, 18, 80);
        let seized = seize_amount(units(100), &dai, &weth, Rate::from_percent(110)).unwrap();
        assert_eq!(seized, U256::from(137_500_000_000_000_000u64));
    }

    #[test]
    fn seized_value_never_exceeds_repaid_value_with_incentive() {
        let incentive = Rate::from_percent(110);
        let prices = [1u64, 3, 7, 999, 1000, 31_337];
        let decimals = [0u8, 6, 8, 18];
        let repays = [1u64, 17, 1_000_003, 123_456_789_012];

        for &debt_price in &prices {
            for &collateral_price in &prices {
                for &debt_decimals in &decimals {
                    for &collateral_decimals in &decimals {
                        let debt = priced(1, debt_price, debt_decimals, 90);
                        let collateral = priced(2, collateral_price, collateral_decimals, 90);
                        for &repay in &repays {
                            let repay = U256::from(repay);
                            let seized =
                                seize_amount(repay, &debt, &collateral, incentive).unwrap();
                            let seized_value = collateral.value_of(seized).unwrap();
                            let allowed = debt.value_of(repay).unwrap().try_mul(incentive).unwrap();
                            assert!(seized_value <= allowed);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn zero_collateral_price_is_a_math_error() {
        let dai = priced(1, 1, 18, 95);
        let broken = PricedMarket {
            price: U256::zero(),
            ..priced(2, 1, 18, 80)
        };
        assert_eq!(
            seize_amount(units(1), &dai, &broken, Rate::from_percent(110)),
            Err(LendingError::MathOverflow)
        );
    }

    #[test]
    fn shares_follow_the_exchange_rate() {
        assert_eq!(underlying_to_shares(units(3), units(1)), Ok(units(3)));
        assert_eq!(underlying_to_shares(units(3), units(2)), Ok(units(3) / U256::from(2u64)));
        assert_eq!(underlying_to_shares(U256::from(3u64), units(2)), Ok(U256::one()));
        assert_eq!(
            underlying_to_shares(units(1), U256::zero()),
            Err(LendingError::MathOverflow)
        );
    }
}
