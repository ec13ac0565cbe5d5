use odra::prelude::*;

/// Ordered set of markets an account has entered.
///
/// Markets keep their insertion order so liquidity is always aggregated in the
/// same sequence.
#[odra::odra_type]
#[derive(Default)]
pub struct MarketSet {
    markets: Vec<Address>,
}

impl MarketSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, market: &Address) -> bool {
        self.markets.contains(market)
    }

    /// Adds `market`, returns `false` if it was already present.
    pub fn insert(&mut self, market: Address) -> bool {
        if self.contains(&market) {
            return false;
        }
        self.markets.push(market);
        true
    }

    /// Removes `market`, returns `false` if it was not present.
    pub fn remove(&mut self, market: &Address) -> bool {
        match self.markets.iter().position(|m| m == market) {
            Some(index) => {
                self.markets.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.markets.iter()
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Address> {
        self.markets.clone()
    }
}
