//! Price feed boundary consumed by the auditor.
//!
//! Prices are quoted in the base currency scaled by WAD. A price is usable
//! only when the feed flags it valid and it is strictly positive.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::error::LendingError;

/// Interface of a price feed contract.
#[odra::external_contract]
pub trait PriceFeed {
    /// Latest price of `asset` and whether the feed considers it valid.
    fn get_price(&self, asset: Address) -> (U256, bool);
}

/// Admin-driven price feed for tests and local deployments.
#[odra::module(events = [PriceUpdated, PublisherAdded, PublisherRemoved], errors = LendingError)]
pub struct MockPriceFeed {
    prices: Mapping<Address, U256>,
    approved_publishers: Mapping<Address, bool>,
    admin: Var<Address>,
}

#[odra::module]
impl MockPriceFeed {
    pub fn init(&mut self, admin: Address) {
        self.admin.set(admin);
    }

    /// Publishes `price` for `asset`. Zero is accepted so feeds can be broken
    /// on purpose.
    pub fn set_price(&mut self, asset: Address, price: U256) {
        let caller = self.env().caller();
        if self.admin() != caller && !self.is_approved_publisher(caller) {
            self.env().revert(LendingError::Unauthorized);
        }

        self.prices.set(&asset, price);
        self.env().emit_event(PriceUpdated {
            asset,
            price,
            publisher: caller,
        });
    }

    pub fn add_publisher(&mut self, publisher: Address) {
        self.assert_admin();
        self.approved_publishers.set(&publisher, true);
        self.env().emit_event(PublisherAdded { publisher });
    }

    pub fn remove_publisher(&mut self, publisher: Address) {
        self.assert_admin();
        self.approved_publishers.set(&publisher, false);
        self.env().emit_event(PublisherRemoved { publisher });
    }

    pub fn is_approved_publisher(&self, address: Address) -> bool {
        self.approved_publishers.get(&address).unwrap_or(false)
    }

    pub fn admin(&self) -> Address {
        self.admin.get_or_revert_with(LendingError::Unauthorized)
    }

    /// Unset assets report `(0, false)`.
    pub fn get_price(&self, asset: Address) -> (U256, bool) {
        match self.prices.get(&asset) {
            Some(price) => (price, !price.is_zero()),
            None => (U256::zero(), false),
        }
    }
}

impl MockPriceFeed {
    fn assert_admin(&self) {
        if self.env().caller() != self.admin() {
            self.env().revert(LendingError::Unauthorized);
        }
    }
}

#[odra::event]
pub struct PriceUpdated {
    pub asset: Address,
    pub price: U256,
    pub publisher: Address,
}

#[odra::event]
pub struct PublisherAdded {
    pub publisher: Address,
}

#[odra::event]
pub struct PublisherRemoved {
    pub publisher: Address,
}
