#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), no_main)]
#![allow(clippy::arithmetic_side_effects)]

//! Accounting and risk core of a multi-asset lending protocol for the casper
//! blockchain.
//!
//! - [`ledger::ScaledLedger`]: pooled-deposit token whose balances appreciate
//!   as earnings accrue.
//! - [`auditor::Auditor`]: market membership, account liquidity and
//!   liquidation checks across every listed market.

extern crate alloc;

pub mod auditor;
pub mod error;
pub mod ledger;
pub mod market;
pub mod math;
pub mod oracle;
pub mod risk;
pub mod state;
