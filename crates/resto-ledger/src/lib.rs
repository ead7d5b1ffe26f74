//! resto-ledger
//!
//! The RESTO fungible-token ledger: per-address balances and allowances for
//! one asset. The full supply is minted exactly once, inside
//! [`TokenLedger::new`]; every later operation only moves value, so the sum
//! of all balances equals the minted supply at every point in time.
//!
//! The crowdsale controller drives the ledger through [`TokenLedger::debit`]
//! and [`TokenLedger::credit`] (always as a pair); token holders use the
//! generic `transfer` / `approve` / `transfer_from` surface directly.

pub mod ledger;

pub use ledger::TokenLedger;
