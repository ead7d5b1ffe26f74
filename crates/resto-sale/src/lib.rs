//! resto-sale
//!
//! The RESTO crowdsale state machine. One sale event distributes one token:
//! contributions during the sale window earn a time-tiered bonus, fixed
//! percentages of supply sit in named allocation buckets (one of them held
//! for a year past sale end), and a two-step owner plus a delegated manager
//! gate distribution, with a pause switch over the sale-pool path.
//!
//! Allocation of the 1,100,000,000-RESTO supply at construction:
//!
//! 1. Team A     —    4.5%  =  49,500,000 RESTO
//! 2. Team B     —   13.5%  = 148,500,000 RESTO  (held until sale end + 1 year)
//! 3. Marketing  —   18%    = 198,000,000 RESTO
//! 4. Retailers  —    9%    =  99,000,000 RESTO
//! 5. Reserve    —    8%    =  88,000,000 RESTO
//! 6. Bounty     —    1%    =  11,000,000 RESTO
//! 7. Sale pool  —   46%    = 506,000,000 RESTO  (the exact remainder)
//!
//! Time is an explicit `now` argument on every time-sensitive operation;
//! the crate never reads a clock, so whole sale timelines replay
//! deterministically in tests.

pub mod allocation;
pub mod controller;
pub mod params;
pub mod roles;
pub mod schedule;

pub use allocation::{AllocationRegistry, Bucket, BucketEntry};
pub use controller::Crowdsale;
pub use params::SaleParams;
pub use roles::{PauseGate, RoleState};
pub use schedule::{tokens_for_contribution, BonusSchedule, BonusTier, SaleWindow};
