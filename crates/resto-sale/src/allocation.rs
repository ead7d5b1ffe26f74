//! Allocation buckets.
//!
//! Fixed entitlements of total supply, computed once at construction. Each
//! bucket is a real ledger account; the registry tracks how much of the
//! entitlement remains withdrawable and which bucket is still under its
//! hold. The sale pool receives the exact remainder after the six reserved
//! buckets, so the seven allocations sum to total supply with no rounding
//! leakage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use resto_core::constants::{
    BOUNTY_BPS, BPS_DENOMINATOR, MARKETING_BPS, RESERVE_BPS, RETAILERS_BPS, TEAM_A_BPS,
    TEAM_B_BPS,
};
use resto_core::error::RestoError;
use resto_core::types::{Address, Balance, Timestamp};

// ── Bucket ───────────────────────────────────────────────────────────────────

/// The seven fixed allocations of total supply.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Bucket {
    TeamA,
    TeamB,
    Marketing,
    Retailers,
    Reserve,
    Bounty,
    /// The share the sale itself retains for distribution to contributors.
    SalePool,
}

impl Bucket {
    pub const ALL: [Bucket; 7] = [
        Bucket::TeamA,
        Bucket::TeamB,
        Bucket::Marketing,
        Bucket::Retailers,
        Bucket::Reserve,
        Bucket::Bounty,
        Bucket::SalePool,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Bucket::TeamA => "team_a",
            Bucket::TeamB => "team_b",
            Bucket::Marketing => "marketing",
            Bucket::Retailers => "retailers",
            Bucket::Reserve => "reserve",
            Bucket::Bounty => "bounty",
            Bucket::SalePool => "sale_pool",
        }
    }

    /// Basis points of total supply, for the six reserved buckets.
    /// The sale pool has no fixed share: it takes the remainder.
    fn basis_points(&self) -> Option<Balance> {
        match self {
            Bucket::TeamA => Some(TEAM_A_BPS),
            Bucket::TeamB => Some(TEAM_B_BPS),
            Bucket::Marketing => Some(MARKETING_BPS),
            Bucket::Retailers => Some(RETAILERS_BPS),
            Bucket::Reserve => Some(RESERVE_BPS),
            Bucket::Bounty => Some(BOUNTY_BPS),
            Bucket::SalePool => None,
        }
    }
}

// ── BucketEntry ──────────────────────────────────────────────────────────────

/// One bucket's bookkeeping record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BucketEntry {
    /// The external account holding this allocation.
    pub address: Address,
    /// Entitlement still withdrawable through the controller.
    pub remaining: Balance,
    /// Debits rejected while `now` is before this instant.
    pub locked_until: Option<Timestamp>,
}

// ── AllocationRegistry ───────────────────────────────────────────────────────

/// The fixed table of allocation buckets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AllocationRegistry {
    entries: BTreeMap<Bucket, BucketEntry>,
}

impl AllocationRegistry {
    /// Build the registry from the per-bucket addresses, splitting
    /// `total_supply` by the fixed basis points; the sale pool gets the
    /// exact remainder. Team B is created under `team_b_locked_until`;
    /// every other bucket is unlocked from inception.
    pub fn new(
        addresses: &BTreeMap<Bucket, Address>,
        total_supply: Balance,
        team_b_locked_until: Timestamp,
    ) -> Self {
        let mut entries = BTreeMap::new();
        let mut reserved: Balance = 0;

        for bucket in Bucket::ALL {
            let address = addresses[&bucket];
            let (remaining, locked_until) = match bucket.basis_points() {
                Some(bps) => {
                    let share = total_supply * bps / BPS_DENOMINATOR;
                    reserved += share;
                    let lock = (bucket == Bucket::TeamB).then_some(team_b_locked_until);
                    (share, lock)
                }
                None => (total_supply - reserved, None),
            };
            info!(
                bucket = bucket.name(),
                address = %address,
                remaining,
                locked_until,
                "allocation bucket created"
            );
            entries.insert(
                bucket,
                BucketEntry {
                    address,
                    remaining,
                    locked_until,
                },
            );
        }

        let registry = Self { entries };
        debug_assert_eq!(
            registry.total_remaining(),
            total_supply,
            "allocations must sum exactly to total supply"
        );
        registry
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn entry(&self, bucket: Bucket) -> &BucketEntry {
        self.entries
            .get(&bucket)
            .expect("registry holds every bucket")
    }

    pub fn remaining(&self, bucket: Bucket) -> Balance {
        self.entry(bucket).remaining
    }

    pub fn address(&self, bucket: Bucket) -> Address {
        self.entry(bucket).address
    }

    pub fn locked_until(&self, bucket: Bucket) -> Option<Timestamp> {
        self.entry(bucket).locked_until
    }

    /// Sum of all remaining entitlements.
    pub fn total_remaining(&self) -> Balance {
        self.entries.values().map(|e| e.remaining).sum()
    }

    /// The initial ledger distribution: every bucket's address with its
    /// full entitlement. Valid only at construction, before any debit.
    pub fn initial_balances(&self) -> Vec<(Address, Balance)> {
        self.entries
            .values()
            .map(|e| (e.address, e.remaining))
            .collect()
    }

    // ── Two-phase debit ──────────────────────────────────────────────────────
    //
    // The controller validates with `ensure_can_debit`, performs the ledger
    // move, and only then applies `record_debit`, so a failure at any
    // fallible step leaves the registry untouched.

    /// Check that `amount` can leave `bucket` at `now`.
    pub fn ensure_can_debit(
        &self,
        bucket: Bucket,
        amount: Balance,
        now: Timestamp,
    ) -> Result<(), RestoError> {
        let entry = self.entry(bucket);
        if let Some(unlocks_at) = entry.locked_until {
            if now < unlocks_at {
                return Err(RestoError::BucketLocked { unlocks_at });
            }
        }
        if entry.remaining < amount {
            return Err(RestoError::InsufficientBucketBalance {
                need: amount,
                have: entry.remaining,
            });
        }
        Ok(())
    }

    /// Apply an already-validated debit.
    pub fn record_debit(&mut self, bucket: Bucket, amount: Balance) {
        let entry = self
            .entries
            .get_mut(&bucket)
            .expect("registry holds every bucket");
        debug_assert!(entry.remaining >= amount, "debit validated before commit");
        entry.remaining -= amount;
        info!(
            bucket = bucket.name(),
            amount,
            remaining = entry.remaining,
            "bucket debited"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resto_core::constants::{TOTAL_SUPPLY_UNITS, UNITS_PER_TOKEN};

    const SALE_END: Timestamp = 1_544_745_600; // 2018-12-14 00:00:00 UTC
    const LOCKED_UNTIL: Timestamp = SALE_END + 365 * 86_400;

    fn addresses() -> BTreeMap<Bucket, Address> {
        Bucket::ALL
            .iter()
            .map(|b| (*b, Address::from_seed(b.name())))
            .collect()
    }

    fn registry() -> AllocationRegistry {
        AllocationRegistry::new(&addresses(), TOTAL_SUPPLY_UNITS, LOCKED_UNTIL)
    }

    #[test]
    fn fixture_allocations_are_exact() {
        let r = registry();
        let tokens = |n: u128| n * UNITS_PER_TOKEN;
        assert_eq!(r.remaining(Bucket::TeamA), tokens(49_500_000));
        assert_eq!(r.remaining(Bucket::TeamB), tokens(148_500_000));
        assert_eq!(r.remaining(Bucket::Marketing), tokens(198_000_000));
        assert_eq!(r.remaining(Bucket::Retailers), tokens(99_000_000));
        assert_eq!(r.remaining(Bucket::Reserve), tokens(88_000_000));
        assert_eq!(r.remaining(Bucket::Bounty), tokens(11_000_000));
        assert_eq!(r.remaining(Bucket::SalePool), tokens(506_000_000));
    }

    #[test]
    fn allocations_sum_to_total_supply() {
        assert_eq!(registry().total_remaining(), TOTAL_SUPPLY_UNITS);
    }

    #[test]
    fn only_team_b_is_locked() {
        let r = registry();
        for bucket in Bucket::ALL {
            let expected = (bucket == Bucket::TeamB).then_some(LOCKED_UNTIL);
            assert_eq!(r.locked_until(bucket), expected, "{} lock", bucket.name());
        }
    }

    #[test]
    fn locked_bucket_rejects_debit_until_the_exact_unlock_instant() {
        let mut r = registry();
        let err = r
            .ensure_can_debit(Bucket::TeamB, 1, LOCKED_UNTIL - 1)
            .unwrap_err();
        assert!(matches!(err, RestoError::BucketLocked { unlocks_at } if unlocks_at == LOCKED_UNTIL));

        r.ensure_can_debit(Bucket::TeamB, 1, LOCKED_UNTIL).unwrap();
        r.record_debit(Bucket::TeamB, 1);
        assert_eq!(r.remaining(Bucket::TeamB), 148_500_000 * UNITS_PER_TOKEN - 1);
    }

    #[test]
    fn debit_rejects_more_than_remaining() {
        let r = registry();
        let have = r.remaining(Bucket::Bounty);
        let err = r.ensure_can_debit(Bucket::Bounty, have + 1, 0).unwrap_err();
        assert!(matches!(
            err,
            RestoError::InsufficientBucketBalance { need, have: h } if need == have + 1 && h == have
        ));
    }

    #[test]
    fn debit_to_zero_keeps_the_bucket() {
        let mut r = registry();
        let all = r.remaining(Bucket::Bounty);
        r.ensure_can_debit(Bucket::Bounty, all, 0).unwrap();
        r.record_debit(Bucket::Bounty, all);
        assert_eq!(r.remaining(Bucket::Bounty), 0);
        // The entry survives at zero; a further debit is refused, not a panic.
        assert!(r.ensure_can_debit(Bucket::Bounty, 1, 0).is_err());
    }

    #[test]
    fn initial_balances_cover_all_buckets() {
        let r = registry();
        let initial = r.initial_balances();
        assert_eq!(initial.len(), 7);
        let total: Balance = initial.iter().map(|(_, b)| b).sum();
        assert_eq!(total, TOTAL_SUPPLY_UNITS);
    }
}
