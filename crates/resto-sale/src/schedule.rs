//! Sale window and time-tiered bonus schedule.
//!
//! The bonus ladder is an ordered lookup table: each tier applies from its
//! offset (measured from sale start) up to the next tier's offset. Tier
//! boundaries are half-open, so a contribution at the exact boundary instant
//! lands in the newer, lower tier. Pure lookups over an explicit `now`; no
//! clock access.

use serde::{Deserialize, Serialize};

use resto_core::constants::BONUS_TIERS;
use resto_core::error::RestoError;
use resto_core::types::{Balance, Timestamp};

// ── SaleWindow ───────────────────────────────────────────────────────────────

/// The sale's lifecycle boundaries. Immutable after construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleWindow {
    /// First instant at which contributions are accepted.
    pub start: Timestamp,
    /// First instant at which contributions are rejected again.
    pub end: Timestamp,
}

// ── BonusTier ────────────────────────────────────────────────────────────────

/// One rung of the bonus ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusTier {
    /// Seconds after sale start at which this tier takes effect.
    pub offset_secs: i64,
    /// Bonus applied on top of the base rate, in percent.
    pub bonus_percent: u64,
}

// ── BonusSchedule ────────────────────────────────────────────────────────────

/// The sale window plus its ordered bonus tiers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BonusSchedule {
    window: SaleWindow,
    tiers: Vec<BonusTier>,
}

impl BonusSchedule {
    /// Build a schedule from a window and tier table.
    ///
    /// # Panics
    /// Panics if the table is empty, does not start at offset 0, or its
    /// offsets are not strictly increasing — a construction-time
    /// configuration error, not a runtime condition.
    pub fn new(window: SaleWindow, tiers: Vec<BonusTier>) -> Self {
        assert!(!tiers.is_empty(), "bonus table must not be empty");
        assert_eq!(tiers[0].offset_secs, 0, "first tier must start at sale open");
        for pair in tiers.windows(2) {
            assert!(
                pair[0].offset_secs < pair[1].offset_secs,
                "tier offsets must strictly increase"
            );
        }
        Self { window, tiers }
    }

    /// The production schedule: `start`-anchored window of
    /// [`resto_core::constants::SALE_DURATION_SECS`] with the
    /// [`BONUS_TIERS`] ladder.
    pub fn standard(start: Timestamp) -> Self {
        let window = SaleWindow {
            start,
            end: start + resto_core::constants::SALE_DURATION_SECS,
        };
        let tiers = BONUS_TIERS
            .iter()
            .map(|&(offset_secs, bonus_percent)| BonusTier {
                offset_secs,
                bonus_percent,
            })
            .collect();
        Self::new(window, tiers)
    }

    pub fn window(&self) -> SaleWindow {
        self.window
    }

    pub fn is_open(&self, now: Timestamp) -> bool {
        now >= self.window.start && now < self.window.end
    }

    pub fn has_ended(&self, now: Timestamp) -> bool {
        now >= self.window.end
    }

    /// The bonus percent in effect at `now`, or the lifecycle rejection.
    pub fn bonus_percent_at(&self, now: Timestamp) -> Result<u64, RestoError> {
        if now < self.window.start {
            return Err(RestoError::SaleNotStarted {
                starts_at: self.window.start,
            });
        }
        if now >= self.window.end {
            return Err(RestoError::SaleEnded {
                ended_at: self.window.end,
            });
        }
        let elapsed = now - self.window.start;
        let bonus = self
            .tiers
            .iter()
            .take_while(|tier| tier.offset_secs <= elapsed)
            .last()
            .map(|tier| tier.bonus_percent)
            .unwrap_or(0);
        Ok(bonus)
    }
}

// ── Credit arithmetic ────────────────────────────────────────────────────────

/// Tokens credited for a contribution of `value` base currency units at
/// `rate` tokens per unit with `bonus_percent` on top:
/// `value * rate * (100 + bonus) / 100`, truncating toward zero.
///
/// u128 gives ample headroom: the largest representable native-currency
/// amount (~10^26 base units) times the rate and bonus factor stays more
/// than eight orders of magnitude below u128::MAX.
pub fn tokens_for_contribution(value: Balance, rate: Balance, bonus_percent: u64) -> Balance {
    value * rate * (100 + bonus_percent as Balance) / 100
}
