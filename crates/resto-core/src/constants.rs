/// ─── RESTO Crowdsale Constants ──────────────────────────────────────────────
///
/// Total supply: 1,100,000,000 RESTO, minted once at construction.
/// Base unit:    10^18 per RESTO.
/// Sale price:   1,000 RESTO per native currency unit, before bonus.

use crate::types::Balance;

// ── Supply ───────────────────────────────────────────────────────────────────

/// 1 RESTO expressed in base units.
pub const UNITS_PER_TOKEN: Balance = 1_000_000_000_000_000_000;

/// Total fixed supply in RESTO. Never changes after construction.
pub const TOTAL_SUPPLY_TOKENS: Balance = 1_100_000_000;

/// Total fixed supply in base units.
pub const TOTAL_SUPPLY_UNITS: Balance = TOTAL_SUPPLY_TOKENS * UNITS_PER_TOKEN;

// ── Sale pricing ─────────────────────────────────────────────────────────────

/// One native currency unit in its base units. The currency and the token
/// both use 10^18, so the rate below applies directly to base-unit amounts.
pub const UNITS_PER_CURRENCY: Balance = 1_000_000_000_000_000_000;

/// Tokens issued per native currency unit contributed, before bonus.
pub const TOKENS_PER_CURRENCY_UNIT: Balance = 1_000;

// ── Allocation buckets (basis points of total supply) ────────────────────────

/// Basis-point denominator: 10,000 bps = 100%.
pub const BPS_DENOMINATOR: Balance = 10_000;

/// First team allocation: 4.5%.
pub const TEAM_A_BPS: Balance = 450;

/// Second team allocation: 13.5%. Held for one year past sale end.
pub const TEAM_B_BPS: Balance = 1_350;

/// Marketing allocation: 18%.
pub const MARKETING_BPS: Balance = 1_800;

/// Retailers allocation: 9%.
pub const RETAILERS_BPS: Balance = 900;

/// Reserve allocation: 8%.
pub const RESERVE_BPS: Balance = 800;

/// Bounty allocation: 1%.
pub const BOUNTY_BPS: Balance = 100;

// The sale pool is not a constant: it receives the exact remainder
// (46% of supply) so the seven allocations sum to TOTAL_SUPPLY_UNITS
// with no rounding leakage.

// ── Sale timing (seconds) ────────────────────────────────────────────────────

pub const SECS_PER_DAY: i64 = 86_400;

/// Sale opens this long after construction.
pub const SALE_START_OFFSET_SECS: i64 = 15 * SECS_PER_DAY;

/// Sale closes this long after it opens.
pub const SALE_DURATION_SECS: i64 = 85 * SECS_PER_DAY;

/// The second team bucket stays locked this long past sale end.
pub const TEAM_B_HOLD_SECS: i64 = 365 * SECS_PER_DAY;

// ── Bonus schedule ───────────────────────────────────────────────────────────

/// (offset from sale start, bonus percent) pairs. Offsets are strictly
/// increasing and the first is zero; each tier applies from its offset up to
/// the next tier's offset (half-open, so a contribution at the exact boundary
/// instant lands in the newer, lower tier).
pub const BONUS_TIERS: &[(i64, u64)] = &[
    (0, 100),
    (20 * SECS_PER_DAY, 40),
    (27 * SECS_PER_DAY, 30),
    (34 * SECS_PER_DAY, 20),
    (42 * SECS_PER_DAY, 10),
    (62 * SECS_PER_DAY, 0),
];
