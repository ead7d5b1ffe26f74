//! Construction-time configuration.
//!
//! Everything a sale instance is born with: the owner, the seven bucket
//! addresses, the timing offsets, the rate, and the bonus ladder. Fixed at
//! construction; there is no runtime reconfiguration. In production these
//! come from a params file; in tests, [`SaleParams::default`] supplies the
//! production constants with deterministic seed-derived addresses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use resto_core::constants::{
    BONUS_TIERS, SALE_DURATION_SECS, SALE_START_OFFSET_SECS, TEAM_B_HOLD_SECS,
    TOKENS_PER_CURRENCY_UNIT,
};
use resto_core::types::{Address, Balance};

use crate::allocation::Bucket;
use crate::schedule::BonusTier;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaleParams {
    /// The constructing owner; also the initial manager.
    pub owner: Address,
    /// The sale pool's own account, holding the 46% distribution share.
    pub sale_address: Address,
    pub team_a_address: Address,
    pub team_b_address: Address,
    pub marketing_address: Address,
    pub retailers_address: Address,
    pub reserve_address: Address,
    pub bounty_address: Address,
    /// Sale opens this long after construction.
    pub start_offset_secs: i64,
    /// Sale closes this long after it opens.
    pub sale_duration_secs: i64,
    /// Team B stays locked this long past sale end.
    pub team_b_hold_secs: i64,
    /// Tokens per native currency unit, before bonus.
    pub tokens_per_currency_unit: Balance,
    pub bonus_tiers: Vec<BonusTier>,
}

impl Default for SaleParams {
    fn default() -> Self {
        Self {
            owner: Address::from_seed("resto/owner"),
            sale_address: Address::from_seed("resto/sale_pool"),
            team_a_address: Address::from_seed("resto/team_a"),
            team_b_address: Address::from_seed("resto/team_b"),
            marketing_address: Address::from_seed("resto/marketing"),
            retailers_address: Address::from_seed("resto/retailers"),
            reserve_address: Address::from_seed("resto/reserve"),
            bounty_address: Address::from_seed("resto/bounty"),
            start_offset_secs: SALE_START_OFFSET_SECS,
            sale_duration_secs: SALE_DURATION_SECS,
            team_b_hold_secs: TEAM_B_HOLD_SECS,
            tokens_per_currency_unit: TOKENS_PER_CURRENCY_UNIT,
            bonus_tiers: BONUS_TIERS
                .iter()
                .map(|&(offset_secs, bonus_percent)| BonusTier {
                    offset_secs,
                    bonus_percent,
                })
                .collect(),
        }
    }
}

impl SaleParams {
    /// Parse params from their JSON representation.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The bucket → address table the registry is built from.
    pub fn bucket_addresses(&self) -> BTreeMap<Bucket, Address> {
        BTreeMap::from([
            (Bucket::TeamA, self.team_a_address),
            (Bucket::TeamB, self.team_b_address),
            (Bucket::Marketing, self.marketing_address),
            (Bucket::Retailers, self.retailers_address),
            (Bucket::Reserve, self.reserve_address),
            (Bucket::Bounty, self.bounty_address),
            (Bucket::SalePool, self.sale_address),
        ])
    }
}
