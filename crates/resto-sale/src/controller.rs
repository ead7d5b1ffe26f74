//! The crowdsale controller.
//!
//! Orchestrates the ledger, the allocation registry, the bonus schedule,
//! and the role/pause state. Every entry point takes the caller address
//! (and `now` where time matters) explicitly, validates every fallible
//! condition, and only then mutates — a rejection leaves all state exactly
//! as it was.

use tracing::info;

use resto_core::constants::TOTAL_SUPPLY_UNITS;
use resto_core::error::RestoError;
use resto_core::types::{Address, Balance, Timestamp};
use resto_ledger::TokenLedger;

use crate::allocation::{AllocationRegistry, Bucket};
use crate::params::SaleParams;
use crate::roles::{PauseGate, RoleState};
use crate::schedule::{tokens_for_contribution, BonusSchedule, SaleWindow};

// ── Crowdsale ────────────────────────────────────────────────────────────────

/// One sale instance: its token, its buckets, its window, its roles.
#[derive(Clone, Debug)]
pub struct Crowdsale {
    roles: RoleState,
    gate: PauseGate,
    schedule: BonusSchedule,
    registry: AllocationRegistry,
    ledger: TokenLedger,
    rate: Balance,
    /// Native currency units received and not yet forwarded to the owner.
    collected: Balance,
}

impl Crowdsale {
    /// Construct the sale at `constructed_at`: mints the full supply across
    /// the buckets, anchors the window at `constructed_at + start_offset`,
    /// and places the one-year hold on Team B measured from sale end.
    ///
    /// # Panics
    /// Panics if the configured bucket addresses are not pairwise distinct
    /// or the bonus table is malformed — construction-time configuration
    /// errors, not runtime conditions.
    pub fn new(params: &SaleParams, constructed_at: Timestamp) -> Self {
        let addresses = params.bucket_addresses();
        let unique: std::collections::BTreeSet<_> = addresses.values().collect();
        assert_eq!(
            unique.len(),
            addresses.len(),
            "bucket addresses must be pairwise distinct"
        );

        let start = constructed_at + params.start_offset_secs;
        let end = start + params.sale_duration_secs;
        let schedule = BonusSchedule::new(
            SaleWindow { start, end },
            params.bonus_tiers.clone(),
        );

        let registry = AllocationRegistry::new(
            &addresses,
            TOTAL_SUPPLY_UNITS,
            end + params.team_b_hold_secs,
        );
        let ledger = TokenLedger::new(&registry.initial_balances());

        info!(
            owner = %params.owner,
            start,
            end,
            rate = params.tokens_per_currency_unit,
            "crowdsale constructed"
        );

        Self {
            roles: RoleState::new(params.owner),
            gate: PauseGate::new(),
            schedule,
            registry,
            ledger,
            rate: params.tokens_per_currency_unit,
            collected: 0,
        }
    }

    // ── Contributions ────────────────────────────────────────────────────────

    /// Accept `value` native currency units from `from` and credit the
    /// bonus-rated tokens out of the sale pool. Open-window only; not
    /// affected by the pause switch. Returns the tokens credited.
    pub fn contribute(
        &mut self,
        from: Address,
        value: Balance,
        now: Timestamp,
    ) -> Result<Balance, RestoError> {
        let bonus = self.schedule.bonus_percent_at(now)?;
        let credit = tokens_for_contribution(value, self.rate, bonus);
        self.debit_bucket_to(Bucket::SalePool, from, credit, now)?;
        self.collected += value;
        info!(
            contributor = %from,
            value,
            bonus_percent = bonus,
            credited = credit,
            "contribution accepted"
        );
        Ok(credit)
    }

    /// Move the entire collected currency balance to the owner. Callable in
    /// any lifecycle state; returns the amount forwarded (zero if nothing
    /// has accumulated since the last call).
    pub fn forward_funds(&mut self, caller: Address) -> Result<Balance, RestoError> {
        self.roles.require_owner(caller)?;
        let amount = self.collected;
        self.collected = 0;
        info!(owner = %caller, amount, "collected funds forwarded");
        Ok(amount)
    }

    // ── Manager distribution ─────────────────────────────────────────────────

    /// Manager-initiated distribution from the sale pool. Blocked while
    /// paused; not tied to the sale window.
    pub fn transfer_tokens(
        &mut self,
        caller: Address,
        to: Address,
        amount: Balance,
        now: Timestamp,
    ) -> Result<(), RestoError> {
        self.transfer_tokens_from(caller, Bucket::SalePool, to, amount, now)
    }

    /// Manager-initiated withdrawal from any bucket, subject to that
    /// bucket's hold. The pause switch gates only the sale pool; the six
    /// reserved buckets stay withdrawable while paused.
    pub fn transfer_tokens_from(
        &mut self,
        caller: Address,
        bucket: Bucket,
        to: Address,
        amount: Balance,
        now: Timestamp,
    ) -> Result<(), RestoError> {
        self.roles.require_manager(caller)?;
        if bucket == Bucket::SalePool {
            self.gate.ensure_not_paused()?;
        }
        self.debit_bucket_to(bucket, to, amount, now)?;
        info!(
            manager = %caller,
            bucket = bucket.name(),
            to = %to,
            amount,
            "tokens distributed"
        );
        Ok(())
    }

    /// Validate, move on the ledger, then record on the registry. The
    /// registry mutation comes last, after every fallible step, so a
    /// rejection anywhere leaves both sides untouched.
    fn debit_bucket_to(
        &mut self,
        bucket: Bucket,
        to: Address,
        amount: Balance,
        now: Timestamp,
    ) -> Result<(), RestoError> {
        self.registry.ensure_can_debit(bucket, amount, now)?;
        self.ledger
            .transfer(self.registry.address(bucket), to, amount)?;
        self.registry.record_debit(bucket, amount);
        Ok(())
    }

    // ── Roles and pause ──────────────────────────────────────────────────────

    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), RestoError> {
        self.roles.transfer_ownership(caller, new_owner)
    }

    pub fn confirm_ownership(&mut self, caller: Address) -> Result<(), RestoError> {
        self.roles.confirm_ownership(caller)
    }

    pub fn set_manager(&mut self, caller: Address, manager: Address) -> Result<(), RestoError> {
        self.roles.set_manager(caller, manager)
    }

    pub fn pause(&mut self, caller: Address) -> Result<(), RestoError> {
        self.roles.require_owner_or_manager(caller)?;
        self.gate.pause();
        Ok(())
    }

    pub fn unpause(&mut self, caller: Address) -> Result<(), RestoError> {
        self.roles.require_owner_or_manager(caller)?;
        self.gate.unpause();
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    /// The token ledger, read-only.
    pub fn token(&self) -> &TokenLedger {
        &self.ledger
    }

    /// The holder-facing token surface (`transfer` / `approve` /
    /// `transfer_from`), used by holders directly rather than through the
    /// controller.
    pub fn token_mut(&mut self) -> &mut TokenLedger {
        &mut self.ledger
    }

    pub fn bucket_remaining(&self, bucket: Bucket) -> Balance {
        self.registry.remaining(bucket)
    }

    pub fn bucket_address(&self, bucket: Bucket) -> Address {
        self.registry.address(bucket)
    }

    pub fn collected(&self) -> Balance {
        self.collected
    }

    pub fn window(&self) -> SaleWindow {
        self.schedule.window()
    }

    pub fn owner(&self) -> Address {
        self.roles.owner()
    }

    pub fn manager(&self) -> Address {
        self.roles.manager()
    }

    pub fn pending_owner(&self) -> Option<Address> {
        self.roles.pending_owner()
    }

    pub fn is_paused(&self) -> bool {
        self.gate.is_paused()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resto_core::constants::{UNITS_PER_CURRENCY, UNITS_PER_TOKEN};
    use crate::schedule::BonusTier;

    const DEPLOYED_AT: Timestamp = 1_535_932_800; // 2018-09-03 00:00:00 UTC

    fn addr(seed: &str) -> Address {
        Address::from_seed(seed)
    }

    fn sale() -> Crowdsale {
        Crowdsale::new(&SaleParams::default(), DEPLOYED_AT)
    }

    fn assert_conserved(sale: &Crowdsale) {
        let total: Balance = sale.token().balances().map(|(_, b)| *b).sum();
        assert_eq!(total, TOTAL_SUPPLY_UNITS, "ledger must conserve supply");
        for bucket in Bucket::ALL {
            assert_eq!(
                sale.bucket_remaining(bucket),
                sale.token().balance_of(sale.bucket_address(bucket)),
                "registry must mirror the {} address balance",
                bucket.name()
            );
        }
    }

    #[test]
    fn construction_mints_and_mirrors() {
        let sale = sale();
        assert_eq!(sale.token().total_supply(), TOTAL_SUPPLY_UNITS);
        assert_eq!(sale.owner(), addr("resto/owner"));
        assert_eq!(sale.manager(), addr("resto/owner"));
        assert!(!sale.is_paused());
        assert_conserved(&sale);
    }

    #[test]
    fn contribute_rejected_outside_the_window_without_side_effects() {
        let mut sale = sale();
        let window = sale.window();

        let err = sale.contribute(addr("early"), UNITS_PER_CURRENCY, window.start - 1);
        assert!(matches!(err, Err(RestoError::SaleNotStarted { .. })));
        let err = sale.contribute(addr("late"), UNITS_PER_CURRENCY, window.end);
        assert!(matches!(err, Err(RestoError::SaleEnded { .. })));

        assert_eq!(sale.collected(), 0);
        assert_eq!(sale.token().balance_of(addr("early")), 0);
        assert_conserved(&sale);
    }

    #[test]
    fn contribute_credits_and_collects() {
        let mut sale = sale();
        let start = sale.window().start;
        let credited = sale
            .contribute(addr("contributor"), 5 * UNITS_PER_CURRENCY, start)
            .unwrap();
        assert_eq!(credited, 10_000 * UNITS_PER_TOKEN);
        assert_eq!(sale.token().balance_of(addr("contributor")), credited);
        assert_eq!(sale.collected(), 5 * UNITS_PER_CURRENCY);
        assert_eq!(
            sale.bucket_remaining(Bucket::SalePool),
            (506_000_000 - 10_000) * UNITS_PER_TOKEN
        );
        assert_conserved(&sale);
    }

    #[test]
    fn contribute_exceeding_the_pool_is_atomic() {
        let mut sale = sale();
        let start = sale.window().start;
        // 506M tokens at 100% bonus are exhausted by a 253,001-unit value.
        let err = sale
            .contribute(addr("whale"), 253_001 * UNITS_PER_CURRENCY, start)
            .unwrap_err();
        assert!(matches!(err, RestoError::InsufficientBucketBalance { .. }));
        assert_eq!(sale.collected(), 0);
        assert_eq!(sale.token().balance_of(addr("whale")), 0);
        assert_conserved(&sale);
    }

    #[test]
    fn contribute_truncates_toward_zero_with_non_dividing_config() {
        let mut params = SaleParams::default();
        params.tokens_per_currency_unit = 7;
        params.bonus_tiers = vec![BonusTier { offset_secs: 0, bonus_percent: 33 }];
        let mut sale = Crowdsale::new(&params, DEPLOYED_AT);
        let start = sale.window().start;
        // 1 * 7 * 133 / 100 = 9.31 → 9.
        assert_eq!(sale.contribute(addr("c"), 1, start).unwrap(), 9);
    }

    #[test]
    fn forward_funds_is_owner_only_and_empties_exactly_once() {
        let mut sale = sale();
        let start = sale.window().start;
        sale.contribute(addr("c"), 5 * UNITS_PER_CURRENCY, start).unwrap();

        assert!(matches!(
            sale.forward_funds(addr("stranger")),
            Err(RestoError::Unauthorized)
        ));
        assert_eq!(sale.forward_funds(sale.owner()).unwrap(), 5 * UNITS_PER_CURRENCY);
        assert_eq!(sale.collected(), 0);
        assert_eq!(sale.forward_funds(sale.owner()).unwrap(), 0);
    }

    #[test]
    fn transfer_tokens_is_not_tied_to_the_sale_window() {
        let mut sale = sale();
        // Before the sale opens the manager can already distribute.
        sale.transfer_tokens(sale.manager(), addr("investor"), UNITS_PER_TOKEN, DEPLOYED_AT)
            .unwrap();
        assert_eq!(sale.token().balance_of(addr("investor")), UNITS_PER_TOKEN);
        assert_conserved(&sale);
    }

    #[test]
    fn pause_blocks_only_the_sale_pool_path() {
        let mut sale = sale();
        let start = sale.window().start;
        let manager = sale.manager();
        sale.pause(manager).unwrap();

        assert!(matches!(
            sale.transfer_tokens(manager, addr("investor"), UNITS_PER_TOKEN, start),
            Err(RestoError::Paused)
        ));
        // Public contributions are unaffected by pause.
        sale.contribute(addr("c"), UNITS_PER_CURRENCY, start).unwrap();
        // Bucket withdrawals stay open while paused.
        sale.transfer_tokens_from(manager, Bucket::Bounty, addr("hunter"), UNITS_PER_TOKEN, start)
            .unwrap();
        assert_conserved(&sale);

        sale.unpause(manager).unwrap();
        sale.transfer_tokens(manager, addr("investor"), UNITS_PER_TOKEN, start)
            .unwrap();
    }

    #[test]
    fn pause_requires_owner_or_manager() {
        let mut sale = sale();
        assert!(matches!(
            sale.pause(addr("stranger")),
            Err(RestoError::Unauthorized)
        ));
        let owner = sale.owner();
        sale.set_manager(owner, addr("manager")).unwrap();
        sale.pause(addr("manager")).unwrap();
        sale.unpause(owner).unwrap();
    }

    #[test]
    fn distribution_requires_the_manager() {
        let mut sale = sale();
        let owner = sale.owner();
        sale.set_manager(owner, addr("manager")).unwrap();
        // After delegation the slot belongs to the manager alone.
        assert!(matches!(
            sale.transfer_tokens(addr("stranger"), addr("x"), 1, DEPLOYED_AT),
            Err(RestoError::Unauthorized)
        ));
        sale.transfer_tokens(addr("manager"), addr("x"), 1, DEPLOYED_AT)
            .unwrap();
    }

    #[test]
    fn bucket_withdrawal_failure_leaves_no_partial_state() {
        let mut sale = sale();
        let manager = sale.manager();
        let bounty_addr = sale.bucket_address(Bucket::Bounty);
        let remaining = sale.bucket_remaining(Bucket::Bounty);

        // The bounty account moves half its tokens out directly, behind the
        // registry's back; the mirror now overstates the withdrawable amount.
        sale.token_mut()
            .transfer(bounty_addr, addr("elsewhere"), remaining / 2)
            .unwrap();

        let err = sale
            .transfer_tokens_from(manager, Bucket::Bounty, addr("hunter"), remaining, DEPLOYED_AT)
            .unwrap_err();
        assert!(matches!(err, RestoError::InsufficientBalance { .. }));
        // The failed ledger move must not have debited the registry.
        assert_eq!(sale.bucket_remaining(Bucket::Bounty), remaining);
        assert_eq!(sale.token().balance_of(addr("hunter")), 0);
    }

    #[test]
    fn team_b_hold_is_measured_from_sale_end() {
        let mut sale = sale();
        let manager = sale.manager();
        let unlock = sale.window().end + resto_core::constants::TEAM_B_HOLD_SECS;

        let err = sale
            .transfer_tokens_from(manager, Bucket::TeamB, addr("dev"), 1, unlock - 1)
            .unwrap_err();
        assert!(matches!(err, RestoError::BucketLocked { unlocks_at } if unlocks_at == unlock));

        sale.transfer_tokens_from(manager, Bucket::TeamB, addr("dev"), 1, unlock)
            .unwrap();
        assert_eq!(sale.token().balance_of(addr("dev")), 1);
        assert_conserved(&sale);
    }
}
