use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use resto_core::error::RestoError;
use resto_core::types::{Address, Balance};

// ── TokenLedger ──────────────────────────────────────────────────────────────

/// Balances and allowances for the one RESTO asset.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenLedger {
    balances: HashMap<Address, Balance>,
    allowances: HashMap<(Address, Address), Balance>,
    total_supply: Balance,
}

impl TokenLedger {
    /// Mint the full supply across `initial` and return the ledger.
    /// This is the one and only place tokens are created; no further
    /// minting is possible afterwards.
    pub fn new(initial: &[(Address, Balance)]) -> Self {
        let mut balances = HashMap::with_capacity(initial.len());
        let mut total_supply: Balance = 0;
        for (addr, amount) in initial {
            *balances.entry(*addr).or_insert(0) += amount;
            total_supply += amount;
        }
        info!(total_supply, holders = initial.len(), "token ledger minted");
        Self {
            balances,
            allowances: HashMap::new(),
            total_supply,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn balance_of(&self, addr: Address) -> Balance {
        self.balances.get(&addr).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> Balance {
        self.allowances.get(&(owner, spender)).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> Balance {
        self.total_supply
    }

    /// All (address, balance) pairs currently held.
    pub fn balances(&self) -> impl Iterator<Item = (&Address, &Balance)> {
        self.balances.iter()
    }

    // ── Low-level primitives ─────────────────────────────────────────────────
    //
    // The controller uses these as a debit-then-credit pair; used alone they
    // would break the conservation law, so `transfer`/`transfer_from` are the
    // surface everything else goes through.

    /// Remove `amount` from `from`, failing if the balance is insufficient.
    pub fn debit(&mut self, from: Address, amount: Balance) -> Result<(), RestoError> {
        let have = self.balance_of(from);
        if have < amount {
            return Err(RestoError::InsufficientBalance { need: amount, have });
        }
        *self.balances.entry(from).or_insert(0) -= amount;
        Ok(())
    }

    /// Add `amount` to `to`.
    pub fn credit(&mut self, to: Address, amount: Balance) {
        *self.balances.entry(to).or_insert(0) += amount;
    }

    // ── Holder surface ───────────────────────────────────────────────────────

    /// Move `amount` from `from` to `to`.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Balance,
    ) -> Result<(), RestoError> {
        self.debit(from, amount)?;
        self.credit(to, amount);
        Ok(())
    }

    /// Set `spender`'s allowance over `owner`'s balance to `amount`.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: Balance) {
        self.allowances.insert((owner, spender), amount);
    }

    /// Raise `spender`'s allowance over `owner`'s balance by `delta`.
    pub fn increase_approval(&mut self, owner: Address, spender: Address, delta: Balance) {
        let entry = self.allowances.entry((owner, spender)).or_insert(0);
        *entry = entry.saturating_add(delta);
    }

    /// Spend `spender`'s allowance to move `amount` from `from` to `to`.
    /// The allowance is consumed atomically with the balance move: a failed
    /// check leaves both untouched.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Balance,
    ) -> Result<(), RestoError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(RestoError::InsufficientAllowance {
                need: amount,
                have: allowed,
            });
        }
        let have = self.balance_of(from);
        if have < amount {
            return Err(RestoError::InsufficientBalance { need: amount, have });
        }
        self.allowances.insert((from, spender), allowed - amount);
        *self.balances.entry(from).or_insert(0) -= amount;
        self.credit(to, amount);
        Ok(())
    }
}
