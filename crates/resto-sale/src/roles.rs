//! Owner, pending owner, manager, and the pause switch.
//!
//! Ownership moves in two steps: the current owner nominates, the nominee
//! confirms. The single manager slot starts as the constructing owner and
//! is replaced unconditionally by `set_manager`. All of it is per-instance
//! state; nothing here is global.

use serde::{Deserialize, Serialize};
use tracing::info;

use resto_core::error::RestoError;
use resto_core::types::Address;

// ── RoleState ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoleState {
    owner: Address,
    pending_owner: Option<Address>,
    manager: Address,
}

impl RoleState {
    /// A fresh role table: `owner` holds both the owner and manager slots.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            pending_owner: None,
            manager: owner,
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn manager(&self) -> Address {
        self.manager
    }

    pub fn pending_owner(&self) -> Option<Address> {
        self.pending_owner
    }

    // ── Guards ───────────────────────────────────────────────────────────────

    pub fn require_owner(&self, caller: Address) -> Result<(), RestoError> {
        if caller != self.owner {
            return Err(RestoError::Unauthorized);
        }
        Ok(())
    }

    pub fn require_manager(&self, caller: Address) -> Result<(), RestoError> {
        if caller != self.manager {
            return Err(RestoError::Unauthorized);
        }
        Ok(())
    }

    pub fn require_owner_or_manager(&self, caller: Address) -> Result<(), RestoError> {
        if caller != self.owner && caller != self.manager {
            return Err(RestoError::Unauthorized);
        }
        Ok(())
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    /// Nominate `new_owner`. The effective owner is unchanged until the
    /// nominee confirms; a second nomination overwrites the first.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), RestoError> {
        self.require_owner(caller)?;
        self.pending_owner = Some(new_owner);
        info!(owner = %self.owner, pending = %new_owner, "ownership transfer initiated");
        Ok(())
    }

    /// Complete a pending transfer. Only the nominee may call.
    pub fn confirm_ownership(&mut self, caller: Address) -> Result<(), RestoError> {
        if self.pending_owner != Some(caller) {
            return Err(RestoError::NotPendingOwner);
        }
        self.owner = caller;
        self.pending_owner = None;
        info!(owner = %self.owner, "ownership transfer confirmed");
        Ok(())
    }

    /// Replace the manager slot.
    pub fn set_manager(&mut self, caller: Address, manager: Address) -> Result<(), RestoError> {
        self.require_owner(caller)?;
        self.manager = manager;
        info!(manager = %manager, "manager replaced");
        Ok(())
    }
}

// ── PauseGate ────────────────────────────────────────────────────────────────

/// The binary switch over manager-initiated sale-pool distribution.
/// Caller authorization (owner or manager) is the controller's job;
/// the gate itself only holds the flag. Redundant flips are accepted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PauseGate {
    paused: bool,
}

impl PauseGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            info!("crowdsale paused");
        }
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        if self.paused {
            info!("crowdsale unpaused");
        }
        self.paused = false;
    }

    pub fn ensure_not_paused(&self) -> Result<(), RestoError> {
        if self.paused {
            return Err(RestoError::Paused);
        }
        Ok(())
    }
}
