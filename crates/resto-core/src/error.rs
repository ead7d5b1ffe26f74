use thiserror::Error;

use crate::types::{Balance, Timestamp};

#[derive(Debug, Error)]
pub enum RestoError {
    // ── Sale lifecycle ───────────────────────────────────────────────────────
    #[error("sale has not started (opens at {starts_at})")]
    SaleNotStarted { starts_at: Timestamp },

    #[error("sale has ended (closed at {ended_at})")]
    SaleEnded { ended_at: Timestamp },

    // ── Authorization ────────────────────────────────────────────────────────
    #[error("caller is not authorized for this operation")]
    Unauthorized,

    #[error("caller is not the pending owner")]
    NotPendingOwner,

    #[error("crowdsale is paused")]
    Paused,

    // ── Allocation buckets ───────────────────────────────────────────────────
    #[error("bucket is locked until {unlocks_at}")]
    BucketLocked { unlocks_at: Timestamp },

    #[error("insufficient bucket balance: need {need}, have {have}")]
    InsufficientBucketBalance { need: Balance, have: Balance },

    // ── Ledger ───────────────────────────────────────────────────────────────
    #[error("insufficient balance: need {need}, have {have}")]
    InsufficientBalance { need: Balance, have: Balance },

    #[error("insufficient allowance: need {need}, have {have}")]
    InsufficientAllowance { need: Balance, have: Balance },
}
