use serde::{Deserialize, Serialize};
use std::fmt;

/// Token amount in base units (1 RESTO = 10^18 base units). u128 holds the
/// full 1,100,000,000-RESTO supply (1.1 × 10^27 base units) with headroom
/// for the bonus arithmetic.
pub type Balance = u128;

/// Unix timestamp (seconds, UTC). Supplied by the caller on every
/// time-sensitive operation; the core never reads a clock.
pub type Timestamp = i64;

// ── Address ──────────────────────────────────────────────────────────────────

/// 20-byte account address, hex-encoded for display.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub fn from_bytes(b: [u8; 20]) -> Self {
        Self(b)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != 20 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Deterministic address derived as the first 20 bytes of BLAKE3(seed).
    /// Used for fixture and default-config accounts.
    pub fn from_seed(seed: &str) -> Self {
        let hash = blake3::hash(seed.as_bytes());
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&hash.as_bytes()[..20]);
        Self(arr)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{}…)", &self.to_hex()[..8])
    }
}
