//! Ciphertext handles
//!
//! A handle is the 32-byte content hash of a ciphertext's payload bytes.
//! It is the only form in which encrypted values cross the host boundary.

use serde::{Deserialize, Serialize};
use shroud_fhe::Ciphertext;

/// Content-derived identifier for a registered ciphertext
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle([u8; 32]);

impl Handle {
    /// Number of bytes in a serialized handle
    pub const LEN: usize = 32;

    /// Derive the handle for a ciphertext from its payload bytes
    pub fn compute(ciphertext: &Ciphertext) -> Self {
        Self(ciphertext.hash())
    }

    /// Create a handle from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a handle from a slice, if it is exactly 32 bytes long
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
