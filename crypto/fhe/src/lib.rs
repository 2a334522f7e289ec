//! Shroud FHE Operations
//!
//! Fully Homomorphic Encryption using TFHE-rs.
//! Enables the execution layer to compute on encrypted contract values
//! without revealing them.
//!
//! # Key Features:
//! - Encrypt/decrypt u64 values and booleans
//! - Homomorphic addition, subtraction and comparisons
//! - Serialized, type-tagged ciphertexts suitable for content addressing
//! - Global server key so operations can run anywhere in the process
//!
//! # Architecture:
//! - ClientKey: For encryption/decryption (held by the oracle)
//! - ServerKey: For homomorphic operations (held by every executing node)
//! - Ciphertext: Serialized payload plus a kind tag; the unit every other
//!   crate tracks, hashes and stores

pub mod errors;
mod ciphertext;
mod keys;
mod operations;

pub use ciphertext::{CipherKind, Ciphertext};
pub use errors::FHEError;
pub use keys::{clear_server_key, set_server_key, ClientKey, KeyPair, ServerKey};
pub use operations::FHEOps;

/// FHE Configuration
#[derive(Clone, Debug)]
pub struct FHEConfig {
    /// Security parameter (bits)
    pub security_bits: u32,
}

impl Default for FHEConfig {
    fn default() -> Self {
        Self { security_bits: 128 }
    }
}

/// Result type for FHE operations
pub type FHEResult<T> = Result<T, FHEError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = FHEConfig::default();
        assert_eq!(config.security_bits, 128);
    }
}
