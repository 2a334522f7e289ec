//! FHE Error types

use thiserror::Error;

use crate::CipherKind;

/// Errors that can occur during FHE operations
#[derive(Error, Debug)]
pub enum FHEError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Operation applied to a ciphertext of the wrong kind
    #[error("Ciphertext kind mismatch: expected {expected}, got {got}")]
    KindMismatch { expected: CipherKind, got: CipherKind },

    /// Byte tag does not name a known ciphertext kind
    #[error("Unknown ciphertext kind tag: {0}")]
    UnknownKind(u8),
}
