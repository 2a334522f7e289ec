//! FHE Ciphertext type
//!
//! The serialized, type-tagged ciphertext every other crate tracks.
//! Payload bytes stay opaque outside this crate; the registry addresses
//! them by their blake3 content hash.

use serde::{Deserialize, Serialize};
use tfhe::prelude::*;
use tfhe::{FheBool as TfheFheBool, FheUint64 as TfheFheUint64};

use crate::keys::ClientKey;
use crate::{FHEError, FHEResult};

/// Kind of plaintext a ciphertext encrypts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CipherKind {
    /// Encrypted boolean (comparison results, branch conditions)
    Bool = 0,
    /// Encrypted 64-bit unsigned integer
    Uint64 = 1,
}

impl CipherKind {
    /// Wire tag for this kind
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for CipherKind {
    type Error = FHEError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(CipherKind::Bool),
            1 => Ok(CipherKind::Uint64),
            other => Err(FHEError::UnknownKind(other)),
        }
    }
}

impl std::fmt::Display for CipherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CipherKind::Bool => write!(f, "bool"),
            CipherKind::Uint64 => write!(f, "uint64"),
        }
    }
}

/// Serialized FHE ciphertext with a kind tag
///
/// Immutable once constructed: homomorphic operations produce new values.
#[derive(Clone, Serialize, Deserialize)]
pub struct Ciphertext {
    /// Serialized TFHE-rs ciphertext bytes
    data: Vec<u8>,
    /// Kind of the encrypted plaintext
    kind: CipherKind,
}

impl Ciphertext {
    /// Wrap already-serialized ciphertext bytes
    pub fn new(data: Vec<u8>, kind: CipherKind) -> Self {
        Self { data, kind }
    }

    /// Encrypt a u64 value with the client key
    pub fn encrypt_u64(value: u64, client_key: &ClientKey) -> FHEResult<Self> {
        let encrypted = TfheFheUint64::try_encrypt(value, client_key.inner())
            .map_err(|e| FHEError::EncryptionFailed(e.to_string()))?;
        let data = bincode::serialize(&encrypted)
            .map_err(|e| FHEError::SerializationError(e.to_string()))?;

        Ok(Self {
            data,
            kind: CipherKind::Uint64,
        })
    }

    /// Encrypt a boolean with the client key
    pub fn encrypt_bool(value: bool, client_key: &ClientKey) -> FHEResult<Self> {
        let encrypted = TfheFheBool::try_encrypt(value, client_key.inner())
            .map_err(|e| FHEError::EncryptionFailed(e.to_string()))?;
        let data = bincode::serialize(&encrypted)
            .map_err(|e| FHEError::SerializationError(e.to_string()))?;

        Ok(Self {
            data,
            kind: CipherKind::Bool,
        })
    }

    /// Decrypt to u64 using the client key
    ///
    /// Fails with `KindMismatch` unless the ciphertext is `Uint64`-kinded.
    pub fn decrypt_u64(&self, client_key: &ClientKey) -> FHEResult<u64> {
        self.expect_kind(CipherKind::Uint64)?;
        let inner = self.to_fhe_uint64()?;
        Ok(inner.decrypt(client_key.inner()))
    }

    /// Decrypt to bool using the client key
    ///
    /// Fails with `KindMismatch` unless the ciphertext is `Bool`-kinded.
    pub fn decrypt_bool(&self, client_key: &ClientKey) -> FHEResult<bool> {
        self.expect_kind(CipherKind::Bool)?;
        let inner = self.to_fhe_bool()?;
        Ok(inner.decrypt(client_key.inner()))
    }

    /// Serialized payload bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Kind of the encrypted plaintext
    pub fn kind(&self) -> CipherKind {
        self.kind
    }

    /// Content hash of the payload bytes
    ///
    /// This is the value the registry derives handles from: equal payloads
    /// hash equal regardless of how the ciphertext object was produced.
    pub fn hash(&self) -> [u8; 32] {
        *blake3::hash(&self.data).as_bytes()
    }

    pub(crate) fn expect_kind(&self, expected: CipherKind) -> FHEResult<()> {
        if self.kind != expected {
            return Err(FHEError::KindMismatch {
                expected,
                got: self.kind,
            });
        }
        Ok(())
    }

    pub(crate) fn to_fhe_uint64(&self) -> FHEResult<TfheFheUint64> {
        bincode::deserialize(&self.data)
            .map_err(|e| FHEError::SerializationError(e.to_string()))
    }

    pub(crate) fn to_fhe_bool(&self) -> FHEResult<TfheFheBool> {
        bincode::deserialize(&self.data)
            .map_err(|e| FHEError::SerializationError(e.to_string()))
    }

    pub(crate) fn from_fhe_uint64(inner: &TfheFheUint64) -> FHEResult<Self> {
        let data = bincode::serialize(inner)
            .map_err(|e| FHEError::SerializationError(e.to_string()))?;
        Ok(Self {
            data,
            kind: CipherKind::Uint64,
        })
    }

    pub(crate) fn from_fhe_bool(inner: &TfheFheBool) -> FHEResult<Self> {
        let data = bincode::serialize(inner)
            .map_err(|e| FHEError::SerializationError(e.to_string()))?;
        Ok(Self {
            data,
            kind: CipherKind::Bool,
        })
    }
}

impl std::fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ciphertext")
            .field("size", &self.data.len())
            .field("kind", &self.kind)
            .field("hash", &hex::encode(&self.hash()[..8]))
            .finish()
    }
}
