//! Sealed box construction
//!
//! Layout of a sealed value:
//!
//! ```text
//! ephemeral_pk (32) || nonce (12) || ChaCha20-Poly1305 ciphertext (8 + 16)
//! ```
//!
//! The symmetric key is derived with a domain-separated BLAKE3 KDF over the
//! ephemeral public key, the recipient public key and the Diffie-Hellman
//! shared secret, binding the key to both parties of the exchange.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroize;

/// X25519 public key size in bytes
const PUBLIC_KEY_SIZE: usize = 32;

/// Nonce size for ChaCha20-Poly1305
const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag size
const TAG_SIZE: usize = 16;

/// Bytes a sealed box adds on top of the plaintext
pub const SEALED_OVERHEAD: usize = PUBLIC_KEY_SIZE + NONCE_SIZE + TAG_SIZE;

/// KDF context for sealed delivery keys
const KDF_CONTEXT: &str = "shroud_sealed_delivery_v1";

/// Errors that can occur while sealing or opening a delivery
#[derive(Error, Debug)]
pub enum SealedError {
    /// Recipient key is not a valid X25519 public key encoding
    #[error("Invalid user public key: expected {PUBLIC_KEY_SIZE} bytes, got {got}")]
    InvalidKey { got: usize },

    /// Sealing failed
    #[error("Sealing failed: {0}")]
    SealFailed(String),

    /// Opening failed (wrong key, truncated box, or tampered ciphertext)
    #[error("Opening failed: {0}")]
    OpenFailed(String),
}

/// Result type for sealed delivery operations
pub type SealedResult<T> = Result<T, SealedError>;

/// Recipient keypair for sealed deliveries
///
/// Held by the off-chain client that asked for the output; the chain side
/// only ever sees the public half.
pub struct DeliveryKeypair {
    secret: StaticSecret,
    public: X25519PublicKey,
}

impl DeliveryKeypair {
    /// Generate a fresh recipient keypair
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = X25519PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Restore a keypair from secret key bytes
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        let secret = StaticSecret::from(bytes);
        let public = X25519PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Public key bytes to hand to the sealing side
    pub fn public_bytes(&self) -> [u8; 32] {
        *self.public.as_bytes()
    }
}

impl std::fmt::Debug for DeliveryKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryKeypair")
            .field("public", &self.public_bytes())
            .finish_non_exhaustive()
    }
}

/// Derive the symmetric key for one sealed exchange
fn derive_sealing_key(
    ephemeral_pk: &X25519PublicKey,
    recipient_pk: &X25519PublicKey,
    shared_secret: &[u8; 32],
) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(KDF_CONTEXT);
    hasher.update(ephemeral_pk.as_bytes());
    hasher.update(recipient_pk.as_bytes());
    hasher.update(shared_secret);
    *hasher.finalize().as_bytes()
}

/// Seal a decrypted value to a user's public key
///
/// The value is encoded big-endian. Anyone may seal; only the holder of the
/// matching secret key can open. Fails with `InvalidKey` unless
/// `user_public_key` is exactly 32 bytes.
pub fn seal_for_user(value: u64, user_public_key: &[u8]) -> SealedResult<Vec<u8>> {
    let pk_bytes: [u8; 32] = user_public_key
        .try_into()
        .map_err(|_| SealedError::InvalidKey {
            got: user_public_key.len(),
        })?;
    let recipient_pk = X25519PublicKey::from(pk_bytes);

    let ephemeral_secret = StaticSecret::random_from_rng(OsRng);
    let ephemeral_pk = X25519PublicKey::from(&ephemeral_secret);
    let shared = ephemeral_secret.diffie_hellman(&recipient_pk);

    let mut key = derive_sealing_key(&ephemeral_pk, &recipient_pk, shared.as_bytes());
    let cipher = ChaCha20Poly1305::new_from_slice(&key)
        .map_err(|e| SealedError::SealFailed(format!("cipher init failed: {e}")))?;

    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);

    let plaintext = value.to_be_bytes();
    let encrypted = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext.as_ref())
        .map_err(|e| SealedError::SealFailed(format!("encryption failed: {e}")))?;

    key.zeroize();

    let mut sealed = Vec::with_capacity(PUBLIC_KEY_SIZE + NONCE_SIZE + encrypted.len());
    sealed.extend_from_slice(ephemeral_pk.as_bytes());
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&encrypted);
    Ok(sealed)
}

/// Open a sealed value with the recipient's keypair
pub fn open_sealed(sealed: &[u8], keypair: &DeliveryKeypair) -> SealedResult<u64> {
    let min = SEALED_OVERHEAD + std::mem::size_of::<u64>();
    if sealed.len() < min {
        return Err(SealedError::OpenFailed(format!(
            "sealed box too short: need at least {min} bytes, got {}",
            sealed.len()
        )));
    }

    let mut eph_bytes = [0u8; PUBLIC_KEY_SIZE];
    eph_bytes.copy_from_slice(&sealed[..PUBLIC_KEY_SIZE]);
    let ephemeral_pk = X25519PublicKey::from(eph_bytes);

    let nonce = &sealed[PUBLIC_KEY_SIZE..PUBLIC_KEY_SIZE + NONCE_SIZE];
    let encrypted = &sealed[PUBLIC_KEY_SIZE + NONCE_SIZE..];

    let shared = keypair.secret.diffie_hellman(&ephemeral_pk);
    let mut key = derive_sealing_key(&ephemeral_pk, &keypair.public, shared.as_bytes());

    let cipher = ChaCha20Poly1305::new_from_slice(&key)
        .map_err(|e| SealedError::OpenFailed(format!("cipher init failed: {e}")))?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), encrypted)
        .map_err(|_| SealedError::OpenFailed("authentication failed".into()));

    key.zeroize();
    let plaintext = plaintext?;

    let value_bytes: [u8; 8] = plaintext
        .as_slice()
        .try_into()
        .map_err(|_| SealedError::OpenFailed("unexpected plaintext length".into()))?;
    Ok(u64::from_be_bytes(value_bytes))
}
