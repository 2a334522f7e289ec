//! Shroud Sealed Delivery
//!
//! Once the execution layer decrypts a contract output for its owner, the
//! plaintext must never travel in the clear. This crate seals it to the
//! user's X25519 public key so only they can open it: an ephemeral key
//! exchange, a domain-separated BLAKE3 KDF and ChaCha20-Poly1305.
//!
//! The sender needs nothing but the recipient's 32-byte public key; the
//! sealed box carries the ephemeral public key needed to open it.

mod delivery;

pub use delivery::{
    open_sealed, seal_for_user, DeliveryKeypair, SealedError, SealedResult, SEALED_OVERHEAD,
};
