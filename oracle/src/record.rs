//! Signed require records.
//!
//! A require record is the oracle's publishable answer for one branch
//! condition: "the ciphertext with this handle decrypts to this truth
//! value, signed by me". Records carry no plaintext beyond the single
//! bit, and nodes accept them only after checking the signature against
//! the oracle key they were configured with.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use shroud_registry::Handle;

/// Domain separator baked into every require signature.
///
/// Keeps an oracle signature over a require record from being replayed
/// as a signature in any other protocol that shares the key.
const SIGNING_CONTEXT: &[u8] = b"shroud_require_v1";

/// A signed statement binding a condition ciphertext to its truth value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequireRecord {
    /// Content hash of the condition ciphertext this record decides
    pub handle: Handle,
    /// Decrypted truth value of the condition
    pub value: bool,
    /// Oracle signature over the domain-separated message
    pub signature: Vec<u8>,
}

impl RequireRecord {
    /// Decrypted outcome for `handle`, signed with the oracle key.
    pub fn sign(handle: Handle, value: bool, signing_key: &SigningKey) -> Self {
        let message = Self::signing_message(&handle, value);
        let signature = signing_key.sign(&message);
        Self {
            handle,
            value,
            signature: signature.to_bytes().to_vec(),
        }
    }

    /// Checks the record's signature against the given oracle key.
    ///
    /// Returns `false` for malformed signatures as well as honest
    /// verification failures; callers treat both the same way.
    pub fn verify(&self, oracle_key: &VerifyingKey) -> bool {
        let sig_bytes: [u8; 64] = match self.signature.as_slice().try_into() {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        let signature = Signature::from_bytes(&sig_bytes);
        let message = Self::signing_message(&self.handle, self.value);
        oracle_key.verify(&message, &signature).is_ok()
    }

    fn signing_message(handle: &Handle, value: bool) -> Vec<u8> {
        let mut message = Vec::with_capacity(SIGNING_CONTEXT.len() + Handle::LEN + 1);
        message.extend_from_slice(SIGNING_CONTEXT);
        message.extend_from_slice(handle.as_bytes());
        message.push(value as u8);
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn test_handle(fill: u8) -> Handle {
        Handle::from_bytes([fill; 32])
    }

    #[test]
    fn test_sign_and_verify() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let record = RequireRecord::sign(test_handle(1), true, &signing_key);

        assert!(record.value);
        assert!(record.verify(&signing_key.verifying_key()));
    }

    #[test]
    fn test_false_value_verifies() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let record = RequireRecord::sign(test_handle(2), false, &signing_key);

        assert!(!record.value);
        assert!(record.verify(&signing_key.verifying_key()));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let other_key = SigningKey::generate(&mut OsRng);
        let record = RequireRecord::sign(test_handle(3), true, &signing_key);

        assert!(!record.verify(&other_key.verifying_key()));
    }

    #[test]
    fn test_flipped_value_rejected() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let mut record = RequireRecord::sign(test_handle(4), true, &signing_key);
        record.value = false;

        assert!(!record.verify(&signing_key.verifying_key()));
    }

    #[test]
    fn test_swapped_handle_rejected() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let mut record = RequireRecord::sign(test_handle(5), true, &signing_key);
        record.handle = test_handle(6);

        assert!(!record.verify(&signing_key.verifying_key()));
    }

    #[test]
    fn test_truncated_signature_rejected() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let mut record = RequireRecord::sign(test_handle(7), true, &signing_key);
        record.signature.truncate(32);

        assert!(!record.verify(&signing_key.verifying_key()));
    }

    #[test]
    fn test_record_roundtrips_through_bincode() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let record = RequireRecord::sign(test_handle(8), true, &signing_key);

        let encoded = bincode::serialize(&record).unwrap();
        let decoded: RequireRecord = bincode::deserialize(&encoded).unwrap();

        assert_eq!(record, decoded);
        assert!(decoded.verify(&signing_key.verifying_key()));
    }
}
