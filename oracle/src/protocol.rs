//! Publisher and verifier roles for encrypted branch conditions.
//!
//! One deployment is configured as the oracle, everything else as a node.
//! The oracle decrypts each condition once, signs the outcome, and writes
//! it to the require store. Nodes reach the same branch decision by reading
//! that record back and checking the signature; they never hold key
//! material and never decrypt anything.

use std::sync::Arc;

use ed25519_dalek::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{OracleError, OracleResult};
use crate::record::RequireRecord;
use crate::store::RequireStore;
use shroud_fhe::{CipherKind, Ciphertext, ClientKey};
use shroud_registry::Handle;

/// Which side of the require protocol this deployment runs.
///
/// The enum is closed: configuration parsing fails on any other value,
/// so by the time a role reaches this crate it is one of these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleRole {
    /// Holds the client key, decrypts conditions, publishes signed records
    Oracle,
    /// Verifies published records against the configured oracle key
    Node,
}

impl std::fmt::Display for OracleRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleRole::Oracle => write!(f, "oracle"),
            OracleRole::Node => write!(f, "node"),
        }
    }
}

/// Decryption seam for the oracle role.
///
/// Production oracles use the [`ClientKey`] implementation below; tests
/// substitute stubs so the protocol runs without FHE key generation.
pub trait ConditionDecryptor: Send + Sync {
    /// Decrypts a condition ciphertext down to its truth value.
    fn decrypt_condition(&self, ciphertext: &Ciphertext) -> Result<bool, String>;
}

impl ConditionDecryptor for ClientKey {
    fn decrypt_condition(&self, ciphertext: &Ciphertext) -> Result<bool, String> {
        match ciphertext.kind() {
            CipherKind::Bool => ciphertext.decrypt_bool(self).map_err(|e| e.to_string()),
            // Numeric conditions follow nonzero truthiness.
            CipherKind::Uint64 => ciphertext
                .decrypt_u64(self)
                .map(|value| value != 0)
                .map_err(|e| e.to_string()),
        }
    }
}

/// Oracle-side half of the protocol: decrypt, sign, persist.
pub struct RequirePublisher {
    store: Arc<dyn RequireStore>,
    decryptor: Arc<dyn ConditionDecryptor>,
    signing_key: SigningKey,
    retry_count: u8,
}

impl RequirePublisher {
    /// `retry_count` is the number of additional store attempts after the
    /// first failure, so `0` means exactly one attempt.
    pub fn new(
        store: Arc<dyn RequireStore>,
        decryptor: Arc<dyn ConditionDecryptor>,
        signing_key: SigningKey,
        retry_count: u8,
    ) -> Self {
        Self {
            store,
            decryptor,
            signing_key,
            retry_count,
        }
    }

    /// Key nodes must be configured with to accept this oracle's records.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Decrypts the condition, signs the outcome, and persists the record.
    ///
    /// Both failure modes here are fatal. If the oracle cannot decrypt or
    /// cannot durably publish its answer, no node can resolve the branch,
    /// and continuing would fork the oracle from the rest of the network.
    pub fn publish_condition(&self, ciphertext: &Ciphertext) -> OracleResult<bool> {
        let handle = Handle::compute(ciphertext);

        let value = self
            .decryptor
            .decrypt_condition(ciphertext)
            .map_err(OracleError::Decryption)?;

        let record = RequireRecord::sign(handle, value, &self.signing_key);

        let mut last_error = String::new();
        for attempt in 0..=self.retry_count {
            match self.store.put(&record) {
                Ok(()) => {
                    info!(handle = %handle, value, "Published require record");
                    return Ok(value);
                }
                Err(e) => {
                    warn!(handle = %handle, attempt, error = %e, "Require store write failed");
                    last_error = e;
                }
            }
        }

        Err(OracleError::Store(last_error))
    }
}

impl std::fmt::Debug for RequirePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequirePublisher")
            .field("retry_count", &self.retry_count)
            .finish_non_exhaustive()
    }
}

/// Node-side half of the protocol: fetch, check signature, trust.
pub struct RequireVerifier {
    store: Arc<dyn RequireStore>,
    oracle_key: VerifyingKey,
    retry_count: u8,
}

impl RequireVerifier {
    pub fn new(store: Arc<dyn RequireStore>, oracle_key: VerifyingKey, retry_count: u8) -> Self {
        Self {
            store,
            oracle_key,
            retry_count,
        }
    }

    /// Resolves a condition from the oracle's published record.
    ///
    /// Every failure resolves to `false` after a warning: missing record,
    /// store errors past the retry budget, and signature rejection all
    /// leave the node refusing the branch rather than crashing. A node
    /// must stay up even when the oracle misbehaves.
    pub fn verify_condition(&self, ciphertext: &Ciphertext) -> bool {
        let handle = Handle::compute(ciphertext);

        let record = match self.fetch_record(&handle) {
            Some(record) => record,
            None => return false,
        };

        // Guards against a store backend returning a row for the wrong key.
        if record.handle != handle {
            warn!(handle = %handle, "Require record names a different condition");
            return false;
        }

        if !record.verify(&self.oracle_key) {
            warn!(handle = %handle, "Require record signature rejected");
            return false;
        }

        debug!(handle = %handle, value = record.value, "Require record verified");
        record.value
    }

    /// Retries only transport failures. A definitive "no record" answer
    /// is returned immediately; the oracle publishes before execution
    /// reaches the branch, so absence is an answer, not a race.
    fn fetch_record(&self, handle: &Handle) -> Option<RequireRecord> {
        for attempt in 0..=self.retry_count {
            match self.store.get(handle) {
                Ok(Some(record)) => return Some(record),
                Ok(None) => {
                    warn!(handle = %handle, "No require record published for condition");
                    return None;
                }
                Err(e) => {
                    warn!(handle = %handle, attempt, error = %e, "Require store read failed");
                }
            }
        }
        None
    }
}

impl std::fmt::Debug for RequireVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequireVerifier")
            .field("retry_count", &self.retry_count)
            .finish_non_exhaustive()
    }
}

/// Role dispatch for condition evaluation.
#[derive(Debug)]
pub enum RequireProtocol {
    Oracle(RequirePublisher),
    Node(RequireVerifier),
}

impl RequireProtocol {
    pub fn role(&self) -> OracleRole {
        match self {
            RequireProtocol::Oracle(_) => OracleRole::Oracle,
            RequireProtocol::Node(_) => OracleRole::Node,
        }
    }

    /// Resolves a branch condition according to the configured role.
    ///
    /// Oracles publish and return the decrypted value; errors are fatal.
    /// Nodes verify and always return `Ok`, with failures folded into
    /// `false`.
    pub fn evaluate_condition(&self, ciphertext: &Ciphertext) -> OracleResult<bool> {
        match self {
            RequireProtocol::Oracle(publisher) => publisher.publish_condition(ciphertext),
            RequireProtocol::Node(verifier) => Ok(verifier.verify_condition(ciphertext)),
        }
    }
}
