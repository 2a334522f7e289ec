//! Oracle/node protocol for agreeing on encrypted branch conditions.
//!
//! Contract execution over encrypted state hits a wall at conditional
//! branches: the machine must take one side of the branch, but the condition
//! is a ciphertext no validator can read. This crate resolves the branch
//! with a designated oracle instead of threshold machinery.
//!
//! # Key Features:
//! - **Require records**: signed statements binding a condition ciphertext
//!   (by content hash) to its decrypted truth value
//! - **Oracle role**: decrypts the condition, signs the outcome, and
//!   persists it for the rest of the network
//! - **Node role**: never touches key material; looks up the oracle's
//!   record and checks the signature before trusting the value
//! - **Pluggable stores**: in-memory for tests, redb-backed for real
//!   deployments, both behind the [`RequireStore`] trait
//!
//! # Architecture:
//! The two roles fail differently by design. An oracle that cannot decrypt
//! or persist a condition returns a fatal [`OracleError`], because the
//! network cannot make progress without its answer. A node that cannot
//! confirm a record logs a warning and treats the condition as false,
//! which keeps a flaky store or a lagging oracle from crashing validators.

pub mod errors;
mod protocol;
mod record;
mod store;

pub use errors::{OracleError, OracleResult};
pub use protocol::{
    ConditionDecryptor, OracleRole, RequireProtocol, RequirePublisher, RequireVerifier,
};
pub use record::RequireRecord;
pub use store::{MemoryRequireStore, RedbRequireStore, RequireStore, StoreError};

// Callers need these to mint oracle identities and hand us verification keys.
pub use ed25519_dalek::{SigningKey, VerifyingKey};
