//! Error types for the oracle side of the require protocol.
//!
//! Every variant here is fatal for the oracle. A condition it cannot
//! decrypt or persist leaves the network with no agreed branch outcome,
//! so the host must stop executing rather than guess. Node-side failures
//! never surface as errors at all; the verifier resolves them to `false`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    /// The oracle holds the client key but decryption of the condition failed
    #[error("Condition decryption failed: {0}")]
    Decryption(String),

    /// The require record could not be persisted after exhausting retries
    #[error("Require store rejected record: {0}")]
    Store(String),
}

pub type OracleResult<T> = Result<T, OracleError>;
