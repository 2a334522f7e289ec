//! Error types for the precompile layer.

use thiserror::Error;

use crate::operands::OperandSide;
use shroud_fhe::{CipherKind, FHEError};
use shroud_oracle::OracleError;
use shroud_registry::Handle;
use shroud_sealed::SealedError;

#[derive(Error, Debug)]
pub enum PrecompileError {
    /// Call data does not match the operation's fixed layout
    #[error("Malformed precompile input: need {expected} bytes, got {got}")]
    MalformedInput { expected: usize, got: usize },

    /// A binary operand handle has no verified ciphertext at this depth
    #[error("Unverified {side} operand: no visible ciphertext at this call depth")]
    UnverifiedHandle { side: OperandSide },

    /// A single-handle operation named a handle with no visible ciphertext
    #[error("No verified ciphertext for handle {0}")]
    UnknownHandle(Handle),

    /// Binary operands carry different payload kinds
    #[error("Operand type mismatch: {lhs} vs {rhs}")]
    TypeMismatch { lhs: CipherKind, rhs: CipherKind },

    /// Sealing was requested on a deployment with no client key configured
    #[error("Client key not set for this deployment")]
    ClientKeyNotSet,

    #[error("FHE error: {0}")]
    Fhe(#[from] FHEError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Sealed delivery error: {0}")]
    Sealed(#[from] SealedError),
}

impl PrecompileError {
    /// Whether the host must stop executing in response.
    ///
    /// Oracle failures are the only fatal class: a condition the oracle
    /// could not decrypt or publish leaves the network unable to agree
    /// on the branch. Everything else fails the single call.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PrecompileError::Oracle(_))
    }
}

pub type PrecompileResult<T> = Result<T, PrecompileError>;
