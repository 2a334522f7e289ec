//! SHROUD: Confidential Precompile Core
//!
//! This is the root crate that re-exports all SHROUD components for
//! integration testing and assembles role-specific deployments from
//! configuration.
//!
//! ## Architecture Overview
//!
//! SHROUD lets a deterministic VM execute contracts over fully homomorphic
//! ciphertexts without ever copying ciphertext bytes through contract
//! memory:
//!
//! - **Content-Addressed Handles**: contracts pass 32-byte hashes; the
//!   canonical ciphertexts live in a process-wide registry
//! - **Depth-Scoped Visibility**: a handle is only usable at call depths
//!   where its ciphertext was verified or produced
//! - **Oracle Branching**: encrypted branch conditions are decided once by
//!   a designated oracle and verified by signature everywhere else
//! - **Sealed Delivery**: decrypted results leave the system only inside
//!   sealed boxes addressed to the requesting user's key
//!
//! ## Crate Organization
//!
//! - `shroud-fhe`: TFHE-rs facade (typed ciphertexts, keys, operations)
//! - `shroud-registry`: verified ciphertext registry with depth tracking
//! - `shroud-precompiles`: the precompile entry points the VM dispatches to
//! - `shroud-oracle`: the require protocol (signed condition records)
//! - `shroud-sealed`: sealed output delivery to user keys

pub mod config;
pub mod logging;
pub mod runtime;

// Re-export all crates for integration testing
pub use shroud_fhe as fhe;
pub use shroud_oracle as oracle;
pub use shroud_precompiles as precompiles;
pub use shroud_registry as registry;
pub use shroud_sealed as sealed;

/// SHROUD protocol version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ConfigError, ShroudConfig};
    pub use crate::runtime::{build_node, build_oracle, RuntimeError};
    pub use shroud_fhe::{CipherKind, Ciphertext, ClientKey, FHEConfig, KeyPair, ServerKey};
    pub use shroud_oracle::{OracleRole, RequireProtocol, SigningKey, VerifyingKey};
    pub use shroud_precompiles::{ExecutionContext, PrecompileSet, StaticContext};
    pub use shroud_registry::{CiphertextRegistry, Depth, DepthSet, Handle};
    pub use shroud_sealed::{open_sealed, seal_for_user, DeliveryKeypair};
}
