//! Precompile entry points for encrypted computation.
//!
//! The host VM executes contracts over handles, never over ciphertexts.
//! This crate is the boundary where handle-shaped call data from the VM
//! turns into verified ciphertext operations: operands are resolved
//! against the registry at the caller's depth, results are interned and
//! handed back as fresh handles, and the two plaintext-adjacent exits
//! (branch conditions, sealed outputs) go through their own protocols.
//!
//! # Key Features:
//! - **Operand resolution**: fixed-layout call data decoded and checked
//!   against registry visibility, with errors naming the offending side
//! - **Verify/compute/require/seal**: the representative precompile set,
//!   from ciphertext ingestion to sealed delivery
//! - **Role-aware**: one [`PrecompileSet`] serves both oracle and node
//!   deployments; only the require path behaves differently
//!
//! # Architecture:
//! Registry guards are never held across FHE work or store I/O. Every
//! entry point copies its `Arc<Ciphertext>` operands out of the registry
//! first, then computes, then re-enters the registry once to intern the
//! result.

pub mod errors;

mod context;
mod encoding;
mod operands;
mod ops;

pub use context::{ExecutionContext, StaticContext};
pub use encoding::{length_prefixed, LENGTH_PREFIX_SIZE};
pub use errors::{PrecompileError, PrecompileResult};
pub use operands::{resolve_binary_operands, OperandSide, BINARY_OPERAND_LEN};
pub use ops::PrecompileSet;
