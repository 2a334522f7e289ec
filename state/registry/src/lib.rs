//! Shroud Ciphertext Registry
//!
//! Process-wide store of every ciphertext the execution layer has verified,
//! addressed by the blake3 hash of the ciphertext bytes. Contracts and the
//! host VM exchange 32-byte handles; only this registry resolves a handle
//! back to the ciphertext it names.
//!
//! Each entry also carries the set of call depths at which the handle is
//! visible. A handle that merely *exists* is not enough to use it: the
//! executing frame must have imported or produced it, which stops callees
//! from smuggling handles they found in calldata past verification.

mod depth;
mod handle;
mod registry;

pub use depth::{Depth, DepthSet};
pub use handle::Handle;
pub use registry::CiphertextRegistry;
