//! Read-only window onto the host VM.

use shroud_registry::Depth;

/// The execution state a precompile is allowed to see.
///
/// Precompiles need exactly one fact from the VM: how deep the current
/// call frame is, so visibility checks scope handles to the caller.
/// Keeping the trait this narrow keeps VM internals out of reach.
pub trait ExecutionContext {
    /// Call depth of the frame invoking the precompile. Top-level
    /// transaction code runs at depth 0.
    fn call_depth(&self) -> Depth;
}

/// Fixed-depth context for tests and single-frame embeddings.
#[derive(Debug, Clone, Copy)]
pub struct StaticContext {
    depth: Depth,
}

impl StaticContext {
    pub fn new(depth: Depth) -> Self {
        Self { depth }
    }
}

impl ExecutionContext for StaticContext {
    fn call_depth(&self) -> Depth {
        self.depth
    }
}
