//! The process-wide verified-ciphertext store

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use shroud_fhe::Ciphertext;

use crate::depth::{Depth, DepthSet};
use crate::handle::Handle;

/// A registered ciphertext and the depths at which it is visible
///
/// The ciphertext instance is fixed at registration; later imports of the
/// same bytes only widen the depth set.
struct VerifiedCiphertext {
    ciphertext: Arc<Ciphertext>,
    depths: DepthSet,
}

/// Content-addressed registry of verified ciphertexts
///
/// All operations complete under a single acquisition of one internal lock,
/// so readers always observe a consistent pairing of ciphertext and depth
/// set. The registry never evicts; an external collector may consult `len`
/// to decide when the host should act.
#[derive(Default)]
pub struct CiphertextRegistry {
    entries: RwLock<HashMap<Handle, VerifiedCiphertext>>,
}

impl CiphertextRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ciphertext without granting visibility at any depth
    ///
    /// If the same bytes are already registered the existing instance is
    /// kept and its handle returned; the duplicate is dropped.
    pub fn intern(&self, ciphertext: Ciphertext) -> Handle {
        let handle = Handle::compute(&ciphertext);
        let mut entries = self.entries.write();

        entries.entry(handle).or_insert_with(|| VerifiedCiphertext {
            ciphertext: Arc::new(ciphertext),
            depths: DepthSet::new(),
        });

        handle
    }

    /// Register a ciphertext and mark it visible at `depth`, atomically
    pub fn import_at_depth(&self, ciphertext: Ciphertext, depth: Depth) -> Handle {
        let handle = Handle::compute(&ciphertext);
        let mut entries = self.entries.write();

        entries
            .entry(handle)
            .and_modify(|entry| entry.depths.insert(depth))
            .or_insert_with(|| VerifiedCiphertext {
                ciphertext: Arc::new(ciphertext),
                depths: DepthSet::single(depth),
            });

        handle
    }

    /// Resolve a handle to its canonical ciphertext, ignoring visibility
    pub fn lookup(&self, handle: &Handle) -> Option<Arc<Ciphertext>> {
        let entries = self.entries.read();
        entries.get(handle).map(|entry| Arc::clone(&entry.ciphertext))
    }

    /// Resolve a handle only if it is visible at `depth`
    pub fn get_verified(&self, handle: &Handle, depth: Depth) -> Option<Arc<Ciphertext>> {
        let entries = self.entries.read();
        let entry = entries.get(handle)?;
        if !entry.depths.contains(depth) {
            return None;
        }
        Some(Arc::clone(&entry.ciphertext))
    }

    /// Mark an already-registered handle visible at `depth`
    ///
    /// # Panics
    ///
    /// Panics if the handle is not registered. Callers obtain handles from
    /// `intern` or `import_at_depth`; presenting an unknown handle here is
    /// a bug in the execution layer, not a recoverable condition.
    pub fn mark_visible(&self, handle: &Handle, depth: Depth) {
        let mut entries = self.entries.write();
        let entry = entries
            .get_mut(handle)
            .unwrap_or_else(|| panic!("mark_visible on unregistered handle {}", handle));
        entry.depths.insert(depth);
    }

    /// Whether the handle is registered and visible at `depth`
    pub fn is_visible(&self, handle: &Handle, depth: Depth) -> bool {
        let entries = self.entries.read();
        entries
            .get(handle)
            .map(|entry| entry.depths.contains(depth))
            .unwrap_or(false)
    }

    /// Snapshot of the depths at which a handle is visible
    pub fn visible_depths(&self, handle: &Handle) -> Option<DepthSet> {
        let entries = self.entries.read();
        entries.get(handle).map(|entry| entry.depths.clone())
    }

    /// Number of registered ciphertexts
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the registry holds no ciphertexts
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
