//! Call-depth visibility sets

use std::collections::HashSet;

/// Call depth of an executing frame (0 = outermost call)
pub type Depth = usize;

/// Set of call depths at which a registered ciphertext is visible
///
/// Clones are independent: mutating a clone never affects the original.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DepthSet {
    depths: HashSet<Depth>,
}

impl DepthSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set containing a single depth
    pub fn single(depth: Depth) -> Self {
        let mut set = Self::new();
        set.insert(depth);
        set
    }

    /// Mark a depth as visible; inserting an existing depth is a no-op
    pub fn insert(&mut self, depth: Depth) {
        self.depths.insert(depth);
    }

    /// Remove a depth; removing an absent depth is a no-op
    pub fn remove(&mut self, depth: Depth) {
        self.depths.remove(&depth);
    }

    /// Whether the given depth is visible
    pub fn contains(&self, depth: Depth) -> bool {
        self.depths.contains(&depth)
    }

    /// Number of visible depths
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// Whether no depth is visible
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Iterate over the visible depths (unordered)
    pub fn iter(&self) -> impl Iterator<Item = Depth> + '_ {
        self.depths.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut set = DepthSet::new();
        assert!(set.is_empty());
        assert!(!set.contains(0));

        set.insert(0);
        set.insert(3);
        assert!(set.contains(0));
        assert!(set.contains(3));
        assert!(!set.contains(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = DepthSet::new();
        set.insert(5);
        set.insert(5);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut set = DepthSet::single(1);
        set.remove(9);
        assert_eq!(set.len(), 1);

        set.remove(1);
        assert!(set.is_empty());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = DepthSet::single(0);
        let mut copy = original.clone();

        copy.insert(1);
        original.remove(0);

        assert!(!original.contains(0));
        assert!(copy.contains(0));
        assert!(copy.contains(1));
        assert!(!original.contains(1));
    }
}
