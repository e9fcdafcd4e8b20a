//! Ordinal counters scoped to sibling groups.
//!
//! CSS `counter-reset`/`counter-increment` semantics are approximated as
//! "new parent = new list": iterating matched nodes in document order, the
//! counter resets to 1 whenever the current node's parent differs from the
//! previous node's parent.

/// Fold state carried across matched nodes: the previous node's parent
/// identity and the running counter value.
#[derive(Debug, Default)]
pub struct CounterTracker {
    last_parent: Option<u64>,
    value: u32,
}

impl CounterTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the counter for a node whose parent has the given identity
    /// key, returning the node's ordinal.
    ///
    /// Returns 1 on the first call, whenever the parent key changes, and for
    /// every node without a parent (parentless nodes always start a new
    /// sequence).
    pub fn advance(&mut self, parent: Option<u64>) -> u32 {
        match parent {
            Some(key) if self.last_parent == Some(key) => self.value += 1,
            _ => self.value = 1,
        }
        self.last_parent = parent;
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_siblings_in_order() {
        let mut tracker = CounterTracker::new();
        assert_eq!(tracker.advance(Some(7)), 1);
        assert_eq!(tracker.advance(Some(7)), 2);
        assert_eq!(tracker.advance(Some(7)), 3);
    }

    #[test]
    fn test_resets_on_new_parent() {
        let mut tracker = CounterTracker::new();
        assert_eq!(tracker.advance(Some(1)), 1);
        assert_eq!(tracker.advance(Some(1)), 2);
        assert_eq!(tracker.advance(Some(2)), 1);
        assert_eq!(tracker.advance(Some(2)), 2);
    }

    #[test]
    fn test_returning_to_earlier_parent_restarts() {
        // Only the immediately previous parent is remembered, matching a
        // linear document-order scan.
        let mut tracker = CounterTracker::new();
        assert_eq!(tracker.advance(Some(1)), 1);
        assert_eq!(tracker.advance(Some(2)), 1);
        assert_eq!(tracker.advance(Some(1)), 1);
    }

    #[test]
    fn test_parentless_nodes_always_restart() {
        let mut tracker = CounterTracker::new();
        assert_eq!(tracker.advance(None), 1);
        assert_eq!(tracker.advance(None), 1);
        assert_eq!(tracker.advance(Some(3)), 1);
        assert_eq!(tracker.advance(Some(3)), 2);
    }
}
