//! LRU (Least Recently Used) replacement policy.

use std::collections::{HashSet, VecDeque};

use crate::common::NodeId;

/// Evicts the node whose last access is the oldest.
///
/// Every resident node is evictable: the tree never holds on to a node
/// across cache calls, so there is no pinning.
pub struct LruReplacer {
    /// Node IDs in access order (front = least recently used).
    queue: VecDeque<NodeId>,

    /// Set for O(1) membership check.
    tracked: HashSet<NodeId>,
}

impl LruReplacer {
    /// Create a new LRU replacer.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            tracked: HashSet::new(),
        }
    }

    /// Record that a node was accessed, making it the most recently used.
    pub fn record_access(&mut self, node_id: NodeId) {
        if !self.tracked.insert(node_id) {
            self.queue.retain(|&id| id != node_id);
        }
        self.queue.push_back(node_id);
    }

    /// Select a victim, or `None` if nothing is tracked.
    pub fn evict(&mut self) -> Option<NodeId> {
        let victim = self.queue.pop_front()?;
        self.tracked.remove(&victim);
        Some(victim)
    }

    /// Number of tracked nodes.
    pub fn size(&self) -> usize {
        self.tracked.len()
    }
}

impl Default for LruReplacer {
    fn default() -> Self {
        Self::new()
    }
}
