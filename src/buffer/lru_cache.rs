//! Multi-slot node cache with LRU eviction.

use std::collections::HashMap;

use tracing::trace;

use crate::buffer::replacer::LruReplacer;
use crate::buffer::{CacheStats, Frame, NodeCache};
use crate::common::{Error, NodeId, Result};
use crate::storage::node::{Node, NodeKind};
use crate::storage::NodeStore;

/// Holds up to `capacity` nodes, evicting the least recently used one.
///
/// Same write-back contract as [`SingleSlotCache`](crate::SingleSlotCache);
/// with `capacity == 1` the two behave identically.
pub struct LruNodeCache {
    store: NodeStore,
    frames: HashMap<NodeId, Frame>,
    replacer: LruReplacer,
    capacity: usize,
    stats: CacheStats,
}

impl LruNodeCache {
    /// Create a cache holding at most `capacity` nodes.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(store: NodeStore, capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");

        Self {
            store,
            frames: HashMap::with_capacity(capacity),
            replacer: LruReplacer::new(),
            capacity,
            stats: CacheStats::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of resident nodes.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.frames.contains_key(&id)
    }

    /// Evict until there is room for one more node.
    fn make_room(&mut self) -> Result<()> {
        while self.frames.len() >= self.capacity {
            let victim = self
                .replacer
                .evict()
                .ok_or_else(|| Error::logic(NodeId::NULL, "cache full but nothing to evict"))?;
            let Some(frame) = self.frames.remove(&victim) else {
                continue;
            };

            self.stats.record_eviction();
            trace!(node = victim.0, dirty = frame.is_dirty(), "evicting node");
            if frame.is_dirty() {
                if let Err(err) = self.store.write_node(frame.node()) {
                    self.frames.insert(victim, frame);
                    self.replacer.record_access(victim);
                    return Err(err);
                }
                self.stats.record_write();
            }
        }
        Ok(())
    }

    fn insert_frame(&mut self, frame: Frame) -> Result<&mut Node> {
        let id = frame.node_id();
        self.replacer.record_access(id);
        Ok(self.frames.entry(id).or_insert(frame).node_mut())
    }
}

impl NodeCache for LruNodeCache {
    fn access(&mut self, id: NodeId) -> Result<&mut Node> {
        if id.is_null() {
            return Err(Error::logic(id, "null node id"));
        }

        if self.frames.contains_key(&id) {
            self.stats.record_hit();
            self.replacer.record_access(id);
            return match self.frames.get_mut(&id) {
                Some(frame) => Ok(frame.node_mut()),
                None => Err(Error::logic(id, "resident node vanished")),
            };
        }

        self.stats.record_miss();
        self.make_room()?;
        let node = self.store.read_node(id)?;
        self.stats.record_read();
        trace!(node = id.0, "loaded node");
        self.insert_frame(Frame::clean(node))
    }

    fn mark_dirty(&mut self, id: NodeId) -> bool {
        match self.frames.get_mut(&id) {
            Some(frame) => {
                frame.mark_dirty();
                true
            }
            None => false,
        }
    }

    fn create(&mut self, id: NodeId, kind: NodeKind) -> Result<&mut Node> {
        self.make_room()?;

        let node = Node::new(id, kind);
        self.store.write_node(&node)?;
        self.stats.record_write();
        trace!(node = id.0, ?kind, "created node");

        self.insert_frame(Frame::dirty(node))
    }

    fn flush(&mut self) -> Result<()> {
        let mut ids: Vec<NodeId> = self
            .frames
            .values()
            .filter(|frame| frame.is_dirty())
            .map(Frame::node_id)
            .collect();
        ids.sort();

        for id in ids {
            if let Some(frame) = self.frames.get_mut(&id) {
                self.store.write_node(frame.node())?;
                frame.clear_dirty();
                self.stats.record_write();
            }
        }
        Ok(())
    }

    fn store_mut(&mut self) -> &mut NodeStore {
        &mut self.store
    }

    fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_cache(capacity: usize) -> (LruNodeCache, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = NodeStore::open(dir.path().join("index.txt"), false).unwrap();
        (LruNodeCache::new(store, capacity), dir)
    }

    #[test]
    fn test_holds_up_to_capacity() {
        let (mut cache, _dir) = create_test_cache(3);

        for i in 1..=3 {
            cache.create(NodeId::new(i), NodeKind::Leaf).unwrap();
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats().evictions, 0);

        cache.create(NodeId::new(4), NodeKind::Leaf).unwrap();
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(NodeId::new(1)));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let (mut cache, _dir) = create_test_cache(2);

        cache.create(NodeId::new(1), NodeKind::Leaf).unwrap();
        cache.create(NodeId::new(2), NodeKind::Leaf).unwrap();
        cache.access(NodeId::new(1)).unwrap();

        cache.create(NodeId::new(3), NodeKind::Leaf).unwrap();
        assert!(cache.contains(NodeId::new(1)));
        assert!(!cache.contains(NodeId::new(2)));
    }

    #[test]
    fn test_dirty_node_flushed_on_eviction() {
        let (mut cache, _dir) = create_test_cache(1);

        cache
            .update(NodeId::new(1), |_| ())
            .expect_err("node 1 does not exist yet");

        cache.create(NodeId::new(1), NodeKind::Leaf).unwrap().keys.push(11);
        cache.create(NodeId::new(2), NodeKind::Leaf).unwrap();

        assert_eq!(cache.access(NodeId::new(1)).unwrap().keys, vec![11]);
    }

    #[test]
    fn test_flush_writes_all_dirty() {
        let (mut cache, _dir) = create_test_cache(4);

        for i in 1..=3 {
            cache.create(NodeId::new(i), NodeKind::Leaf).unwrap().keys.push(i as i64);
        }
        cache.flush().unwrap();

        for i in 1..=3 {
            let node = cache.store_mut().read_node(NodeId::new(i)).unwrap();
            assert_eq!(node.keys, vec![i as i64]);
        }
    }

    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn test_zero_capacity_panics() {
        let dir = tempdir().unwrap();
        let store = NodeStore::open(dir.path().join("index.txt"), false).unwrap();
        let _ = LruNodeCache::new(store, 0);
    }
}
