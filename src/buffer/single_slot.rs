//! Single-slot node cache - at most one index node in memory.
//!
//! The [`SingleSlotCache`] provides:
//! - One resident node regardless of tree size
//! - Write-back of the resident node before it is displaced
//! - Immediate persistence of newly created nodes

use tracing::trace;

use crate::buffer::{CacheStats, Frame, NodeCache};
use crate::common::{Error, NodeId, Result};
use crate::storage::node::{Node, NodeKind};
use crate::storage::NodeStore;

/// A node cache that keeps exactly one node resident.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────┐
/// │              SingleSlotCache              │
/// │  ┌─────────────────┐   ┌──────────────┐  │
/// │  │ slot: Option<   │   │  NodeStore   │  │
/// │  │   Frame{node,   │──▶│ (index file) │  │
/// │  │   dirty}>       │   └──────────────┘  │
/// │  └─────────────────┘                      │
/// └──────────────────────────────────────────┘
/// ```
///
/// Any access to a different node evicts the resident one, writing it
/// first if dirty.
pub struct SingleSlotCache {
    store: NodeStore,
    slot: Option<Frame>,
    stats: CacheStats,
}

impl SingleSlotCache {
    pub fn new(store: NodeStore) -> Self {
        Self {
            store,
            slot: None,
            stats: CacheStats::default(),
        }
    }

    /// Id of the resident node, if any.
    pub fn resident(&self) -> Option<NodeId> {
        self.slot.as_ref().map(Frame::node_id)
    }

    /// Whether the resident node has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.slot.as_ref().is_some_and(Frame::is_dirty)
    }

    /// Empty the slot, writing the resident node back if dirty.
    fn evict(&mut self) -> Result<()> {
        if let Some(frame) = self.slot.take() {
            self.stats.record_eviction();
            trace!(node = frame.node_id().0, dirty = frame.is_dirty(), "evicting node");
            if frame.is_dirty() {
                // Put the frame back if the write fails so the node is not lost.
                if let Err(err) = self.store.write_node(frame.node()) {
                    self.slot = Some(frame);
                    return Err(err);
                }
                self.stats.record_write();
            }
        }
        Ok(())
    }

    fn resident_node(&mut self) -> Result<&mut Node> {
        match self.slot.as_mut() {
            Some(frame) => Ok(frame.node_mut()),
            None => Err(Error::logic(NodeId::NULL, "node slot is empty")),
        }
    }
}

impl NodeCache for SingleSlotCache {
    fn access(&mut self, id: NodeId) -> Result<&mut Node> {
        if id.is_null() {
            return Err(Error::logic(id, "null node id"));
        }

        if self.resident() == Some(id) {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
            self.evict()?;
            let node = self.store.read_node(id)?;
            self.stats.record_read();
            trace!(node = id.0, "loaded node");
            self.slot = Some(Frame::clean(node));
        }

        self.resident_node()
    }

    fn mark_dirty(&mut self, id: NodeId) -> bool {
        match self.slot.as_mut() {
            Some(frame) if frame.node_id() == id => {
                frame.mark_dirty();
                true
            }
            _ => false,
        }
    }

    fn create(&mut self, id: NodeId, kind: NodeKind) -> Result<&mut Node> {
        self.evict()?;

        let node = Node::new(id, kind);
        self.store.write_node(&node)?;
        self.stats.record_write();
        trace!(node = id.0, ?kind, "created node");

        self.slot = Some(Frame::dirty(node));
        self.resident_node()
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(frame) = self.slot.as_mut() {
            if frame.is_dirty() {
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
