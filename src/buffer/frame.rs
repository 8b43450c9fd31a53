//! Frame - a cache slot holding one node.
//!
//! A [`Frame`] holds a [`Node`] plus the dirty flag needed for write-back.

use crate::common::NodeId;
use crate::storage::node::Node;

/// A resident node and whether it differs from its line on disk.
#[derive(Debug)]
pub struct Frame {
    node: Node,
    is_dirty: bool,
}

impl Frame {
    /// A node just loaded from disk.
    pub fn clean(node: Node) -> Self {
        Self {
            node,
            is_dirty: false,
        }
    }

    /// A node that still has to be written back.
    pub fn dirty(node: Node) -> Self {
        Self {
            node,
            is_dirty: true,
        }
    }

    #[inline]
    pub fn node_id(&self) -> NodeId {
        self.node.id
    }

    #[inline]
    pub fn node(&self) -> &Node {
        &self.node
    }

    #[inline]
    pub fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    /// Mark the frame as dirty (modified).
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    /// Clear the dirty flag (after flushing to disk).
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.is_dirty = false;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }
}
