//! Node - the unit of persistence of the tree.

use crate::common::{Key, NodeId, RecordId};

/// Variant tag of a node.
///
/// The tag character is the first field of a serialized node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Holds keys and their record pointers; linked to its neighbors.
    Leaf,
    /// Holds separator keys and child node ids.
    Internal,
}

impl NodeKind {
    /// Tag written to the index file.
    pub fn tag(&self) -> char {
        match self {
            NodeKind::Leaf => 'L',
            NodeKind::Internal => 'I',
        }
    }

    /// Parse a tag, returning `None` for unknown values.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "L" => Some(NodeKind::Leaf),
            "I" => Some(NodeKind::Internal),
            _ => None,
        }
    }
}

/// Leaf payload: one record per key plus the leaf chain links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafBody {
    /// Record pointers, parallel to the node's keys.
    pub records: Vec<RecordId>,
    /// Previous leaf in key order, or `NodeId::NULL`.
    pub prev: NodeId,
    /// Next leaf in key order, or `NodeId::NULL`.
    pub next: NodeId,
}

/// Internal payload: `keys.len() + 1` children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternalBody {
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeBody {
    Leaf(LeafBody),
    Internal(InternalBody),
}

/// A tree node as held in the buffer cache.
///
/// Nodes refer to each other only through [`NodeId`]s; the store and cache
/// resolve ids to nodes. There are no in-memory links between nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// Ascending, duplicates allowed.
    pub keys: Vec<Key>,
    pub body: NodeBody,
}

impl Node {
    /// Create an empty node of the given kind.
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        let body = match kind {
            NodeKind::Leaf => NodeBody::Leaf(LeafBody::default()),
            NodeKind::Internal => NodeBody::Internal(InternalBody::default()),
        };
        Self {
            id,
            keys: Vec::new(),
            body,
        }
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::Leaf(_) => NodeKind::Leaf,
            NodeBody::Internal(_) => NodeKind::Internal,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.body, NodeBody::Leaf(_))
    }

    #[inline]
    pub fn num_keys(&self) -> usize {
        self.keys.len()
    }

    /// First position whose key is `>= key` (`num_keys()` if none).
    #[inline]
    pub fn lower_bound(&self, key: Key) -> usize {
        self.keys.partition_point(|&k| k < key)
    }

    pub fn as_leaf(&self) -> Option<&LeafBody> {
        match &self.body {
            NodeBody::Leaf(leaf) => Some(leaf),
            NodeBody::Internal(_) => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut LeafBody> {
        match &mut self.body {
            NodeBody::Leaf(leaf) => Some(leaf),
            NodeBody::Internal(_) => None,
        }
    }

    pub fn as_internal(&self) -> Option<&InternalBody> {
        match &self.body {
            NodeBody::Internal(internal) => Some(internal),
            NodeBody::Leaf(_) => None,
        }
    }

    pub fn as_internal_mut(&mut self) -> Option<&mut InternalBody> {
        match &mut self.body {
            NodeBody::Internal(internal) => Some(internal),
            NodeBody::Leaf(_) => None,
        }
    }
}
