//! Node identifier type.

use std::fmt;

/// Identifies a tree node, and through it the node's line in the index file.
///
/// Ids are handed out from a monotonically increasing counter and never
/// reused. `0` is reserved as the "no node" sentinel, which is also what the
/// file format stores for a missing leaf neighbor.
///
/// # Example
/// ```
/// use lineindex::NodeId;
///
/// let node_id = NodeId::new(42);
/// assert!(!node_id.is_null());
/// assert!(NodeId::NULL.is_null());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Absent/null node.
    pub const NULL: NodeId = NodeId(0);

    /// First id handed out by a fresh index.
    pub const FIRST: NodeId = NodeId(1);

    /// Create a new NodeId.
    #[inline]
    pub fn new(id: u32) -> Self {
        NodeId(id)
    }

    /// Check if this is the null sentinel.
    #[inline]
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    /// The id after this one, or `None` once the id space is used up.
    #[inline]
    pub fn checked_next(&self) -> Option<Self> {
        self.0.checked_add(1).map(NodeId)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Node(NULL)")
        } else {
            write!(f, "Node({})", self.0)
        }
    }
}
