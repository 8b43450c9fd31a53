//! Index file header.
//!
//! The first [`HEADER_LINES`] lines of the index file hold the tree state:
//! ```text
//! ROOT_ID:<id>            (0 = empty tree)
//! NEXT_NODE_ID:<counter>  (next id to hand out)
//! ```
//! The header is read once when a tree is opened and rewritten when it is
//! closed; nodes in between are written on their own lines.

use crate::common::config::{HEADER_LINES, NEXT_NODE_ID_PREFIX, ROOT_ID_PREFIX};
use crate::common::{Error, NodeId, Result};

/// Tree state persisted in the header lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeHeader {
    /// Root node, or `NodeId::NULL` for an empty tree.
    pub root: NodeId,
    /// Id the next created node receives.
    pub next_node_id: NodeId,
}

impl Default for TreeHeader {
    fn default() -> Self {
        Self {
            root: NodeId::NULL,
            next_node_id: NodeId::FIRST,
        }
    }
}

impl TreeHeader {
    /// Hand out the next node id, advancing the counter.
    ///
    /// # Errors
    /// Returns `Error::Logic` when the counter cannot advance past the id;
    /// the counter is left unchanged.
    pub fn allocate_node_id(&mut self) -> Result<NodeId> {
        let id = self.next_node_id;
        self.next_node_id = id
            .checked_next()
            .ok_or_else(|| Error::logic(id, "node id space exhausted"))?;
        Ok(id)
    }

    /// Render the header lines, in file order.
    pub fn to_lines(&self) -> [String; HEADER_LINES] {
        [
            format!("{}{}", ROOT_ID_PREFIX, self.root.0),
            format!("{}{}", NEXT_NODE_ID_PREFIX, self.next_node_id.0),
        ]
    }

    /// Parse the two header lines.
    ///
    /// # Errors
    /// Returns `Error::Parse` if a prefix is missing or a value is not numeric.
    pub fn from_lines(root_line: &str, next_line: &str) -> Result<Self> {
        let root = parse_prefixed(root_line, ROOT_ID_PREFIX, 1)?;
        let next_node_id = parse_prefixed(next_line, NEXT_NODE_ID_PREFIX, 2)?;

        if next_node_id.is_null() {
            return Err(Error::parse(2, "next node id must be positive"));
        }
        if !root.is_null() && root >= next_node_id {
            return Err(Error::parse(
                1,
                format!("root {} was never allocated (next is {})", root.0, next_node_id.0),
            ));
        }

        Ok(Self { root, next_node_id })
    }
}

fn parse_prefixed(line: &str, prefix: &str, line_number: usize) -> Result<NodeId> {
    let value = line
        .strip_prefix(prefix)
        .ok_or_else(|| Error::parse(line_number, format!("expected {:?} prefix", prefix)))?;
    value
        .trim()
        .parse()
        .map(NodeId::new)
        .map_err(|_| Error::parse(line_number, format!("non-numeric value {:?}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_header() {
        let header = TreeHeader::default();
        assert!(header.root.is_null());
        assert_eq!(header.next_node_id, NodeId::new(1));
        assert_eq!(header.to_lines(), ["ROOT_ID:0", "NEXT_NODE_ID:1"]);
    }

    #[test]
    fn test_allocate_is_monotonic() {
        let mut header = TreeHeader::default();
        assert_eq!(header.allocate_node_id().unwrap(), NodeId::new(1));
        assert_eq!(header.allocate_node_id().unwrap(), NodeId::new(2));
        assert_eq!(header.next_node_id, NodeId::new(3));
    }

    #[test]
    fn test_allocate_at_end_of_id_space() {
        let mut header = TreeHeader::from_lines("ROOT_ID:0", "NEXT_NODE_ID:4294967295").unwrap();

        assert!(matches!(header.allocate_node_id(), Err(Error::Logic { .. })));
        assert_eq!(header.next_node_id, NodeId::new(u32::MAX));
    }

    #[test]
    fn test_roundtrip() {
        let header = TreeHeader {
            root: NodeId::new(7),
            next_node_id: NodeId::new(12),
        };
        let [root_line, next_line] = header.to_lines();
        assert_eq!(root_line, "ROOT_ID:7");
        assert_eq!(next_line, "NEXT_NODE_ID:12");
        assert_eq!(TreeHeader::from_lines(&root_line, &next_line).unwrap(), header);
    }

    #[test]
    fn test_malformed_header() {
        assert!(TreeHeader::from_lines("ROOT:1", "NEXT_NODE_ID:2").is_err());
        assert!(TreeHeader::from_lines("ROOT_ID:x", "NEXT_NODE_ID:2").is_err());
        assert!(TreeHeader::from_lines("ROOT_ID:1", "NEXT_NODE_ID:").is_err());
        assert!(TreeHeader::from_lines("ROOT_ID:0", "NEXT_NODE_ID:0").is_err());
    }

    #[test]
    fn test_root_beyond_counter_rejected() {
        match TreeHeader::from_lines("ROOT_ID:5", "NEXT_NODE_ID:5") {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 1),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }
}
