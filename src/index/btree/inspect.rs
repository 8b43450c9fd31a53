//! Read-only views of the tree: leaf scans, structural checks, dumps.

use std::fmt::{Display, Write};

use crate::buffer::NodeCache;
use crate::common::{Error, Key, NodeId, RecordId, Result};
use crate::storage::node::{Node, NodeBody};

use super::{leaf_body, BPlusTree};

/// State carried through [`BPlusTree::verify`].
#[derive(Default)]
struct Walk {
    leaf_depth: Option<usize>,
    leaves: Vec<NodeId>,
}

impl<C: NodeCache> BPlusTree<C> {
    /// Clone of node `id`, loaded through the cache.
    pub fn node(&mut self, id: NodeId) -> Result<Node> {
        self.nodes.access(id).map(|node| node.clone())
    }

    /// Leaf ids in chain order, starting at the leftmost leaf.
    pub fn leaf_ids(&mut self) -> Result<Vec<NodeId>> {
        let mut ids = Vec::new();
        let Some(mut current) = self.leftmost_leaf()? else {
            return Ok(ids);
        };

        let max_leaves = self.header.next_node_id.0 as usize;
        loop {
            if ids.len() >= max_leaves {
                return Err(Error::logic(current, "leaf chain loops"));
            }
            ids.push(current);
            let next = leaf_body(self.nodes.access(current)?)?.next;
            if next.is_null() {
                return Ok(ids);
            }
            current = next;
        }
    }

    /// Every `(key, record)` pair in leaf-chain order.
    pub fn leaf_entries(&mut self) -> Result<Vec<(Key, RecordId)>> {
        let mut entries = Vec::new();
        for id in self.leaf_ids()? {
            let node = self.nodes.access(id)?;
            let leaf = leaf_body(node)?;
            entries.extend(node.keys.iter().copied().zip(leaf.records.iter().copied()));
        }
        Ok(entries)
    }

    /// Check the structural invariants of the whole tree.
    ///
    /// - keys ascend within every node and stay within the separators above
    /// - no node holds more than `order - 1` keys
    /// - internal nodes have one more child than keys
    /// - all leaves sit at the same depth
    /// - the leaf chain visits the leaves in tree order with matching
    ///   `prev` links
    ///
    /// Nodes written under a larger order fail the key-count check.
    pub fn verify(&mut self) -> Result<()> {
        let root = self.header.root;
        if root.is_null() {
            return Ok(());
        }

        let mut walk = Walk::default();
        self.verify_node(root, (None, None), 0, &mut walk)?;

        let chain = self.leaf_ids()?;
        if chain != walk.leaves {
            return Err(Error::logic(root, "leaf chain does not follow tree order"));
        }

        let mut prev = NodeId::NULL;
        for id in chain {
            let actual = leaf_body(self.nodes.access(id)?)?.prev;
            if actual != prev {
                return Err(Error::logic(
                    id,
                    format!("prev link is {}, expected {}", actual, prev),
                ));
            }
            prev = id;
        }
        Ok(())
    }

    fn verify_node(
        &mut self,
        id: NodeId,
        (low, high): (Option<Key>, Option<Key>),
        depth: usize,
        walk: &mut Walk,
    ) -> Result<()> {
        let node = self.node(id)?;

        if node.num_keys() > self.max_keys() {
            return Err(Error::logic(
                id,
                format!("{} keys exceed the maximum of {}", node.num_keys(), self.max_keys()),
            ));
        }
        if node.keys.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(Error::logic(id, "keys out of order"));
        }
        let out_of_range = node.keys.iter().any(|&key| {
            low.is_some_and(|low| key < low) || high.is_some_and(|high| key > high)
        });
        if out_of_range {
            return Err(Error::logic(id, "key outside its parent's separators"));
        }

        match &node.body {
            NodeBody::Leaf(leaf) => {
                if leaf.records.len() != node.num_keys() {
                    return Err(Error::logic(id, "record count differs from key count"));
                }
                match walk.leaf_depth {
                    Some(expected) if expected != depth => {
                        return Err(Error::logic(
                            id,
                            format!("leaf at depth {}, expected {}", depth, expected),
                        ));
                    }
                    Some(_) => {}
                    None => walk.leaf_depth = Some(depth),
                }
                walk.leaves.push(id);
            }
            NodeBody::Internal(internal) => {
                let children = &internal.children;
                if children.len() != node.num_keys() + 1 {
                    return Err(Error::logic(
                        id,
                        format!("{} children for {} keys", children.len(), node.num_keys()),
                    ));
                }
                for (index, &child) in children.iter().enumerate() {
                    let child_low = index.checked_sub(1).map(|i| node.keys[i]).or(low);
                    let child_high = node.keys.get(index).copied().or(high);
                    self.verify_node(child, (child_low, child_high), depth + 1, walk)?;
                }
            }
        }
        Ok(())
    }

    /// Render the tree, one node per line in pre-order, indented by depth.
    ///
    /// ```text
    /// [I:3] keys=(2)
    ///   [L:1] keys=(1) records=(10) prev=0 next=2
    ///   [L:2] keys=(2,3) records=(20,30) prev=1 next=0
    /// ```
    pub fn dump(&mut self) -> Result<String> {
        let mut out = String::new();
        if self.header.root.is_null() {
            out.push_str("<empty>\n");
            return Ok(out);
        }
        self.dump_node(self.header.root, 0, &mut out)?;
        Ok(out)
    }

    fn dump_node(&mut self, id: NodeId, depth: usize, out: &mut String) -> Result<()> {
        let node = self.node(id)?;
        let indent = "  ".repeat(depth);

        match &node.body {
            NodeBody::Leaf(leaf) => {
                let _ = writeln!(
                    out,
                    "{}[L:{}] keys=({}) records=({}) prev={} next={}",
                    indent,
                    id.0,
                    join(&node.keys),
                    join(&leaf.records),
                    leaf.prev.0,
                    leaf.next.0
                );
            }
            NodeBody::Internal(internal) => {
                let _ = writeln!(out, "{}[I:{}] keys=({})", indent, id.0, join(&node.keys));
                for &child in &internal.children {
                    self.dump_node(child, depth + 1, out)?;
                }
            }
        }
        Ok(())
    }
}

fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
