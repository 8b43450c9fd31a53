//! Root-to-leaf descent.
//!
//! # Routing
//! At an internal node the descent takes the child at the first key index
//! `i` with `keys[i] >= key`, or the last child if there is none. A key
//! equal to a separator therefore goes to the **left** of that separator.
//! Inserts and searches route the same way, so every copy of a key sits in
//! the leaf reached by the descent or in the leaves that follow it.

use crate::buffer::NodeCache;
use crate::common::{Error, Key, NodeId, Result};
use crate::storage::node::Node;

use super::BPlusTree;

/// Result of a descent: the leaf reached and every node visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descent {
    pub leaf: NodeId,
    /// Visited ids, root first, `leaf` last.
    pub path: Vec<NodeId>,
}

impl<C: NodeCache> BPlusTree<C> {
    /// Walk from the root to the leaf responsible for `key`.
    ///
    /// Returns `None` for an empty tree.
    ///
    /// # Errors
    /// - `Error::Logic` if a child index is out of range or a child id is null
    /// - `Error::Parse` / `Error::Io` if a node on the way cannot be loaded
    pub fn descend(&mut self, key: Key) -> Result<Option<Descent>> {
        if self.header.root.is_null() {
            return Ok(None);
        }

        let mut current = self.header.root;
        let mut path = vec![current];
        loop {
            let node = self.nodes.access(current)?;
            if node.is_leaf() {
                break;
            }
            current = route(node, node.lower_bound(key))?;
            path.push(current);
        }

        Ok(Some(Descent {
            leaf: current,
            path,
        }))
    }

    /// Walk down the first children to the leftmost leaf.
    pub fn leftmost_leaf(&mut self) -> Result<Option<NodeId>> {
        if self.header.root.is_null() {
            return Ok(None);
        }

        let mut current = self.header.root;
        loop {
            let node = self.nodes.access(current)?;
            if node.is_leaf() {
                return Ok(Some(current));
            }
            current = route(node, 0)?;
        }
    }
}

/// Child id at `index` of internal `node`.
fn route(node: &Node, index: usize) -> Result<NodeId> {
    let internal = node
        .as_internal()
        .ok_or_else(|| Error::logic(node.id, "routing through a leaf"))?;

    match internal.children.get(index) {
        Some(child) if !child.is_null() => Ok(*child),
        Some(_) => Err(Error::logic(node.id, format!("null child at index {}", index))),
        None => Err(Error::logic(
            node.id,
            format!(
                "child index {} out of range ({} children)",
                index,
                internal.children.len()
            ),
        )),
    }
}
