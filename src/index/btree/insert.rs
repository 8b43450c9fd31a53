//! Insertion with leaf and internal splits.
//!
//! # Split rules
//! - Leaf: the merged `order` entries are divided so the left leaf keeps
//!   `floor(order / 2)` and the new right leaf takes the rest. The right
//!   leaf's first key is copied up as the separator.
//! - Internal: with `s = (order - 1) / 2`, the left node keeps `keys[..s]`
//!   and `children[..=s]`, `keys[s]` moves up, the new right node takes the
//!   remainder.
//! - A split of the root allocates a new internal root with two children.
//!
//! Every created node gets a fresh id from the header counter. Creating a
//! node may evict anything else from the cache, so nodes are re-fetched by
//! id after each `create`.

use tracing::{debug, trace, warn};

use crate::buffer::NodeCache;
use crate::common::{Error, Key, NodeId, RecordId, Result};
use crate::storage::node::NodeKind;

use super::{internal_body, internal_body_mut, leaf_body, leaf_body_mut, BPlusTree, Descent};

impl<C: NodeCache> BPlusTree<C> {
    /// Insert the pair `(key, record)`.
    ///
    /// Duplicate keys are allowed; a new duplicate is placed before the
    /// equal keys already in its leaf.
    ///
    /// # Errors
    /// Any failure aborts the insert and is logged. Nodes already modified
    /// stay as they are; the tree is not rolled back.
    pub fn insert(&mut self, key: Key, record: RecordId) -> Result<()> {
        self.insert_entry(key, record).map_err(|err| {
            warn!(key, record, %err, "insert aborted");
            err
        })
    }

    fn insert_entry(&mut self, key: Key, record: RecordId) -> Result<()> {
        let Some(Descent { leaf, mut path }) = self.descend(key)? else {
            return self.start_tree(key, record);
        };
        path.pop();

        let max_keys = self.max_keys();
        let node = self.nodes.access(leaf)?;
        let pos = node.lower_bound(key);

        if node.num_keys() < max_keys {
            leaf_body_mut(node)?.records.insert(pos, record);
            node.keys.insert(pos, key);
            self.nodes.mark_dirty(leaf);
            trace!(key, record, leaf = leaf.0, "inserted into leaf");
            return Ok(());
        }

        let body = leaf_body(node)?;
        let mut records = body.records.clone();
        let old_next = body.next;
        let mut keys = node.keys.clone();
        keys.insert(pos, key);
        records.insert(pos, record);

        self.split_leaf(leaf, keys, records, old_next, path)
    }

    /// First insert into an empty tree: a single leaf becomes the root.
    fn start_tree(&mut self, key: Key, record: RecordId) -> Result<()> {
        let root_id = self.header.allocate_node_id()?;
        let root = self.nodes.create(root_id, NodeKind::Leaf)?;
        leaf_body_mut(root)?.records.push(record);
        root.keys.push(key);
        self.nodes.mark_dirty(root_id);

        self.header.root = root_id;
        debug!(root = root_id.0, "created root leaf");
        Ok(())
    }

    /// Split an overflowing leaf whose merged contents are `keys`/`records`.
    fn split_leaf(
        &mut self,
        left_id: NodeId,
        mut keys: Vec<Key>,
        mut records: Vec<RecordId>,
        old_next: NodeId,
        path: Vec<NodeId>,
    ) -> Result<()> {
        let left_len = keys.len() / 2;
        let right_keys = keys.split_off(left_len);
        let right_records = records.split_off(left_len);
        let separator = *right_keys
            .first()
            .ok_or_else(|| Error::logic(left_id, "leaf split left the right half empty"))?;

        let right_id = self.header.allocate_node_id()?;
        let right = self.nodes.create(right_id, NodeKind::Leaf)?;
        let body = leaf_body_mut(right)?;
        body.records = right_records;
        body.prev = left_id;
        body.next = old_next;
        right.keys = right_keys;
        self.nodes.mark_dirty(right_id);

        let left = self.nodes.access(left_id)?;
        let body = leaf_body_mut(left)?;
        body.records = records;
        body.next = right_id;
        left.keys = keys;
        self.nodes.mark_dirty(left_id);

        if !old_next.is_null() {
            let neighbor = self.nodes.access(old_next)?;
            leaf_body_mut(neighbor)?.prev = right_id;
            self.nodes.mark_dirty(old_next);
        }

        debug!(left = left_id.0, right = right_id.0, separator, "split leaf");
        self.insert_into_parent(left_id, separator, right_id, path)
    }

    /// Register `right_id` as the sibling after `left_id`, separated by
    /// `separator`. `path` holds the ancestors of `left_id`, root first.
    fn insert_into_parent(
        &mut self,
        left_id: NodeId,
        separator: Key,
        right_id: NodeId,
        mut path: Vec<NodeId>,
    ) -> Result<()> {
        let Some(parent_id) = path.pop() else {
            return self.grow_root(left_id, separator, right_id);
        };

        let max_keys = self.max_keys();
        let parent = self.nodes.access(parent_id)?;
        // Position by child id: a key search is ambiguous with duplicates.
        let index = internal_body(parent)?
            .children
            .iter()
            .position(|&child| child == left_id)
            .ok_or_else(|| Error::logic(parent_id, format!("{} is not a child", left_id)))?;

        if parent.num_keys() < max_keys {
            internal_body_mut(parent)?.children.insert(index + 1, right_id);
            parent.keys.insert(index, separator);
            self.nodes.mark_dirty(parent_id);
            trace!(parent = parent_id.0, child = right_id.0, separator, "linked child");
            return Ok(());
        }

        let mut children = internal_body(parent)?.children.clone();
        let mut keys = parent.keys.clone();
        children.insert(index + 1, right_id);
        keys.insert(index, separator);

        self.split_internal(parent_id, keys, children, path)
    }

    /// Split an overflowing internal node whose merged contents are
    /// `keys`/`children`.
    fn split_internal(
        &mut self,
        node_id: NodeId,
        mut keys: Vec<Key>,
        mut children: Vec<NodeId>,
        path: Vec<NodeId>,
    ) -> Result<()> {
        let split_at = (self.order() - 1) / 2;
        let right_keys = keys.split_off(split_at + 1);
        let right_children = children.split_off(split_at + 1);
        let promoted = keys
            .pop()
            .ok_or_else(|| Error::logic(node_id, "internal split has no key to promote"))?;

        let sibling_id = self.header.allocate_node_id()?;
        let sibling = self.nodes.create(sibling_id, NodeKind::Internal)?;
        internal_body_mut(sibling)?.children = right_children;
        sibling.keys = right_keys;
        self.nodes.mark_dirty(sibling_id);

        let node = self.nodes.access(node_id)?;
        internal_body_mut(node)?.children = children;
        node.keys = keys;
        self.nodes.mark_dirty(node_id);

        debug!(left = node_id.0, right = sibling_id.0, promoted, "split internal node");
        self.insert_into_parent(node_id, promoted, sibling_id, path)
    }

    /// Replace the root with an internal node over `left_id` and `right_id`.
    fn grow_root(&mut self, left_id: NodeId, separator: Key, right_id: NodeId) -> Result<()> {
        let root_id = self.header.allocate_node_id()?;
        let root = self.nodes.create(root_id, NodeKind::Internal)?;
        internal_body_mut(root)?.children = vec![left_id, right_id];
        root.keys = vec![separator];
        self.nodes.mark_dirty(root_id);

        self.header.root = root_id;
        debug!(root = root_id.0, "tree grew a level");
        Ok(())
    }
}
