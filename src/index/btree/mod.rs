//! Disk-backed B+ tree over the node cache.
//!
//! # Components
//! - [`BPlusTree`] - Session state, open/close lifecycle
//! - [`Descent`] - Root-to-leaf path produced by the navigator
//! - insert - Leaf insertion, splits, root growth
//! - search - Equality lookup across the leaf chain
//! - inspect - Leaf scans, structural checks, debug dump

mod insert;
mod inspect;
mod navigator;
mod search;
mod tree;

pub use navigator::Descent;
pub use tree::BPlusTree;

use crate::common::{Error, Result};
use crate::storage::node::{InternalBody, LeafBody, Node};

fn leaf_body(node: &Node) -> Result<&LeafBody> {
    let id = node.id;
    node.as_leaf()
        .ok_or_else(|| Error::logic(id, "expected a leaf node"))
}

fn leaf_body_mut(node: &mut Node) -> Result<&mut LeafBody> {
    let id = node.id;
    node.as_leaf_mut()
        .ok_or_else(|| Error::logic(id, "expected a leaf node"))
}

fn internal_body(node: &Node) -> Result<&InternalBody> {
    let id = node.id;
    node.as_internal()
        .ok_or_else(|| Error::logic(id, "expected an internal node"))
}

fn internal_body_mut(node: &mut Node) -> Result<&mut InternalBody> {
    let id = node.id;
    node.as_internal_mut()
        .ok_or_else(|| Error::logic(id, "expected an internal node"))
}
