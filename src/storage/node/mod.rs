//! Tree nodes and their line format.
//!
//! This module contains:
//! - [`Node`] - A leaf or internal node, addressed by [`NodeId`](crate::NodeId)
//! - [`NodeKind`] - Discriminator for the two node formats
//! - [`codec`] - Conversion between nodes and index file lines

pub mod codec;
#[allow(clippy::module_inception)]
mod node;

pub use node::{InternalBody, LeafBody, Node, NodeBody, NodeKind};
