//! Storage layer - index file I/O and line formats.
//!
//! This module handles persistent storage:
//! - [`LineFile`] - Low-level line-addressed file I/O
//! - [`NodeStore`] - Nodes and header addressed by id
//! - [`TreeHeader`] - Root id and node id counter
//! - [`node`] - Node types and their line codec

mod header;
mod line_file;
pub mod node;
mod node_store;

pub use header::TreeHeader;
pub use line_file::{read_nth_line, LineFile};
pub use node_store::NodeStore;
