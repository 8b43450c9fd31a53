//! Common types and utilities shared across lineindex.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration and file-format constants
//! - Error types
//! - Identifiers (NodeId) and the key/record aliases

pub mod config;
pub mod error;
mod node_id;

pub use config::IndexConfig;
pub use error::{Error, Result};
pub use node_id::NodeId;

/// Search key stored in the tree.
pub type Key = i64;

/// Record locator: a 1-based line number (header included) in the data file.
pub type RecordId = u64;
