//! Configuration for a tree session and the constants of the index file format.

use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

/// Number of header lines at the top of the index file.
///
/// Node `N` lives on file line `N + HEADER_LINES` (1-based).
/// ```text
/// line 1: ROOT_ID:<id>
/// line 2: NEXT_NODE_ID:<counter>
/// line 3: node 1
/// line 4: node 2
/// ...
/// ```
pub const HEADER_LINES: usize = 2;

/// Smallest legal tree order (maximum children of an internal node).
pub const MIN_ORDER: usize = 3;

/// Prefix of the first header line.
pub const ROOT_ID_PREFIX: &str = "ROOT_ID:";

/// Prefix of the second header line.
pub const NEXT_NODE_ID_PREFIX: &str = "NEXT_NODE_ID:";

/// Whether index writes are followed by `fsync()` unless configured otherwise.
pub const DEFAULT_SYNC_WRITES: bool = true;

/// Everything needed to open a tree session.
///
/// # Example
/// ```
/// use lineindex::IndexConfig;
///
/// let config = IndexConfig::new(4, "index.txt", "records.csv").with_sync_writes(false);
/// assert_eq!(config.max_keys(), 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Maximum number of children of an internal node. Max keys = `order - 1`.
    pub order: usize,

    /// Path of the flat index file (created if missing).
    pub index_path: PathBuf,

    /// Path of the external data file the record ids point into.
    pub data_path: PathBuf,

    /// Call `fsync()` after every index file write.
    pub sync_writes: bool,
}

impl IndexConfig {
    /// Create a config with default write durability.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(order: usize, index_path: P, data_path: Q) -> Self {
        Self {
            order,
            index_path: index_path.as_ref().to_path_buf(),
            data_path: data_path.as_ref().to_path_buf(),
            sync_writes: DEFAULT_SYNC_WRITES,
        }
    }

    /// Enable or disable `fsync()` after index writes.
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// Maximum number of keys a node may hold outside of a split.
    #[inline]
    pub fn max_keys(&self) -> usize {
        self.order.saturating_sub(1)
    }

    /// Reject configurations the tree cannot run with.
    ///
    /// # Errors
    /// Returns `Error::Usage` if `order < MIN_ORDER`.
    pub fn validate(&self) -> Result<()> {
        if self.order < MIN_ORDER {
            return Err(Error::Usage(format!(
                "tree order must be at least {}, got {}",
                MIN_ORDER, self.order
            )));
        }
        Ok(())
    }
}
