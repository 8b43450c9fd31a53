//! The node cache seam between the tree algorithms and the node store.

use crate::buffer::CacheStats;
use crate::common::{NodeId, Result};
use crate::storage::node::{Node, NodeKind};
use crate::storage::NodeStore;

/// A bounded cache of tree nodes in front of a [`NodeStore`].
///
/// # Contract
/// - A dirty node is written to the store before it leaves the cache, and
///   on [`flush`](NodeCache::flush).
/// - A reference returned by [`access`](NodeCache::access) or
///   [`create`](NodeCache::create) is only valid until the next call; any
///   node touched again must be re-fetched (it may have been evicted).
///
/// The insertion and search algorithms only talk to this trait, so the
/// capacity can change without touching them.
pub trait NodeCache {
    /// Make node `id` resident and return it.
    ///
    /// # Errors
    /// - `Error::Logic` for `NodeId::NULL`
    /// - `Error::Parse` if the node's line is missing or malformed
    /// - `Error::Io` if the victim flush or the load fails
    fn access(&mut self, id: NodeId) -> Result<&mut Node>;

    /// Flag resident node `id` as modified.
    ///
    /// Returns `false` if the node is not resident.
    fn mark_dirty(&mut self, id: NodeId) -> bool;

    /// Create an empty node with an already allocated `id`.
    ///
    /// The node is persisted immediately, so every id ever handed out has a
    /// line in the index file, then kept resident and dirty.
    fn create(&mut self, id: NodeId, kind: NodeKind) -> Result<&mut Node>;

    /// Write every resident dirty node to the store.
    fn flush(&mut self) -> Result<()>;

    /// Store behind the cache, for header I/O.
    fn store_mut(&mut self) -> &mut NodeStore;

    fn stats(&self) -> &CacheStats;

    /// Access node `id`, apply `f`, and mark the node dirty.
    fn update<R, F>(&mut self, id: NodeId, f: F) -> Result<R>
    where
        F: FnOnce(&mut Node) -> R,
    {
        let result = f(self.access(id)?);
        self.mark_dirty(id);
        Ok(result)
    }
}
