//! Tree session: open/close lifecycle and the state persisted in the header.

use tracing::{debug, error};

use crate::buffer::{CacheStats, NodeCache, RecordCache, SingleSlotCache};
use crate::common::{IndexConfig, NodeId, RecordId, Result};
use crate::storage::{NodeStore, TreeHeader};

/// A disk-backed B+ tree mapping integer keys to data file line numbers.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │                        BPlusTree                         │
/// │   insert ─┐           search ─┐                          │
/// │           ▼                   ▼                          │
/// │        descend (root → leaf, explicit id path)           │
/// │           │                                              │
/// │  ┌────────▼────────┐   ┌───────────────┐  ┌───────────┐  │
/// │  │ C: NodeCache    │   │ RecordCache   │  │TreeHeader │  │
/// │  │ (1 node default)│   │ (1 data line) │  │root, next │  │
/// │  └────────┬────────┘   └───────┬───────┘  └─────┬─────┘  │
/// └───────────┼────────────────────┼────────────────┼────────┘
///             ▼                    ▼                ▼
///        index file            data file      index lines 1-2
/// ```
///
/// The root id and node id counter are fields of this session; they are
/// read from the header when the tree is opened and written back when it is
/// closed (explicitly with [`close`](BPlusTree::close), or on drop).
///
/// # Example
/// ```no_run
/// use lineindex::{BPlusTree, IndexConfig};
///
/// let mut tree = BPlusTree::open(IndexConfig::new(4, "index.txt", "wines.csv"))?;
/// tree.insert(1999, 5)?;
/// tree.insert(1999, 7)?;
/// assert_eq!(tree.search(1999)?.len(), 2);
/// tree.close()?;
/// # Ok::<(), lineindex::Error>(())
/// ```
pub struct BPlusTree<C: NodeCache = SingleSlotCache> {
    pub(super) config: IndexConfig,
    pub(super) header: TreeHeader,
    pub(super) nodes: C,
    pub(super) records: RecordCache,
    closed: bool,
}

impl BPlusTree<SingleSlotCache> {
    /// Open (or create) an index with the one-node cache.
    ///
    /// # Errors
    /// - `Error::Usage` if `config.order < 3` (checked before any file I/O)
    /// - `Error::Io` if the index file cannot be opened or initialized
    /// - `Error::Parse` if the header lines are malformed
    pub fn open(config: IndexConfig) -> Result<Self> {
        Self::open_with_cache(config, SingleSlotCache::new)
    }
}

impl<C: NodeCache> BPlusTree<C> {
    /// Open (or create) an index, building the node cache from the store.
    ///
    /// ```no_run
    /// use lineindex::{BPlusTree, IndexConfig, LruNodeCache};
    ///
    /// let config = IndexConfig::new(8, "index.txt", "wines.csv");
    /// let tree = BPlusTree::open_with_cache(config, |store| LruNodeCache::new(store, 16))?;
    /// # Ok::<(), lineindex::Error>(())
    /// ```
    pub fn open_with_cache<F>(config: IndexConfig, make_cache: F) -> Result<Self>
    where
        F: FnOnce(NodeStore) -> C,
    {
        config.validate()?;

        let mut store = NodeStore::open(&config.index_path, config.sync_writes)?;
        let header = store.read_header()?;
        debug!(
            path = %config.index_path.display(),
            order = config.order,
            root = header.root.0,
            next_node_id = header.next_node_id.0,
            "opened index"
        );

        let records = RecordCache::new(&config.data_path);
        Ok(Self {
            config,
            header,
            nodes: make_cache(store),
            records,
            closed: false,
        })
    }

    /// Maximum number of children of an internal node.
    #[inline]
    pub fn order(&self) -> usize {
        self.config.order
    }

    /// Maximum number of keys per node.
    #[inline]
    pub fn max_keys(&self) -> usize {
        self.config.max_keys()
    }

    #[inline]
    pub fn root_id(&self) -> NodeId {
        self.header.root
    }

    /// Id the next created node will receive.
    #[inline]
    pub fn next_node_id(&self) -> NodeId {
        self.header.next_node_id
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.header.root.is_null()
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn cache(&self) -> &C {
        &self.nodes
    }

    pub fn cache_stats(&self) -> &CacheStats {
        self.nodes.stats()
    }

    /// Return data file line `record` through the record cache.
    pub fn fetch_record(&mut self, record: RecordId) -> Result<String> {
        self.records.access(record).map(str::to_string)
    }

    /// Flush dirty nodes and rewrite the header, consuming the session.
    pub fn close(mut self) -> Result<()> {
        self.shutdown()
    }

    /// Persist the session once. A failed attempt leaves the tree open, so
    /// the drop that follows a failed `close` tries again.
    fn shutdown(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.nodes.flush()?;
        self.nodes.store_mut().write_header(&self.header)?;
        self.closed = true;
        debug!(
            root = self.header.root.0,
            next_node_id = self.header.next_node_id.0,
            stats = %self.nodes.stats(),
            "closed index"
        );
        Ok(())
    }
}

impl<C: NodeCache> Drop for BPlusTree<C> {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            error!(%err, "failed to persist index on drop");
        }
    }
}
