//! lineindex - A disk-backed B+ tree secondary index stored as a flat text file.
//!
//! The index maps `i64` keys to record ids, which are 1-based line numbers
//! in an external data file. Duplicate keys are allowed. Every node lives on
//! its own line of the index file, so the working set is bounded by the node
//! cache rather than by the size of the tree.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            lineindex                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │              Index Layer (index/btree/)                 │    │
//! │  │   BPlusTree: insert / search / inspect → descend        │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │       Buffer Layer (buffer/)  [Swappable NodeCache]     │    │
//! │  │   SingleSlotCache (default) | LruNodeCache | RecordCache│    │
//! │  │            Frame + dirty flag + CacheStats              │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │           Storage Layer (storage/)                      │    │
//! │  │   NodeStore + TreeHeader + node codec + LineFile        │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Index file
//! ```text
//! line 1      ROOT_ID:<id>
//! line 2      NEXT_NODE_ID:<id>
//! line id+2   L;n;k1;..;kn;r1;..;rn;prev;next;   (leaf)
//!             I;n;k1;..;kn;c0;..;cn;             (internal)
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Key, RecordId, Error, config)
//! - [`buffer`] - Node and record caches
//! - [`storage`] - Index file I/O and line formats
//! - [`index`] - The B+ tree
//!
//! # Quick Start
//! ```no_run
//! use lineindex::{BPlusTree, IndexConfig};
//!
//! let config = IndexConfig::new(4, "year.idx", "wines.csv");
//! let mut tree = BPlusTree::open(config)?;
//!
//! tree.insert(1999, 2)?;
//! tree.insert(2001, 3)?;
//! for line in tree.search_records(1999)? {
//!     println!("{}", line);
//! }
//! tree.close()?;
//! # Ok::<(), lineindex::Error>(())
//! ```

pub mod buffer;
pub mod common;
pub mod index;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::{Error, IndexConfig, Key, NodeId, RecordId, Result};

pub use buffer::{CacheStats, LruNodeCache, NodeCache, RecordCache, SingleSlotCache};
pub use index::{BPlusTree, Descent};
pub use storage::node::{Node, NodeKind};
pub use storage::TreeHeader;
