//! Buffer management.
//!
//! The buffer layer is the in-memory cache between the tree algorithms and
//! the index file. It bounds how many nodes and data records are resident.
//!
//! # Components
//! - [`NodeCache`] - The seam the tree algorithms are written against
//! - [`SingleSlotCache`] - One resident node (the default)
//! - [`LruNodeCache`] - Up to K resident nodes with LRU eviction
//! - [`Frame`] - A slot holding a node + dirty flag
//! - [`RecordCache`] - One resident data file line
//! - [`CacheStats`] - Performance statistics
//! - [`replacer`] - Eviction policy implementations

mod frame;
mod lru_cache;
mod node_cache;
mod record_cache;
pub mod replacer;
mod single_slot;
mod stats;

pub use frame::Frame;
pub use lru_cache::LruNodeCache;
pub use node_cache::NodeCache;
pub use record_cache::RecordCache;
pub use single_slot::SingleSlotCache;
pub use stats::CacheStats;
