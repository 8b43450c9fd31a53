//! Eviction policy implementations (replacers).
//!
//! Currently implements:
//! - [`LruReplacer`] - Least Recently Used, for [`LruNodeCache`](crate::LruNodeCache)

mod lru;

pub use lru::LruReplacer;
