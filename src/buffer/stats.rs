//! Node cache statistics tracking.

use std::fmt;

/// Counters kept by a node cache.
///
/// Caches own their stats and bump them from `&mut self` methods, so the
/// counters are plain integers and the struct is `Copy`.
///
/// # Example
/// ```
/// use lineindex::CacheStats;
///
/// let stats = CacheStats::default();
/// assert_eq!(stats.hits + stats.misses, 0);
/// assert_eq!(stats.hit_rate(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Number of times a node was already resident.
    pub hits: u64,

    /// Number of times a node had to be loaded from the index file.
    pub misses: u64,

    /// Number of times a resident node was displaced.
    pub evictions: u64,

    /// Number of node lines read.
    pub nodes_read: u64,

    /// Number of node lines written (flushes and initial creation).
    pub nodes_written: u64,
}

impl CacheStats {
    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_read(&mut self) {
        self.nodes_read += 1;
    }

    pub(crate) fn record_write(&mut self) {
        self.nodes_written += 1;
    }

    /// `hits / (hits + misses)`, or 0 before any access.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Zero every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ hits: {}, misses: {}, evictions: {}, reads: {}, writes: {}, hit_rate: {:.2}% }}",
            self.hits,
            self.misses,
            self.evictions,
            self.nodes_read,
            self.nodes_written,
            self.hit_rate() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorders_and_hit_rate() {
        let mut stats = CacheStats::default();
        (0..3).for_each(|_| stats.record_hit());
        stats.record_miss();
        stats.record_read();
        stats.record_eviction();

        assert_eq!((stats.hits, stats.misses), (3, 1));
        assert_eq!((stats.nodes_read, stats.evictions), (1, 1));
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_copy_is_detached() {
        let mut stats = CacheStats::default();
        stats.record_write();
        let before = stats;
        stats.record_write();

        assert_eq!(before.nodes_written, 1);
        assert_eq!(stats.nodes_written, 2);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut stats = CacheStats::default();
        stats.record_eviction();
        stats.record_write();
        stats.reset();

        assert_eq!(stats, CacheStats::default());
    }

    #[test]
    fn test_display() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            nodes_read: 1,
            ..CacheStats::default()
        };

        let display = stats.to_string();

        assert!(display.contains("hits: 80"));
        assert!(display.contains("misses: 20"));
        assert!(display.contains("reads: 1"));
        assert!(display.contains("80.00%"));
    }
}
