//! Equality search across the leaf chain.

use tracing::{trace, warn};

use crate::buffer::NodeCache;
use crate::common::{Error, Key, RecordId, Result};

use super::{leaf_body, BPlusTree};

impl<C: NodeCache> BPlusTree<C> {
    /// Return the record ids stored under `key`, in leaf order.
    ///
    /// Copies of a key may span several leaves; the scan starts in the leaf
    /// reached by [`descend`](BPlusTree::descend) and follows `next` links
    /// until a different key shows up. An empty tree or an absent key gives
    /// an empty vector.
    pub fn search(&mut self, key: Key) -> Result<Vec<RecordId>> {
        self.find_records(key).map_err(|err| {
            warn!(key, %err, "search aborted");
            err
        })
    }

    /// Like [`search`](BPlusTree::search), but resolves each record id to its
    /// data file line.
    pub fn search_records(&mut self, key: Key) -> Result<Vec<String>> {
        let records = self.search(key)?;
        records
            .into_iter()
            .map(|record| self.fetch_record(record))
            .collect()
    }

    fn find_records(&mut self, key: Key) -> Result<Vec<RecordId>> {
        let mut matches = Vec::new();
        let Some(descent) = self.descend(key)? else {
            return Ok(matches);
        };

        // A healthy chain visits each leaf once; more hops than ids means a cycle.
        let max_hops = self.header.next_node_id.0;
        let mut hops = 0;
        let mut leaf_id = descent.leaf;
        let mut pos = self.nodes.access(leaf_id)?.lower_bound(key);

        loop {
            let node = self.nodes.access(leaf_id)?;
            let leaf = leaf_body(node)?;
            match node.keys.get(pos) {
                Some(&found) if found == key => {
                    let record = leaf.records.get(pos).copied().ok_or_else(|| {
                        Error::logic(leaf_id, format!("no record for key slot {}", pos))
                    })?;
                    matches.push(record);
                    pos += 1;
                }
                Some(_) => break,
                // Past the end of this leaf: the run may continue in the next.
                None if leaf.next.is_null() => break,
                None => {
                    hops += 1;
                    if hops > max_hops {
                        return Err(Error::logic(leaf_id, "leaf chain loops"));
                    }
                    leaf_id = leaf.next;
                    pos = 0;
                }
            }
        }

        trace!(key, found = matches.len(), "search finished");
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::IndexConfig;
    use std::fs;
    use tempfile::tempdir;

    fn create_test_tree(order: usize) -> (BPlusTree, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let config = IndexConfig::new(order, dir.path().join("index.txt"), dir.path().join("data.csv"))
            .with_sync_writes(false);
        (BPlusTree::open(config).unwrap(), dir)
    }

    #[test]
    fn test_search_empty_tree() {
        let (mut tree, _dir) = create_test_tree(4);
        assert!(tree.search(1).unwrap().is_empty());
    }

    #[test]
    fn test_search_absent_key() {
        let (mut tree, _dir) = create_test_tree(4);
        for key in [10, 20, 30, 40, 50] {
            tree.insert(key, key as u64).unwrap();
        }

        assert!(tree.search(5).unwrap().is_empty());
        assert!(tree.search(25).unwrap().is_empty());
        assert!(tree.search(99).unwrap().is_empty());
    }

    #[test]
    fn test_search_separator_key() {
        let (mut tree, _dir) = create_test_tree(3);
        tree.insert(1, 10).unwrap();
        tree.insert(2, 20).unwrap();
        tree.insert(3, 30).unwrap();

        // 2 is both the root separator and the first key of the right leaf.
        assert_eq!(tree.search(2).unwrap(), vec![20]);
        assert_eq!(tree.search(1).unwrap(), vec![10]);
        assert_eq!(tree.search(3).unwrap(), vec![30]);
    }

    #[test]
    fn test_search_duplicates_across_leaves() {
        let (mut tree, _dir) = create_test_tree(3);
        tree.insert(1, 100).unwrap();
        for record in 1..=6 {
            tree.insert(7, record).unwrap();
        }
        tree.insert(9, 900).unwrap();

        let mut found = tree.search(7).unwrap();
        found.sort_unstable();
        assert_eq!(found, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(tree.search(9).unwrap(), vec![900]);
    }

    #[test]
    fn test_search_records() {
        let (mut tree, dir) = create_test_tree(4);
        fs::write(
            dir.path().join("data.csv"),
            "id,label,year\n1,Alpha,1999\n2,Beta,2001\n3,Gamma,1999\n",
        )
        .unwrap();
        tree.insert(1999, 2).unwrap();
        tree.insert(2001, 3).unwrap();
        tree.insert(1999, 4).unwrap();

        let mut lines = tree.search_records(1999).unwrap();
        lines.sort();
        assert_eq!(lines, vec!["1,Alpha,1999", "3,Gamma,1999"]);
    }

    #[test]
    fn test_search_records_missing_line() {
        let (mut tree, dir) = create_test_tree(4);
        fs::write(dir.path().join("data.csv"), "header\n").unwrap();
        tree.insert(1, 5).unwrap();

        assert!(matches!(tree.search_records(1), Err(Error::Io(_))));
    }

    #[test]
    fn test_leaf_chain_cycle_detected() {
        let dir = tempdir().unwrap();
        let index = dir.path().join("index.txt");
        // Two empty leaves linked to each other.
        fs::write(
            &index,
            "ROOT_ID:3\nNEXT_NODE_ID:4\nL;0;2;2;\nL;0;1;1;\nI;1;5;1;2;\n",
        )
        .unwrap();
        let config = IndexConfig::new(3, &index, dir.path().join("data.csv")).with_sync_writes(false);
        let mut tree = BPlusTree::open(config).unwrap();

        assert!(matches!(tree.search(5), Err(Error::Logic { .. })));
    }
}
