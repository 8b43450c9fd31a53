//! Property tests: arbitrary insert sequences keep the tree consistent.

use std::collections::BTreeMap;

use lineindex::{BPlusTree, IndexConfig, LruNodeCache};
use proptest::prelude::*;
use tempfile::tempdir;

fn config(dir: &std::path::Path, order: usize) -> IndexConfig {
    IndexConfig::new(order, dir.join("index.txt"), dir.join("data.csv")).with_sync_writes(false)
}

/// Expected answers: key -> sorted record ids.
fn model(entries: &[(i64, u64)]) -> BTreeMap<i64, Vec<u64>> {
    let mut expected: BTreeMap<i64, Vec<u64>> = BTreeMap::new();
    for &(key, record) in entries {
        expected.entry(key).or_default().push(record);
    }
    for records in expected.values_mut() {
        records.sort_unstable();
    }
    expected
}

fn entries_strategy() -> impl Strategy<Value = Vec<(i64, u64)>> {
    // Narrow key range so duplicates and separator hits are common.
    prop::collection::vec((-20i64..20, 2u64..10_000), 0..150)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn search_finds_every_inserted_record(order in 3usize..8, entries in entries_strategy()) {
        let dir = tempdir().unwrap();
        let mut tree = BPlusTree::open(config(dir.path(), order)).unwrap();
        for &(key, record) in &entries {
            tree.insert(key, record).unwrap();
        }

        let expected = model(&entries);
        for key in -21i64..21 {
            let mut found = tree.search(key).unwrap();
            found.sort_unstable();
            let want = expected.get(&key).cloned().unwrap_or_default();
            prop_assert_eq!(found, want, "key {}", key);
        }
    }

    #[test]
    fn leaf_chain_stays_sorted_and_complete(order in 3usize..8, entries in entries_strategy()) {
        let dir = tempdir().unwrap();
        let mut tree = BPlusTree::open(config(dir.path(), order)).unwrap();
        for &(key, record) in &entries {
            tree.insert(key, record).unwrap();
            prop_assert!(tree.verify().is_ok());
        }

        let scanned = tree.leaf_entries().unwrap();
        prop_assert!(scanned.windows(2).all(|pair| pair[0].0 <= pair[1].0));

        let mut scanned_sorted = scanned.clone();
        scanned_sorted.sort_unstable();
        let mut inserted = entries.clone();
        inserted.sort_unstable();
        prop_assert_eq!(scanned_sorted, inserted);
    }

    #[test]
    fn reopen_preserves_contents(order in 3usize..6, entries in entries_strategy()) {
        let dir = tempdir().unwrap();
        {
            let mut tree = BPlusTree::open(config(dir.path(), order)).unwrap();
            for &(key, record) in &entries {
                tree.insert(key, record).unwrap();
            }
            tree.close().unwrap();
        }

        let mut tree =
            BPlusTree::open_with_cache(config(dir.path(), order), |store| LruNodeCache::new(store, 4))
                .unwrap();
        prop_assert!(tree.verify().is_ok());

        let expected = model(&entries);
        for (key, records) in expected {
            let mut found = tree.search(key).unwrap();
            found.sort_unstable();
            prop_assert_eq!(found, records);
        }
    }
}
