mod common;

use common::{TestTrees, list_tree};
use locsync::mirror::StructureSync;
use locsync::tracking::scanner::{ScanOptions, TreeScanner};
use locsync::utils::hash::fingerprint_bytes;
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Relative file paths under one to three directory levels. Directory
/// names start with `d` and file names with `f`, so they never collide.
fn tree_paths() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(
        (prop::collection::vec("d[a-c]", 0..3), "f[a-c]{1,3}").prop_map(|(dirs, file)| {
            let mut parts = dirs;
            parts.push(format!("{file}.md"));
            parts.join("/")
        }),
        1..12,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_scan_reports_every_file_once(paths in tree_paths()) {
        let trees = TestTrees::new().unwrap();
        for path in &paths {
            trees.write_source(path, path).unwrap();
        }

        let scanned = TreeScanner::new(&trees.source, ScanOptions::default())
            .scan_files()
            .unwrap();

        let expected: Vec<String> = paths.iter().cloned().collect();
        prop_assert_eq!(scanned, expected);
    }

    #[test]
    fn test_sync_is_idempotent_and_additive(
        source in tree_paths(),
        translated in tree_paths(),
    ) {
        let trees = TestTrees::new().unwrap();
        for path in &source {
            trees.write_source(path, "english").unwrap();
        }
        for path in &translated {
            trees.write_target(path, "翻訳済み").unwrap();
        }

        let sync = StructureSync::new(&trees.source, &trees.target, &ScanOptions::default());
        sync.sync(false).unwrap();
        let after_first = list_tree(&trees.target);

        let second = sync.sync(false).unwrap();
        prop_assert!(!second.has_changes());
        prop_assert_eq!(list_tree(&trees.target), after_first);

        // Every source file has a counterpart; pre-existing files are untouched
        for path in &source {
            prop_assert!(trees.target.join(path).is_file());
        }
        for path in &translated {
            prop_assert_eq!(trees.read_target(path).unwrap(), "翻訳済み");
        }

        let orphans: BTreeSet<_> = second.removed_items.iter().cloned().collect();
        for path in translated.difference(&source) {
            prop_assert!(orphans.contains(path));
        }
    }

    #[test]
    fn test_fingerprint_shape(data in prop::collection::vec(any::<u8>(), 0..4096)) {
        let fingerprint = fingerprint_bytes(&data);
        prop_assert_eq!(fingerprint.len(), 32);
        prop_assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        prop_assert_eq!(fingerprint_bytes(&data), fingerprint);
    }
}
