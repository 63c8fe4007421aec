use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use serde::Serialize;

use crate::graph::record::{DependencyRecord, Partition};
use crate::store::Store;

/// Aggregated migration cost of one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderRollup {
    /// Normalized prefix, without leading or trailing `/`. Empty means the whole project.
    pub prefix: String,
    pub files: usize,
    pub migration_complexity: u64,
    /// Distinct legacy components reachable from any file under the prefix.
    pub legacy_components: BTreeSet<String>,
    /// Immediate children: sub-folders first, then files, each group by name.
    pub entries: Vec<RollupEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Folder,
    File,
}

/// One immediate child of the rolled-up directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollupEntry {
    pub kind: EntryKind,
    /// Project-relative path of the child.
    pub path: String,
    pub files: usize,
    pub migration_complexity: u64,
    /// Set for component files only.
    pub migration_value: Option<u64>,
    pub legacy_components: BTreeSet<String>,
}

/// Sum migration complexity over every stored record under `prefix`.
///
/// Matching is segment-aware: `components/forms` covers
/// `components/forms/Input.vue` but not `components/formsx/Input.vue`.
pub fn folder_rollup(store: &Store, prefix: &str) -> Result<FolderRollup> {
    let prefix = prefix.trim_matches('/').to_string();

    let partitions: Vec<Partition> = match Partition::from_path(&prefix) {
        Some(p) => vec![p],
        None => Partition::ALL.to_vec(),
    };

    let mut records = Vec::new();
    for partition in partitions {
        records.extend(
            store
                .load_partition(partition)?
                .into_iter()
                .filter(|r| is_under(&r.path, &prefix)),
        );
    }

    Ok(rollup_records(prefix, &records))
}

fn is_under(path: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn rollup_records(prefix: String, records: &[DependencyRecord]) -> FolderRollup {
    let mut children: BTreeMap<(EntryKind, String), RollupEntry> = BTreeMap::new();
    let mut legacy_components = BTreeSet::new();
    let mut total = 0u64;

    for record in records {
        total += record.migration_complexity;
        legacy_components.extend(record.closures.legacy_components.iter().cloned());

        let rest = record.path[prefix.len()..].trim_start_matches('/');
        let (kind, child) = match rest.split_once('/') {
            Some((folder, _)) => (EntryKind::Folder, folder),
            None => (EntryKind::File, rest),
        };
        let child_path = if prefix.is_empty() {
            child.to_string()
        } else if child.is_empty() {
            // The prefix named a file exactly.
            prefix.clone()
        } else {
            format!("{prefix}/{child}")
        };

        let entry = children
            .entry((kind, child_path.clone()))
            .or_insert_with(|| RollupEntry {
                kind,
                path: child_path,
                files: 0,
                migration_complexity: 0,
                migration_value: None,
                legacy_components: BTreeSet::new(),
            });
        entry.files += 1;
        entry.migration_complexity += record.migration_complexity;
        entry
            .legacy_components
            .extend(record.closures.legacy_components.iter().cloned());
        if kind == EntryKind::File {
            entry.migration_value = record.migration_value;
        }
    }

    FolderRollup {
        prefix,
        files: records.len(),
        migration_complexity: total,
        legacy_components,
        entries: children.into_values().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ScanOutput;

    fn record(path: &str, complexity: u64, legacy: &[&str]) -> DependencyRecord {
        let stem = path.rsplit('/').next().unwrap().trim_end_matches(".vue");
        let mut r = DependencyRecord::new(path, stem, stem.to_lowercase());
        r.migration_complexity = complexity;
        r.closures.legacy_components = legacy.iter().map(|s| s.to_string()).collect();
        if path.starts_with("components/") {
            r.migration_value = Some(1);
        }
        r
    }

    fn store_with(records: Vec<DependencyRecord>) -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(&dir.path().join("db.sqlite")).unwrap();
        let mut output = ScanOutput::default();
        for r in records {
            match Partition::from_path(&r.path) {
                Some(Partition::Components) => output.components.push(r),
                Some(Partition::Layouts) => output.layouts.push(r),
                _ => output.pages.push(r),
            }
        }
        store.replace_scan(&output).unwrap();
        (dir, store)
    }

    fn sample() -> Vec<DependencyRecord> {
        vec![
            record("components/forms/TextInput.vue", 10, &["v-text-field"]),
            record("components/forms/inputs/DateInput.vue", 7, &["v-menu", "v-text-field"]),
            record("components/formsx/Other.vue", 100, &["v-dialog"]),
            record("components/Button.vue", 3, &["v-btn"]),
            record("pages/index.vue", 20, &["v-btn"]),
        ]
    }

    #[test]
    fn test_prefix_is_segment_aware() {
        let (_dir, store) = store_with(sample());
        let rollup = folder_rollup(&store, "components/forms/").unwrap();

        assert_eq!(rollup.prefix, "components/forms");
        assert_eq!(rollup.files, 2);
        assert_eq!(rollup.migration_complexity, 17);
        let legacy: Vec<&str> = rollup.legacy_components.iter().map(String::as_str).collect();
        assert_eq!(legacy, vec!["v-menu", "v-text-field"]);
    }

    #[test]
    fn test_entries_folders_first() {
        let (_dir, store) = store_with(sample());
        let rollup = folder_rollup(&store, "components").unwrap();

        assert_eq!(rollup.files, 4);
        assert_eq!(rollup.migration_complexity, 120);
        let entries: Vec<(EntryKind, &str, u64)> = rollup
            .entries
            .iter()
            .map(|e| (e.kind, e.path.as_str(), e.migration_complexity))
            .collect();
        assert_eq!(
            entries,
            vec![
                (EntryKind::Folder, "components/forms", 17),
                (EntryKind::Folder, "components/formsx", 100),
                (EntryKind::File, "components/Button.vue", 3),
            ]
        );
        assert_eq!(rollup.entries[2].migration_value, Some(1));
        assert_eq!(rollup.entries[0].files, 2);
    }

    #[test]
    fn test_empty_prefix_covers_all_partitions() {
        let (_dir, store) = store_with(sample());
        let rollup = folder_rollup(&store, "").unwrap();
        assert_eq!(rollup.files, 5);
        assert_eq!(rollup.migration_complexity, 140);
        let folders: Vec<&str> = rollup.entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(folders, vec!["components", "pages"]);
    }

    #[test]
    fn test_unknown_prefix_is_empty() {
        let (_dir, store) = store_with(sample());
        let rollup = folder_rollup(&store, "components/nothing-here").unwrap();
        assert_eq!(rollup.files, 0);
        assert_eq!(rollup.migration_complexity, 0);
        assert!(rollup.entries.is_empty());
    }
}
