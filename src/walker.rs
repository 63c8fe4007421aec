use std::path::Path;

use crate::config::MigrationGraphConfig;
use crate::graph::record::Partition;

/// Extension of the single-file components this tool analyzes.
const COMPONENT_EXTENSION: &str = "vue";

/// Discover component files of one partition.
///
/// Walks `<root>/<partition>/`, respecting `.gitignore` rules, always
/// excluding `node_modules`, and applying any additional exclusions from
/// `config.exclude`. Returns paths relative to `root` with `/` separators,
/// sorted. A missing partition directory yields an empty list.
pub fn discover(
    root: &Path,
    partition: Partition,
    config: &MigrationGraphConfig,
) -> anyhow::Result<Vec<String>> {
    let dir = root.join(partition.dir_name());
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "partition directory missing, skipping");
        return Ok(Vec::new());
    }

    let walker = ignore::WalkBuilder::new(&dir)
        .standard_filters(true)
        // Read .gitignore files even outside a git repository.
        .require_git(false)
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!(%err, "skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };

        if path_contains_node_modules(rel) || is_excluded_by_config(rel, config) {
            continue;
        }

        let ext = rel.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext != COMPONENT_EXTENSION {
            continue;
        }

        let rel = to_slash_path(rel);
        tracing::debug!(partition = %partition, path = %rel, "discovered");
        files.push(rel);
    }

    files.sort();
    Ok(files)
}

/// Relative path with `/` separators on every platform.
fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Returns true if any component of `path` is named `node_modules`.
fn path_contains_node_modules(path: &Path) -> bool {
    path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .map(|s| s == "node_modules")
            .unwrap_or(false)
    })
}

/// Returns true if `path` matches any exclusion pattern from config, either
/// as a whole relative path or through any single component.
fn is_excluded_by_config(path: &Path, config: &MigrationGraphConfig) -> bool {
    let Some(patterns) = &config.exclude else {
        return false;
    };

    let path_str = to_slash_path(path);
    patterns.iter().any(|pattern| {
        let Ok(matcher) = glob::Pattern::new(pattern) else {
            return false;
        };
        matcher.matches(&path_str)
            || path
                .components()
                .filter_map(|c| c.as_os_str().to_str())
                .any(|s| matcher.matches(s))
    })
}
