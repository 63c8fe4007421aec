use anyhow::Result;
use serde::Serialize;

use crate::store::Store;

/// One row of the migration priority report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityEntry {
    /// 1-based position in the report.
    pub rank: usize,
    pub path: String,
    pub display_name: String,
    pub migration_value: u64,
    pub migration_complexity: u64,
    /// Distinct legacy components reachable from this component.
    pub legacy_components: usize,
    /// Distinct legacy directives reachable from this component.
    pub legacy_directives: usize,
}

/// Components in migration order: most valuable first, cheapest first among
/// equally valuable ones, then by path.
pub fn prioritized_components(store: &Store, limit: Option<usize>) -> Result<Vec<PriorityEntry>> {
    let records = store.components_by_priority(limit)?;
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(i, r)| PriorityEntry {
            rank: i + 1,
            migration_value: r.migration_value.unwrap_or(0),
            migration_complexity: r.migration_complexity,
            legacy_components: r.closures.legacy_components.len(),
            legacy_directives: r.closures.legacy_directives.len(),
            path: r.path,
            display_name: r.display_name,
        })
        .collect())
}
