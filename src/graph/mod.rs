pub mod cycles;
pub mod record;

use std::collections::HashMap;

use crate::error::EngineError;
use record::DependencyRecord;

/// In-memory view over the components partition with O(1) lookup by
/// canonical name.
///
/// The graph does not own records: it indexes a slice (the arena) and edges
/// are implied by each record's `local_dependencies`. Layouts and pages are
/// never inserted; they only query it.
pub struct DependencyGraph<'a> {
    records: &'a [DependencyRecord],
    /// Maps canonical names to positions in `records`.
    canonical_index: HashMap<&'a str, usize>,
}

impl<'a> DependencyGraph<'a> {
    /// Index a full components partition.
    ///
    /// Fails if two components share a canonical name or a display name.
    pub fn build(components: &'a [DependencyRecord]) -> Result<Self, EngineError> {
        let mut canonical_index: HashMap<&str, usize> = HashMap::with_capacity(components.len());
        let mut display_index: HashMap<&str, usize> = HashMap::with_capacity(components.len());

        for (idx, record) in components.iter().enumerate() {
            if let Some(&prev) = canonical_index.get(record.canonical_name.as_str()) {
                return Err(EngineError::DuplicateComponent {
                    field: "canonical name",
                    name: record.canonical_name.clone(),
                    first: components[prev].path.clone(),
                    second: record.path.clone(),
                });
            }
            if let Some(&prev) = display_index.get(record.display_name.as_str()) {
                return Err(EngineError::DuplicateComponent {
                    field: "display name",
                    name: record.display_name.clone(),
                    first: components[prev].path.clone(),
                    second: record.path.clone(),
                });
            }
            canonical_index.insert(record.canonical_name.as_str(), idx);
            display_index.insert(record.display_name.as_str(), idx);
        }

        Ok(Self {
            records: components,
            canonical_index,
        })
    }

    /// Exact-match lookup. A naming mismatch is a silent miss, not an error.
    pub fn resolve(&self, name: &str) -> Option<&'a DependencyRecord> {
        self.canonical_index.get(name).map(|&idx| &self.records[idx])
    }

    /// Arena position of a component, for index-addressed algorithms.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.canonical_index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.canonical_index.contains_key(name)
    }

    pub fn records(&self) -> &'a [DependencyRecord] {
        self.records
    }

    /// Direct local dependencies of `record` that name no known component.
    pub fn dangling<'r>(&'r self, record: &'r DependencyRecord) -> impl Iterator<Item = &'r str> {
        record
            .local_dependencies
            .iter()
            .map(String::as_str)
            .filter(|name| !self.contains(name))
    }
}
