use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three record groups produced by a scan.
///
/// Only `Components` supply nodes that other records' local dependencies can
/// resolve to. Layouts and pages are roots: they consume the component graph
/// but are never a dependency target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Components,
    Layouts,
    Pages,
}

impl Partition {
    /// All partitions in scan order (components first).
    pub const ALL: [Partition; 3] = [Partition::Components, Partition::Layouts, Partition::Pages];

    /// Directory name under the project root, also used as the table name.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Partition::Components => "components",
            Partition::Layouts => "layouts",
            Partition::Pages => "pages",
        }
    }

    /// Partition owning a project-relative path, judged by its first segment.
    pub fn from_path(path: &str) -> Option<Partition> {
        let first = path.trim_start_matches('/').split('/').next()?;
        Partition::ALL.into_iter().find(|p| p.dir_name() == first)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A dependency category tracked per record.
///
/// `Local` values are component canonical names and double as graph edges;
/// the other three are leaf attributes collected at each visited node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Local,
    OtherLibrary,
    LegacyComponents,
    LegacyDirectives,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Local,
        Category::OtherLibrary,
        Category::LegacyComponents,
        Category::LegacyDirectives,
    ];

    /// The record's direct (non-transitive) values for this category.
    pub fn direct<'r>(&self, record: &'r DependencyRecord) -> &'r BTreeSet<String> {
        match self {
            Category::Local => &record.local_dependencies,
            Category::OtherLibrary => &record.other_library_dependencies,
            Category::LegacyComponents => &record.legacy_components,
            Category::LegacyDirectives => &record.legacy_directives,
        }
    }
}

/// Transitive closures of each category, filled in by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Closures {
    pub local: BTreeSet<String>,
    pub other_library: BTreeSet<String>,
    pub legacy_components: BTreeSet<String>,
    pub legacy_directives: BTreeSet<String>,
}

impl Closures {
    pub fn get(&self, category: Category) -> &BTreeSet<String> {
        match category {
            Category::Local => &self.local,
            Category::OtherLibrary => &self.other_library,
            Category::LegacyComponents => &self.legacy_components,
            Category::LegacyDirectives => &self.legacy_directives,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut BTreeSet<String> {
        match category {
            Category::Local => &mut self.local,
            Category::OtherLibrary => &mut self.other_library,
            Category::LegacyComponents => &mut self.legacy_components,
            Category::LegacyDirectives => &mut self.legacy_directives,
        }
    }
}

/// Dependency record for a single analyzable file.
///
/// The direct sets come from extraction; `closures`, `migration_complexity`
/// and `migration_value` are derived and fully overwritten on every scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Project-relative path with `/` separators. Primary key.
    pub path: String,
    /// File stem, or the parent folder name for `index.vue`.
    pub display_name: String,
    /// Kebab-case form of the display name, matched against usage references.
    pub canonical_name: String,
    /// Canonical names of components referenced directly (usage or import).
    pub local_dependencies: BTreeSet<String>,
    /// Third-party library components referenced directly.
    pub other_library_dependencies: BTreeSet<String>,
    /// Legacy framework components referenced directly.
    pub legacy_components: BTreeSet<String>,
    /// Legacy framework directives referenced directly.
    pub legacy_directives: BTreeSet<String>,
    pub closures: Closures,
    pub migration_complexity: u64,
    /// Only set for components.
    pub migration_value: Option<u64>,
}

impl DependencyRecord {
    /// A record with direct data only; derived fields start empty.
    pub fn new(
        path: impl Into<String>,
        display_name: impl Into<String>,
        canonical_name: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            display_name: display_name.into(),
            canonical_name: canonical_name.into(),
            ..Self::default()
        }
    }

    /// Reset every engine-derived field.
    pub fn clear_derived(&mut self) {
        self.closures = Closures::default();
        self.migration_complexity = 0;
        self.migration_value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_from_path() {
        assert_eq!(
            Partition::from_path("components/forms/Input.vue"),
            Some(Partition::Components)
        );
        assert_eq!(
            Partition::from_path("/pages/index.vue"),
            Some(Partition::Pages)
        );
        assert_eq!(Partition::from_path("layouts"), Some(Partition::Layouts));
        assert_eq!(Partition::from_path("app.vue"), None);
        assert_eq!(Partition::from_path("componentsx/a.vue"), None);
    }

    #[test]
    fn test_category_direct_selects_matching_set() {
        let mut r = DependencyRecord::new("components/A.vue", "A", "a");
        r.local_dependencies.insert("b".into());
        r.legacy_directives.insert("v-ripple".into());

        assert!(Category::Local.direct(&r).contains("b"));
        assert!(Category::LegacyDirectives.direct(&r).contains("v-ripple"));
        assert!(Category::OtherLibrary.direct(&r).is_empty());
    }

    #[test]
    fn test_clear_derived() {
        let mut r = DependencyRecord::new("components/A.vue", "A", "a");
        r.closures.local.insert("b".into());
        r.migration_complexity = 5;
        r.migration_value = Some(2);
        r.clear_derived();
        assert_eq!(r.closures, Closures::default());
        assert_eq!(r.migration_complexity, 0);
        assert_eq!(r.migration_value, None);
    }
}
