use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::graph::record::{Category, Closures, DependencyRecord};

/// Per-category multipliers for migration complexity.
///
/// Local fan-out ranks above the legacy framework categories: deep local
/// coupling is the dominant migration cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityWeights {
    pub local: u64,
    pub other_library: u64,
    pub legacy_components: u64,
    pub legacy_directives: u64,
}

pub const DEFAULT_COMPLEXITY_WEIGHTS: ComplexityWeights = ComplexityWeights {
    local: 5,
    other_library: 4,
    legacy_components: 3,
    legacy_directives: 2,
};

impl Default for ComplexityWeights {
    fn default() -> Self {
        DEFAULT_COMPLEXITY_WEIGHTS
    }
}

impl ComplexityWeights {
    pub fn weight(&self, category: Category) -> u64 {
        match category {
            Category::Local => self.local,
            Category::OtherLibrary => self.other_library,
            Category::LegacyComponents => self.legacy_components,
            Category::LegacyDirectives => self.legacy_directives,
        }
    }

    /// Weighted sum of closure sizes.
    pub fn score(&self, closures: &Closures) -> u64 {
        Category::ALL
            .iter()
            .map(|&c| closures.get(c).len() as u64 * self.weight(c))
            .sum()
    }
}

/// Multipliers for migration value (components only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueWeights {
    pub dependent_components: u64,
    pub dependent_layouts: u64,
    pub dependent_pages: u64,
}

pub const DEFAULT_VALUE_WEIGHTS: ValueWeights = ValueWeights {
    dependent_components: 1,
    dependent_layouts: 3,
    dependent_pages: 2,
};

impl Default for ValueWeights {
    fn default() -> Self {
        DEFAULT_VALUE_WEIGHTS
    }
}

impl ValueWeights {
    pub fn score(&self, counts: &DependentCounts) -> u64 {
        counts.direct_components as u64 * self.dependent_components
            + counts.transitive_layouts as u64 * self.dependent_layouts
            + counts.transitive_pages as u64 * self.dependent_pages
    }
}

/// Both weight tables, as read from the `[weights]` config section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub complexity: ComplexityWeights,
    pub value: ValueWeights,
}

/// Reverse-dependency counts for one component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DependentCounts {
    /// Other components naming it in their direct `local_dependencies`.
    pub direct_components: usize,
    /// Layouts whose local closure contains it.
    pub transitive_layouts: usize,
    /// Pages whose local closure contains it.
    pub transitive_pages: usize,
}

/// Reverse-dependency counts for every referenced name, built in one pass.
///
/// Component dependents are counted from DIRECT dependencies; layout and page
/// dependents are counted from finished local CLOSURES. Layout and page
/// closures must be complete before this is built.
pub struct ReverseIndex<'a> {
    direct_components: HashMap<&'a str, usize>,
    transitive_layouts: HashMap<&'a str, usize>,
    transitive_pages: HashMap<&'a str, usize>,
}

impl<'a> ReverseIndex<'a> {
    pub fn build(
        components: &'a [DependencyRecord],
        layouts: &'a [DependencyRecord],
        pages: &'a [DependencyRecord],
    ) -> Self {
        let mut direct_components: HashMap<&str, usize> = HashMap::new();
        for component in components {
            for dep in &component.local_dependencies {
                if *dep == component.canonical_name {
                    continue;
                }
                *direct_components.entry(dep.as_str()).or_insert(0) += 1;
            }
        }

        Self {
            direct_components,
            transitive_layouts: count_closure_members(layouts),
            transitive_pages: count_closure_members(pages),
        }
    }

    /// Counts for `canonical_name`; names nobody references yield zeros.
    pub fn counts_for(&self, canonical_name: &str) -> DependentCounts {
        DependentCounts {
            direct_components: self.direct_components.get(canonical_name).copied().unwrap_or(0),
            transitive_layouts: self.transitive_layouts.get(canonical_name).copied().unwrap_or(0),
            transitive_pages: self.transitive_pages.get(canonical_name).copied().unwrap_or(0),
        }
    }
}

fn count_closure_members(records: &[DependencyRecord]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        for name in &record.closures.local {
            *counts.entry(name.as_str()).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn closures(local: usize, other: usize, comp: usize, dir: usize) -> Closures {
        let names = |prefix: &str, n: usize| -> BTreeSet<String> {
            (0..n).map(|i| format!("{prefix}{i}")).collect()
        };
        Closures {
            local: names("l", local),
            other_library: names("o", other),
            legacy_components: names("v-c", comp),
            legacy_directives: names("v-d", dir),
        }
    }

    #[test]
    fn test_default_complexity_weights() {
        let w = ComplexityWeights::default();
        assert_eq!(w.score(&closures(1, 0, 0, 0)), 5);
        assert_eq!(w.score(&closures(0, 1, 0, 0)), 4);
        assert_eq!(w.score(&closures(0, 0, 1, 0)), 3);
        assert_eq!(w.score(&closures(0, 0, 0, 1)), 2);
        assert_eq!(w.score(&closures(2, 1, 3, 4)), 10 + 4 + 9 + 8);
        assert_eq!(w.score(&Closures::default()), 0);
    }

    #[test]
    fn test_doubling_local_weight_only_moves_local_term() {
        let c = closures(3, 2, 1, 5);
        let base = ComplexityWeights::default();
        let doubled = ComplexityWeights {
            local: base.local * 2,
            ..base
        };
        let local_term = 3 * base.local;
        assert_eq!(doubled.score(&c) - base.score(&c), local_term);
    }

    #[test]
    fn test_value_weights() {
        let counts = DependentCounts {
            direct_components: 2,
            transitive_layouts: 1,
            transitive_pages: 3,
        };
        assert_eq!(ValueWeights::default().score(&counts), 2 + 3 + 6);
        assert_eq!(ValueWeights::default().score(&DependentCounts::default()), 0);
    }

    #[test]
    fn test_reverse_index_ignores_self_reference() {
        let mut a = DependencyRecord::new("components/A.vue", "A", "a");
        a.local_dependencies.insert("a".into());
        let mut b = DependencyRecord::new("components/B.vue", "B", "b");
        b.local_dependencies.insert("a".into());
        let components = vec![a, b];

        let index = ReverseIndex::build(&components, &[], &[]);
        assert_eq!(index.counts_for("a").direct_components, 1);
        assert_eq!(index.counts_for("b"), DependentCounts::default());
        assert_eq!(index.counts_for("never-referenced"), DependentCounts::default());
    }

    #[test]
    fn test_weights_deserialize_partial_table() {
        let weights: Weights = toml::from_str("[complexity]\nlocal = 7\n").unwrap();
        assert_eq!(weights.complexity.local, 7);
        assert_eq!(weights.complexity.other_library, 4);
        assert_eq!(weights.value, ValueWeights::default());
    }
}
