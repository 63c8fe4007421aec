pub mod closure;
pub mod score;

use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::EngineError;
use crate::graph::DependencyGraph;
use crate::graph::cycles::{ComponentCycle, find_cycles};
use crate::graph::record::{Closures, DependencyRecord};

use closure::ClosureResolver;
use score::{ComplexityWeights, ReverseIndex, Weights};

/// Direct dependency records for a full scan, one vector per partition.
#[derive(Debug, Clone, Default)]
pub struct ScanInput {
    pub components: Vec<DependencyRecord>,
    pub layouts: Vec<DependencyRecord>,
    pub pages: Vec<DependencyRecord>,
}

/// A local dependency name that no component defines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingDependency {
    /// Path of the record that references the name.
    pub path: String,
    pub name: String,
}

/// Fully scored records plus scan diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    pub components: Vec<DependencyRecord>,
    pub layouts: Vec<DependencyRecord>,
    pub pages: Vec<DependencyRecord>,
    pub dangling: Vec<DanglingDependency>,
    pub cycles: Vec<ComponentCycle>,
}

/// Compute closures and scores for every record.
///
/// Phases run in a fixed order and each one finishes before the next starts:
///
/// 1. index the components partition (duplicate names are fatal)
/// 2. closures + complexity for components
/// 3. closures + complexity for layouts and pages
/// 4. value for components, from direct component dependents and from the
///    finished layout/page closures
///
/// Derived fields from any earlier run are discarded first, so the result
/// depends only on the direct data.
pub fn run(input: ScanInput, weights: &Weights) -> Result<ScanOutput, EngineError> {
    let ScanInput {
        mut components,
        mut layouts,
        mut pages,
    } = input;

    for record in components.iter_mut().chain(&mut layouts).chain(&mut pages) {
        record.clear_derived();
    }

    let (component_closures, layout_closures, page_closures, dangling, cycles) = {
        let start = Instant::now();
        let graph = DependencyGraph::build(&components)?;
        let resolver = ClosureResolver::new(&graph);
        let dangling = collect_dangling(&graph, [&components, &layouts, &pages]);
        let cycles = find_cycles(&graph);

        let component_closures: Vec<Closures> =
            components.par_iter().map(|r| resolver.closures(r)).collect();
        tracing::info!(
            components = components.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "component closures resolved"
        );

        let layout_closures: Vec<Closures> =
            layouts.par_iter().map(|r| resolver.closures(r)).collect();
        let page_closures: Vec<Closures> =
            pages.par_iter().map(|r| resolver.closures(r)).collect();
        tracing::info!(
            layouts = layouts.len(),
            pages = pages.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "layout and page closures resolved"
        );

        (component_closures, layout_closures, page_closures, dangling, cycles)
    };

    apply_closures(&mut components, component_closures, &weights.complexity);
    apply_closures(&mut layouts, layout_closures, &weights.complexity);
    apply_closures(&mut pages, page_closures, &weights.complexity);

    let values: Vec<u64> = {
        let index = ReverseIndex::build(&components, &layouts, &pages);
        components
            .iter()
            .map(|c| weights.value.score(&index.counts_for(&c.canonical_name)))
            .collect()
    };
    for (component, value) in components.iter_mut().zip(values) {
        component.migration_value = Some(value);
    }

    Ok(ScanOutput {
        components,
        layouts,
        pages,
        dangling,
        cycles,
    })
}

fn apply_closures(
    records: &mut [DependencyRecord],
    closures: Vec<Closures>,
    weights: &ComplexityWeights,
) {
    for (record, closures) in records.iter_mut().zip(closures) {
        record.migration_complexity = weights.score(&closures);
        record.closures = closures;
    }
}

/// Every unresolvable direct local dependency, in partition then path order.
fn collect_dangling(
    graph: &DependencyGraph<'_>,
    partitions: [&[DependencyRecord]; 3],
) -> Vec<DanglingDependency> {
    let mut dangling = Vec::new();
    for record in partitions.into_iter().flatten() {
        for name in graph.dangling(record) {
            tracing::warn!(path = %record.path, name, "dangling local dependency");
            dangling.push(DanglingDependency {
                path: record.path.clone(),
                name: name.to_string(),
            });
        }
    }
    dangling
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::graph::record::Category;
    use score::{ComplexityWeights, ValueWeights};

    fn record(dir: &str, name: &str, deps: &[&str]) -> DependencyRecord {
        let mut r = DependencyRecord::new(format!("{dir}/{name}.vue"), name, name);
        r.local_dependencies = set(deps);
        r
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn find<'a>(records: &'a [DependencyRecord], name: &str) -> &'a DependencyRecord {
        records.iter().find(|r| r.canonical_name == name).unwrap()
    }

    /// Components A <- B <- C, page P -> C.
    fn chain_input() -> ScanInput {
        ScanInput {
            components: vec![
                record("components", "a", &[]),
                record("components", "b", &["a"]),
                record("components", "c", &["b"]),
            ],
            layouts: vec![],
            pages: vec![record("pages", "p", &["c"])],
        }
    }

    #[test]
    fn test_end_to_end_chain_scenario() {
        let out = run(chain_input(), &Weights::default()).unwrap();

        let a = find(&out.components, "a");
        let b = find(&out.components, "b");
        let c = find(&out.components, "c");
        assert!(a.closures.local.is_empty());
        assert_eq!(b.closures.local, set(&["a"]));
        assert_eq!(c.closures.local, set(&["a", "b"]));
        assert_eq!(a.migration_complexity, 0);
        assert_eq!(b.migration_complexity, 5);
        assert_eq!(c.migration_complexity, 10);

        let p = &out.pages[0];
        assert_eq!(p.closures.local, set(&["a", "b", "c"]));
        assert_eq!(p.migration_complexity, 15);
        assert_eq!(p.migration_value, None, "pages carry no value");

        // A: B directly (1 x W_depComp) + P transitively (1 x W_depPage).
        // C is not a direct dependent of A, and P is never counted under W_depComp.
        assert_eq!(a.migration_value, Some(1 + 2));
        assert_eq!(b.migration_value, Some(1 + 2));
        assert_eq!(c.migration_value, Some(2));
    }

    #[test]
    fn test_asymmetric_reverse_counting() {
        // X is used directly by Y; page P reaches X only through Y.
        let input = ScanInput {
            components: vec![
                record("components", "x", &[]),
                record("components", "y", &["x"]),
                record("components", "z", &["y"]),
            ],
            layouts: vec![record("layouts", "default", &["y"])],
            pages: vec![record("pages", "p", &["y"])],
        };
        let out = run(input, &Weights::default()).unwrap();

        let x = find(&out.components, "x");
        assert!(!out.pages[0].local_dependencies.contains("x"));
        // Y directly (1), default layout transitively (3), P transitively (2).
        // Z reaches X only transitively, so it is not a direct dependent.
        assert_eq!(x.migration_value, Some(1 + 3 + 2));
    }

    #[test]
    fn test_value_weights_are_configurable() {
        let weights = Weights {
            complexity: ComplexityWeights::default(),
            value: ValueWeights {
                dependent_components: 10,
                dependent_layouts: 0,
                dependent_pages: 100,
            },
        };
        let out = run(chain_input(), &weights).unwrap();
        assert_eq!(find(&out.components, "a").migration_value, Some(10 + 100));
    }

    #[test]
    fn test_cycle_nodes_share_union() {
        let mut components = vec![
            record("components", "a", &["b"]),
            record("components", "b", &["c"]),
            record("components", "c", &["a"]),
        ];
        components[0].other_library_dependencies = set(&["draggable"]);
        components[1].other_library_dependencies = set(&["quill-editor"]);
        components[2].other_library_dependencies = set(&["tip-tap"]);

        let out = run(
            ScanInput {
                components,
                ..ScanInput::default()
            },
            &Weights::default(),
        )
        .unwrap();

        for component in &out.components {
            assert_eq!(
                component.closures.other_library,
                set(&["draggable", "quill-editor", "tip-tap"])
            );
        }
        assert_eq!(out.cycles.len(), 1);
        assert_eq!(out.cycles[0].members, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dangling_reported_and_kept_in_direct_list() {
        let input = ScanInput {
            components: vec![
                record("components", "a", &["ghost"]),
                record("components", "b", &["a"]),
            ],
            layouts: vec![],
            pages: vec![record("pages", "p", &["b", "missing-widget"])],
        };
        let out = run(input, &Weights::default()).unwrap();

        let a = find(&out.components, "a");
        assert!(a.local_dependencies.contains("ghost"));
        assert!(!a.closures.local.contains("ghost"));
        assert!(!out.pages[0].closures.local.contains("ghost"));
        assert_eq!(out.pages[0].closures.local, set(&["a", "b"]));
        assert_eq!(
            out.dangling,
            vec![
                DanglingDependency {
                    path: "components/a.vue".into(),
                    name: "ghost".into(),
                },
                DanglingDependency {
                    path: "pages/p.vue".into(),
                    name: "missing-widget".into(),
                },
            ]
        );
    }

    #[test]
    fn test_self_inclusion() {
        let mut components = vec![
            record("components", "a", &[]),
            record("components", "b", &["a"]),
        ];
        components[0].legacy_components = set(&["v-btn", "v-card"]);
        components[1].legacy_directives = set(&["v-ripple"]);
        components[1].other_library_dependencies = set(&["line-chart"]);
        let mut page = record("pages", "p", &["b"]);
        page.legacy_components = set(&["v-data-table"]);

        let out = run(
            ScanInput {
                components,
                layouts: vec![],
                pages: vec![page],
            },
            &Weights::default(),
        )
        .unwrap();

        for r in out.components.iter().chain(&out.pages) {
            for category in Category::ALL {
                assert!(
                    r.closures.get(category).is_superset(category.direct(r)),
                    "{} {:?}",
                    r.path,
                    category
                );
            }
        }
    }

    #[test]
    fn test_idempotent_over_unchanged_input() {
        let first = run(chain_input(), &Weights::default()).unwrap();
        let rerun_input = ScanInput {
            components: first.components.clone(),
            layouts: first.layouts.clone(),
            pages: first.pages.clone(),
        };
        let second = run(rerun_input, &Weights::default()).unwrap();
        assert_eq!(first.components, second.components);
        assert_eq!(first.pages, second.pages);
    }

    #[test]
    fn test_duplicate_component_stops_scan() {
        let input = ScanInput {
            components: vec![
                DependencyRecord::new("components/a/Card.vue", "Card", "card"),
                DependencyRecord::new("components/b/Card.vue", "Card", "card"),
            ],
            ..ScanInput::default()
        };
        assert!(matches!(
            run(input, &Weights::default()),
            Err(EngineError::DuplicateComponent { .. })
        ));
    }

    #[test]
    fn test_doubling_local_weight_leaves_other_terms() {
        let input = || {
            let mut input = chain_input();
            let a = &mut input.components[0];
            a.other_library_dependencies = set(&["nuxt-link"]);
            a.legacy_components = set(&["v-btn"]);
            a.legacy_directives = set(&["v-ripple"]);
            input
        };
        let base = run(input(), &Weights::default()).unwrap();
        let doubled_weights = Weights {
            complexity: ComplexityWeights {
                local: 10,
                ..ComplexityWeights::default()
            },
            value: ValueWeights::default(),
        };
        let doubled = run(input(), &doubled_weights).unwrap();

        let c = find(&base.components, "c");
        assert_eq!(c.closures.other_library, set(&["nuxt-link"]));
        assert_eq!(c.closures.legacy_components, set(&["v-btn"]));
        assert_eq!(c.closures.legacy_directives, set(&["v-ripple"]));
        assert_eq!(c.migration_complexity, 2 * 5 + 4 + 3 + 2);

        for (b, d) in base.components.iter().zip(&doubled.components) {
            let local_term = 5 * b.closures.local.len() as u64;
            assert_eq!(d.migration_complexity - b.migration_complexity, local_term);
            assert_eq!(d.migration_value, b.migration_value);
        }
    }
}
