use std::collections::{BTreeSet, HashSet};

use crate::graph::DependencyGraph;
use crate::graph::record::{Category, Closures, DependencyRecord};

/// Computes per-category transitive closures over the component graph.
///
/// Traversal is an iterative depth-first walk with an explicit stack and a
/// visited-set of canonical names, so cyclic graphs terminate and stack depth
/// never grows with graph depth. Each category is resolved independently.
pub struct ClosureResolver<'g, 'a> {
    graph: &'g DependencyGraph<'a>,
}

impl<'g, 'a> ClosureResolver<'g, 'a> {
    pub fn new(graph: &'g DependencyGraph<'a>) -> Self {
        Self { graph }
    }

    /// Union of `category`'s direct values over `start` and every component
    /// reachable from it through `local_dependencies` edges.
    ///
    /// Dangling local names are neither followed nor collected; for
    /// `Category::Local` only names that resolve enter the result.
    pub fn closure(&self, start: &DependencyRecord, category: Category) -> BTreeSet<String> {
        let mut pool = BTreeSet::new();
        self.collect(start, category, &mut pool);

        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = start
            .local_dependencies
            .iter()
            .map(String::as_str)
            .collect();

        while let Some(name) = stack.pop() {
            if visited.contains(name) {
                continue;
            }
            let Some(dependency) = self.graph.resolve(name) else {
                continue;
            };
            visited.insert(name);
            self.collect(dependency, category, &mut pool);
            stack.extend(
                dependency
                    .local_dependencies
                    .iter()
                    .map(String::as_str)
                    .filter(|next| !visited.contains(next)),
            );
        }

        pool
    }

    /// All four closures of `start`, one traversal per category.
    pub fn closures(&self, start: &DependencyRecord) -> Closures {
        let mut closures = Closures::default();
        for category in Category::ALL {
            *closures.get_mut(category) = self.closure(start, category);
        }
        closures
    }

    fn collect(&self, record: &DependencyRecord, category: Category, pool: &mut BTreeSet<String>) {
        for value in category.direct(record) {
            if category == Category::Local && !self.graph.contains(value) {
                continue;
            }
            if !pool.contains(value) {
                pool.insert(value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str, deps: &[&str], other: &[&str]) -> DependencyRecord {
        let mut r = DependencyRecord::new(format!("components/{name}.vue"), name, name);
        r.local_dependencies = deps.iter().map(|d| d.to_string()).collect();
        r.other_library_dependencies = other.iter().map(|d| d.to_string()).collect();
        r
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_chain_closure_collects_transitive_values() {
        let components = vec![
            component("a", &[], &["draggable"]),
            component("b", &["a"], &[]),
            component("c", &["b"], &["line-chart"]),
        ];
        let graph = DependencyGraph::build(&components).unwrap();
        let resolver = ClosureResolver::new(&graph);

        assert_eq!(resolver.closure(&components[2], Category::Local), set(&["a", "b"]));
        assert_eq!(
            resolver.closure(&components[2], Category::OtherLibrary),
            set(&["draggable", "line-chart"])
        );
        assert!(resolver.closure(&components[0], Category::Local).is_empty());
    }

    #[test]
    fn test_three_node_cycle_terminates_with_full_union() {
        let components = vec![
            component("a", &["b"], &["tag-a"]),
            component("b", &["c"], &["tag-b"]),
            component("c", &["a"], &["tag-c"]),
        ];
        let graph = DependencyGraph::build(&components).unwrap();
        let resolver = ClosureResolver::new(&graph);

        for record in &components {
            assert_eq!(
                resolver.closure(record, Category::OtherLibrary),
                set(&["tag-a", "tag-b", "tag-c"]),
                "{} should see every tag in the cycle",
                record.canonical_name
            );
            assert_eq!(resolver.closure(record, Category::Local), set(&["a", "b", "c"]));
        }
    }

    #[test]
    fn test_self_loop_terminates() {
        let components = vec![component("a", &["a"], &["x"])];
        let graph = DependencyGraph::build(&components).unwrap();
        let resolver = ClosureResolver::new(&graph);
        assert_eq!(resolver.closure(&components[0], Category::Local), set(&["a"]));
        assert_eq!(resolver.closure(&components[0], Category::OtherLibrary), set(&["x"]));
    }

    #[test]
    fn test_dangling_name_excluded_from_local_closure() {
        let components = vec![
            component("a", &["b", "ghost"], &[]),
            component("b", &["phantom"], &["quill-editor"]),
        ];
        let graph = DependencyGraph::build(&components).unwrap();
        let resolver = ClosureResolver::new(&graph);

        let local = resolver.closure(&components[0], Category::Local);
        assert_eq!(local, set(&["b"]));
        assert!(components[0].local_dependencies.contains("ghost"));
        assert_eq!(
            resolver.closure(&components[0], Category::OtherLibrary),
            set(&["quill-editor"])
        );
    }

    #[test]
    fn test_root_record_outside_graph_uses_components() {
        let components = vec![component("a", &[], &["draggable"]), component("b", &["a"], &[])];
        let graph = DependencyGraph::build(&components).unwrap();
        let resolver = ClosureResolver::new(&graph);

        let mut page = DependencyRecord::new("pages/index.vue", "index", "index");
        page.local_dependencies = set(&["b"]);
        page.legacy_components = set(&["v-btn"]);

        let closures = resolver.closures(&page);
        assert_eq!(closures.local, set(&["a", "b"]));
        assert_eq!(closures.other_library, set(&["draggable"]));
        assert_eq!(closures.legacy_components, set(&["v-btn"]));
        assert!(closures.legacy_directives.is_empty());
    }

    #[test]
    fn test_diamond_visits_shared_dependency_once() {
        let components = vec![
            component("base", &[], &["tip-tap"]),
            component("left", &["base"], &[]),
            component("right", &["base"], &[]),
            component("top", &["left", "right"], &[]),
        ];
        let graph = DependencyGraph::build(&components).unwrap();
        let resolver = ClosureResolver::new(&graph);
        assert_eq!(
            resolver.closure(&components[3], Category::Local),
            set(&["base", "left", "right"])
        );
    }
}
