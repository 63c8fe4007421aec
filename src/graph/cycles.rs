use petgraph::Directed;
use petgraph::algo::kosaraju_scc;
use petgraph::graph::{Graph, NodeIndex};
use serde::Serialize;

use crate::graph::DependencyGraph;

/// A set of components that reach each other through local dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentCycle {
    /// Canonical names of the members, sorted.
    pub members: Vec<String>,
}

/// Detect cycles in the component graph.
///
/// Uses Kosaraju's SCC algorithm on a petgraph copy of the arena, with one
/// edge per resolvable local dependency. SCCs with more than one member and
/// single components that depend on themselves are reported. Closures stay
/// correct on cyclic graphs; this is a diagnostic only.
///
/// Returns cycles sorted by their first member.
pub fn find_cycles(graph: &DependencyGraph<'_>) -> Vec<ComponentCycle> {
    let records = graph.records();

    // Node weights are arena positions, so node index i is record i.
    let mut component_graph: Graph<usize, (), Directed> = Graph::with_capacity(records.len(), 0);
    for idx in 0..records.len() {
        component_graph.add_node(idx);
    }

    for (src, record) in records.iter().enumerate() {
        for dep in &record.local_dependencies {
            if let Some(dst) = graph.index_of(dep) {
                component_graph.add_edge(NodeIndex::new(src), NodeIndex::new(dst), ());
            }
        }
    }

    let mut cycles: Vec<ComponentCycle> = kosaraju_scc(&component_graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || component_graph.contains_edge(scc[0], scc[0]))
        .map(|scc| {
            let mut members: Vec<String> = scc
                .iter()
                .map(|&n| records[component_graph[n]].canonical_name.clone())
                .collect();
            members.sort();
            ComponentCycle { members }
        })
        .collect();

    cycles.sort_by(|a, b| a.members[0].cmp(&b.members[0]));
    cycles
}
