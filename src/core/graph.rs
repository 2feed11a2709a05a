//! Dependency graph between named references
//!
//! One node per reference, one edge per (dependency, dependent) pair, drawn
//! from the prerequisite toward the reference that uses it. Cycles and
//! parallel edges are allowed; every walk below tracks visited nodes.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, EdgeRef, Reversed};
use petgraph::Direction;

use crate::error::{RangeGraphError, RangeGraphResult};
use crate::types::{DependencyMap, GraphDescription};

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    node_indices: HashMap<String, NodeIndex>,
}

/// Build the graph from a dependency map.
///
/// Every key becomes a node, even without edges. For each reference `R`
/// and each `D` in its list an edge `D → R` is added, duplicates included.
/// A dependency that is not itself a key still gets a node.
pub fn build_graph(dependencies: &DependencyMap) -> DependencyGraph {
    let mut graph = DependencyGraph::default();

    for name in dependencies.keys() {
        graph.node(name);
    }

    for (name, deps) in dependencies {
        let dependent = graph.node(name);
        for dep in deps {
            let prerequisite = graph.node(dep);
            graph.graph.add_edge(prerequisite, dependent, ());
        }
    }

    graph
}

impl DependencyGraph {
    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_indices.insert(name.to_string(), idx);
        idx
    }

    fn index_of(&self, name: &str) -> RangeGraphResult<NodeIndex> {
        self.node_indices
            .get(name)
            .copied()
            .ok_or_else(|| RangeGraphError::UnknownReference(name.to_string()))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_indices.contains_key(name)
    }

    /// Node names in insertion order
    pub fn nodes(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].as_str())
            .collect()
    }

    /// `(prerequisite, dependent)` pairs in insertion order
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].as_str(),
                    self.graph[edge.target()].as_str(),
                )
            })
            .collect()
    }

    /// Names `name` uses directly
    pub fn direct_dependencies(&self, name: &str) -> RangeGraphResult<Vec<&str>> {
        let idx = self.index_of(name)?;
        Ok(self.sorted_unique(self.graph.neighbors_directed(idx, Direction::Incoming)))
    }

    /// Names that use `name` directly
    pub fn direct_dependents(&self, name: &str) -> RangeGraphResult<Vec<&str>> {
        let idx = self.index_of(name)?;
        Ok(self.sorted_unique(self.graph.neighbors_directed(idx, Direction::Outgoing)))
    }

    /// Every name `name` depends on, directly or transitively
    pub fn precedents(&self, name: &str) -> RangeGraphResult<Vec<&str>> {
        let start = self.index_of(name)?;
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, start);
        let mut found = Vec::new();
        while let Some(idx) = dfs.next(reversed) {
            if idx != start {
                found.push(idx);
            }
        }
        Ok(self.sorted_unique(found))
    }

    /// Every name that depends on `name`, directly or transitively
    pub fn dependents(&self, name: &str) -> RangeGraphResult<Vec<&str>> {
        let start = self.index_of(name)?;
        let mut dfs = Dfs::new(&self.graph, start);
        let mut found = Vec::new();
        while let Some(idx) = dfs.next(&self.graph) {
            if idx != start {
                found.push(idx);
            }
        }
        Ok(self.sorted_unique(found))
    }

    fn sorted_unique(&self, indices: impl IntoIterator<Item = NodeIndex>) -> Vec<&str> {
        let mut names: Vec<&str> = indices
            .into_iter()
            .map(|idx| self.graph[idx].as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Graphviz DOT rendering
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph {\n");
        for name in self.nodes() {
            dot.push_str(&format!("    {};\n", quote(name)));
        }
        for (from, to) in self.edges() {
            dot.push_str(&format!("    {} -> {};\n", quote(from), quote(to)));
        }
        dot.push_str("}\n");
        dot
    }

    pub fn describe(&self) -> GraphDescription {
        GraphDescription {
            nodes: self.nodes().into_iter().map(str::to_string).collect(),
            edges: self
                .edges()
                .into_iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            dot: self.to_dot(),
        }
    }
}

fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn deps(entries: &[(&str, Vec<&str>)]) -> DependencyMap {
        entries
            .iter()
            .map(|(name, deps)| {
                (
                    name.to_string(),
                    deps.iter().map(|d| d.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_single_edge_from_dependency_to_dependent() {
        let graph = build_graph(&deps(&[("Revenue", vec!["Sales"]), ("Sales", vec![])]));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges(), vec![("Sales", "Revenue")]);
    }

    #[test]
    fn test_isolated_nodes_are_kept() {
        let graph = build_graph(&deps(&[("A", vec![]), ("B", vec![]), ("C", vec![])]));
        assert_eq!(graph.nodes(), vec!["A", "B", "C"]);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_dependencies_make_parallel_edges() {
        let graph = build_graph(&deps(&[("Total", vec!["Sub", "Sub"]), ("Sub", vec![])]));
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edges(), vec![("Sub", "Total"), ("Sub", "Total")]);
        assert_eq!(graph.direct_dependencies("Total").unwrap(), vec!["Sub"]);
    }

    #[test]
    fn test_cycle_walks_terminate() {
        let graph = build_graph(&deps(&[("A", vec!["B"]), ("B", vec!["C"]), ("C", vec!["A"])]));
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.precedents("A").unwrap(), vec!["B", "C"]);
        assert_eq!(graph.dependents("A").unwrap(), vec!["B", "C"]);
    }

    #[test]
    fn test_transitive_precedents_and_dependents() {
        let graph = build_graph(&deps(&[
            ("Profit", vec!["Revenue", "Costs"]),
            ("Revenue", vec!["Sales"]),
            ("Costs", vec![]),
            ("Sales", vec![]),
        ]));
        assert_eq!(
            graph.precedents("Profit").unwrap(),
            vec!["Costs", "Revenue", "Sales"]
        );
        assert_eq!(graph.dependents("Sales").unwrap(), vec!["Profit", "Revenue"]);
        assert_eq!(graph.direct_dependents("Sales").unwrap(), vec!["Revenue"]);
        assert!(graph.precedents("Sales").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_name_is_error() {
        let graph = build_graph(&deps(&[("A", vec![])]));
        assert!(matches!(
            graph.precedents("Z"),
            Err(RangeGraphError::UnknownReference(_))
        ));
    }

    #[test]
    fn test_dangling_dependency_gets_node() {
        let graph = build_graph(&deps(&[("A", vec!["Outside"])]));
        assert!(graph.contains("Outside"));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_dot_output() {
        let graph = build_graph(&deps(&[("Revenue", vec!["Sales"]), ("Sales", vec![])]));
        assert_eq!(
            graph.to_dot(),
            "digraph {\n    \"Revenue\";\n    \"Sales\";\n    \"Sales\" -> \"Revenue\";\n}\n"
        );
    }

    #[test]
    fn test_dot_escapes_quotes() {
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_describe_matches_graph() {
        let graph = build_graph(&deps(&[("Revenue", vec!["Sales"]), ("Sales", vec![])]));
        let description = graph.describe();
        assert_eq!(description.nodes, vec!["Revenue", "Sales"]);
        assert_eq!(
            description.edges,
            vec![("Sales".to_string(), "Revenue".to_string())]
        );
        assert!(description.dot.starts_with("digraph {"));
    }
}
