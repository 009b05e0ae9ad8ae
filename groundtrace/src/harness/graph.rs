//! Wire Connectivity Graph
//!
//! Undirected graph of connector pins, weld points and inline splices built
//! from a single wire list snapshot using petgraph. Nodes are
//! [`ConnectorNode`]s; every wire segment becomes one edge between its two
//! pinned endpoints. Synthetic edges join weld points and inline splices:
//! - weld point: bare code <-> every pinned node landing on it
//! - inline splice: bare code <-> bare code when both ends are inline codes

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::{Bfs, EdgeRef};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use super::schema::{ConnectorNode, WireEdge};

/// Why a wire list row was left out of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    MissingFromCode,
    MissingToCode,
    MissingBothCodes,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingFromCode => f.write_str("missing from code"),
            SkipReason::MissingToCode => f.write_str("missing to code"),
            SkipReason::MissingBothCodes => f.write_str("missing from and to code"),
        }
    }
}

/// A wire list row rejected by the graph builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: SkipReason,
}

/// Outcome of a graph build besides the graph itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildReport {
    pub wires_read: usize,
    pub wires_added: usize,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone)]
pub struct ConnectivityGraph {
    graph: UnGraph<ConnectorNode, ()>,

    /// node identity -> node index
    indices: HashMap<ConnectorNode, NodeIndex>,

    /// code -> all node indices carrying that code, in insertion order
    code_indices: HashMap<String, Vec<NodeIndex>>,
}

impl ConnectivityGraph {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            indices: HashMap::new(),
            code_indices: HashMap::new(),
        }
    }

    /// Build the graph from wire segments.
    ///
    /// The result does not depend on the order of `wires`. Rows with an empty
    /// from or to code are not added and are listed in the report instead.
    pub fn build(
        wires: &[WireEdge],
        welds: &BTreeSet<String>,
        inlines: &BTreeSet<String>,
    ) -> (Self, BuildReport) {
        let mut graph = Self::new();
        let mut report = BuildReport {
            wires_read: wires.len(),
            ..BuildReport::default()
        };

        for wire in wires {
            let reason = match (wire.from_code.is_empty(), wire.to_code.is_empty()) {
                (true, true) => Some(SkipReason::MissingBothCodes),
                (true, false) => Some(SkipReason::MissingFromCode),
                (false, true) => Some(SkipReason::MissingToCode),
                (false, false) => None,
            };
            if let Some(reason) = reason {
                tracing::warn!("Skipping wire list row {}: {}", wire.row, reason);
                report.skipped.push(SkippedRow {
                    row: wire.row,
                    reason,
                });
                continue;
            }

            let from = graph.ensure_node(wire.from_node());
            let to = graph.ensure_node(wire.to_node());
            graph.connect(from, to);

            let from_bare = graph.ensure_node(ConnectorNode::bare(&wire.from_code));
            let to_bare = graph.ensure_node(ConnectorNode::bare(&wire.to_code));

            if welds.contains(&wire.from_code) {
                graph.connect(from_bare, from);
            }
            if welds.contains(&wire.to_code) {
                graph.connect(to_bare, to);
            }

            if inlines.contains(&wire.from_code) && inlines.contains(&wire.to_code) {
                graph.connect(from_bare, to_bare);
            }

            report.wires_added += 1;
        }

        tracing::debug!(
            "Connectivity graph: {} nodes, {} edges, {} rows skipped",
            graph.node_count(),
            graph.edge_count(),
            report.skipped.len()
        );

        (graph, report)
    }

    fn ensure_node(&mut self, node: ConnectorNode) -> NodeIndex {
        if let Some(&idx) = self.indices.get(&node) {
            return idx;
        }
        let code = node.code.clone();
        let idx = self.graph.add_node(node.clone());
        self.indices.insert(node, idx);
        self.code_indices.entry(code).or_default().push(idx);
        idx
    }

    /// Add an edge unless one already joins the two nodes.
    fn connect(&mut self, a: NodeIndex, b: NodeIndex) {
        if self.graph.find_edge(a, b).is_none() {
            self.graph.add_edge(a, b, ());
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, node: &ConnectorNode) -> bool {
        self.indices.contains_key(node)
    }

    pub fn has_edge(&self, a: &ConnectorNode, b: &ConnectorNode) -> bool {
        match (self.indices.get(a), self.indices.get(b)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ConnectorNode> {
        self.graph.node_weights()
    }

    /// All nodes carrying `code`, bare or pinned.
    pub fn nodes_for_code(&self, code: &str) -> Vec<&ConnectorNode> {
        self.code_indices
            .get(code)
            .map(|indices| indices.iter().map(|&idx| &self.graph[idx]).collect())
            .unwrap_or_default()
    }

    /// Connected component containing `node`, or `None` if the node is absent.
    pub fn component_of(&self, node: &ConnectorNode) -> Option<Vec<&ConnectorNode>> {
        let &start = self.indices.get(node)?;
        Some(self.reachable_from(&[start]))
    }

    /// Electrical net of a code: every node reachable from any node carrying
    /// that code. `None` if the code never appears in the graph.
    pub fn net_of_code(&self, code: &str) -> Option<Vec<&ConnectorNode>> {
        let starts = self.code_indices.get(code)?;
        Some(self.reachable_from(starts))
    }

    fn reachable_from(&self, starts: &[NodeIndex]) -> Vec<&ConnectorNode> {
        let mut seen: HashSet<NodeIndex> = HashSet::new();
        let mut reached = Vec::new();

        for &start in starts {
            if seen.contains(&start) {
                continue;
            }
            let mut bfs = Bfs::new(&self.graph, start);
            while let Some(idx) = bfs.next(&self.graph) {
                if seen.insert(idx) {
                    reached.push(&self.graph[idx]);
                }
            }
        }

        reached
    }

    /// Label every node with its connected component in one union-find pass.
    pub fn component_labels(&self) -> ComponentLabels<'_> {
        let mut sets: UnionFind<usize> = UnionFind::new(self.graph.node_count());
        for edge in self.graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }
        ComponentLabels {
            graph: self,
            labels: sets.into_labeling(),
        }
    }

    pub fn stats(&self) -> GraphStats {
        let bare_nodes = self.graph.node_weights().filter(|n| n.is_bare()).count();
        GraphStats {
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            bare_nodes,
            pinned_nodes: self.graph.node_count() - bare_nodes,
            component_count: petgraph::algo::connected_components(&self.graph),
        }
    }
}

impl Default for ConnectivityGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Component label of every node, computed once for the whole graph.
pub struct ComponentLabels<'a> {
    graph: &'a ConnectivityGraph,
    labels: Vec<usize>,
}

impl<'a> ComponentLabels<'a> {
    /// Distinct component labels touched by any node carrying `code`.
    pub fn labels_of_code(&self, code: &str) -> BTreeSet<usize> {
        self.graph
            .code_indices
            .get(code)
            .map(|indices| indices.iter().map(|idx| self.labels[idx.index()]).collect())
            .unwrap_or_default()
    }

    /// `(node, label)` for every node in the graph.
    pub fn iter(&self) -> impl Iterator<Item = (&'a ConnectorNode, usize)> + '_ {
        let graph = self.graph;
        let labels = &self.labels;
        graph
            .graph
            .node_indices()
            .map(move |idx| (&graph.graph[idx], labels[idx.index()]))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub bare_nodes: usize,
    pub pinned_nodes: usize,
    pub component_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_wire_adds_pinned_edge_and_bare_nodes() {
        let wires = vec![WireEdge::new("A", "1", "G1", "1")];
        let (graph, report) = ConnectivityGraph::build(&wires, &set(&[]), &set(&[]));

        assert!(graph.has_edge(&ConnectorNode::pinned("A", "1"), &ConnectorNode::pinned("G1", "1")));
        assert!(graph.contains(&ConnectorNode::bare("A")));
        assert!(graph.contains(&ConnectorNode::bare("G1")));
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(report.wires_added, 1);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_bare_node_standalone_without_weld() {
        let wires = vec![WireEdge::new("A", "1", "B", "2")];
        let (graph, _) = ConnectivityGraph::build(&wires, &set(&[]), &set(&[]));
        let component = graph.component_of(&ConnectorNode::bare("A")).unwrap();
        assert_eq!(component.len(), 1);
    }

    #[test]
    fn test_weld_joins_all_pins() {
        let wires = vec![
            WireEdge::new("A", "1", "W1", "X"),
            WireEdge::new("B", "3", "W1", "Y"),
        ];
        let (graph, _) = ConnectivityGraph::build(&wires, &set(&["W1"]), &set(&[]));

        let component = graph.component_of(&ConnectorNode::pinned("A", "1")).unwrap();
        assert!(component.contains(&&ConnectorNode::pinned("B", "3")));
        assert!(component.contains(&&ConnectorNode::bare("W1")));
    }

    #[test]
    fn test_inline_bare_nodes_linked() {
        let wires = vec![WireEdge::new("IL1", "4", "IL2", "7")];
        let (graph, _) = ConnectivityGraph::build(&wires, &set(&[]), &set(&["IL1", "IL2"]));
        assert!(graph.has_edge(&ConnectorNode::bare("IL1"), &ConnectorNode::bare("IL2")));
    }

    #[test]
    fn test_inline_requires_both_ends() {
        let wires = vec![WireEdge::new("IL1", "4", "A", "7")];
        let (graph, _) = ConnectivityGraph::build(&wires, &set(&[]), &set(&["IL1"]));
        assert!(!graph.has_edge(&ConnectorNode::bare("IL1"), &ConnectorNode::bare("A")));
    }

    #[test]
    fn test_missing_codes_reported() {
        let wires = vec![
            WireEdge::new("", "1", "G1", "1").at_row(2),
            WireEdge::new("A", "1", "", "1").at_row(3),
            WireEdge::new("", "", "", "").at_row(4),
            WireEdge::new("A", "1", "G1", "1").at_row(5),
        ];
        let (graph, report) = ConnectivityGraph::build(&wires, &set(&[]), &set(&[]));

        assert_eq!(report.wires_read, 4);
        assert_eq!(report.wires_added, 1);
        assert_eq!(
            report.skipped,
            vec![
                SkippedRow { row: 2, reason: SkipReason::MissingFromCode },
                SkippedRow { row: 3, reason: SkipReason::MissingToCode },
                SkippedRow { row: 4, reason: SkipReason::MissingBothCodes },
            ]
        );
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_duplicate_wires_idempotent() {
        let wires = vec![
            WireEdge::new("A", "1", "B", "1"),
            WireEdge::new("B", "1", "A", "1"),
        ];
        let (graph, _) = ConnectivityGraph::build(&wires, &set(&[]), &set(&[]));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_order_independent() {
        let wires = vec![
            WireEdge::new("A", "1", "W1", "X"),
            WireEdge::new("W1", "X", "B", "2"),
            WireEdge::new("C", "5", "D", "6"),
        ];
        let reversed: Vec<_> = wires.iter().rev().cloned().collect();
        let welds = set(&["W1"]);

        let (g1, _) = ConnectivityGraph::build(&wires, &welds, &set(&[]));
        let (g2, _) = ConnectivityGraph::build(&reversed, &welds, &set(&[]));

        assert_eq!(g1.node_count(), g2.node_count());
        assert_eq!(g1.edge_count(), g2.edge_count());
        let mut n1: Vec<_> = g1.nodes().cloned().collect();
        let mut n2: Vec<_> = g2.nodes().cloned().collect();
        n1.sort();
        n2.sort();
        assert_eq!(n1, n2);
    }

    #[test]
    fn test_net_of_code_unions_pins() {
        let wires = vec![
            WireEdge::new("A", "1", "G1", "1"),
            WireEdge::new("G1", "2", "G2", "1"),
        ];
        let (graph, _) = ConnectivityGraph::build(&wires, &set(&[]), &set(&[]));

        let net = graph.net_of_code("G1").unwrap();
        assert!(net.contains(&&ConnectorNode::pinned("A", "1")));
        assert!(net.contains(&&ConnectorNode::pinned("G2", "1")));
        assert!(graph.net_of_code("G3").is_none());
    }

    #[test]
    fn test_component_labels_match_bfs() {
        let wires = vec![
            WireEdge::new("A", "1", "B", "1"),
            WireEdge::new("C", "1", "D", "1"),
        ];
        let (graph, _) = ConnectivityGraph::build(&wires, &set(&[]), &set(&[]));
        let labels = graph.component_labels();

        let a = labels.labels_of_code("A");
        let b = labels.labels_of_code("B");
        let c = labels.labels_of_code("C");
        // bare nodes sit in their own components
        assert_eq!(a.len(), 2);
        assert!(!a.is_disjoint(&b));
        assert!(a.is_disjoint(&c));
    }

    #[test]
    fn test_graph_stats() {
        let wires = vec![WireEdge::new("A", "1", "W1", "X")];
        let (graph, _) = ConnectivityGraph::build(&wires, &set(&["W1"]), &set(&[]));
        let stats = graph.stats();

        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.bare_nodes, 2);
        assert_eq!(stats.pinned_nodes, 2);
        assert_eq!(stats.edge_count, 2);
        // {A:1, W1:X, W1} and {A}
        assert_eq!(stats.component_count, 2);
    }
}
