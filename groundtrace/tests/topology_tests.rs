//! Connectivity and topology classification tests

use groundtrace::{classify_ground, ConnectivityGraph, ConnectorNode, TopologyClassifier, TopologyType, WireEdge};
use std::collections::BTreeSet;

fn set(codes: &[&str]) -> BTreeSet<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

#[test]
fn test_every_complete_wire_becomes_an_edge() {
    let wires = vec![
        WireEdge::new("X1", "1", "X2", "5"),
        WireEdge::new("X2", "6", "G1", "1"),
        WireEdge::new("X3", "A", "X1", "B"),
    ];
    let (graph, report) = ConnectivityGraph::build(&wires, &set(&[]), &set(&[]));

    for wire in &wires {
        assert!(graph.has_edge(&wire.from_node(), &wire.to_node()), "{:?}", wire);
    }
    assert_eq!(report.wires_added, 3);
}

#[test]
fn test_weld_pins_share_component_with_bare_node() {
    let wires = vec![
        WireEdge::new("X1", "1", "SP1", "X"),
        WireEdge::new("SP1", "Y", "X2", "3"),
        WireEdge::new("SP1", "Z", "X3", "9"),
    ];
    let (graph, _) = ConnectivityGraph::build(&wires, &set(&["SP1"]), &set(&[]));

    let component = graph.component_of(&ConnectorNode::bare("SP1")).unwrap();
    for node in graph.nodes_for_code("SP1") {
        assert!(component.contains(&node), "{node} not joined to weld");
    }
    assert!(component.contains(&&ConnectorNode::pinned("X3", "9")));
}

#[test]
fn test_single_ground_scenario() {
    // A is a weld so its bare node joins the component
    let wires = vec![WireEdge::new("A", "1", "G1", "1")];
    let (graph, _) = ConnectivityGraph::build(&wires, &set(&["A"]), &set(&[]));

    let component = graph.component_of(&ConnectorNode::pinned("G1", "1")).unwrap();
    assert_eq!(component.len(), 3);

    let grounds = set(&["G1"]);
    let classifier = TopologyClassifier::new(&graph, &grounds);
    assert_eq!(classifier.classify("G1"), TopologyType::SingleCircuit);
}

#[test]
fn test_bussed_grounds_scenario() {
    let wires = vec![
        WireEdge::new("A", "1", "G1", "1"),
        WireEdge::new("G1", "2", "G2", "1"),
    ];
    let grounds = set(&["G1", "G2"]);

    for ground in ["G1", "G2"] {
        assert_eq!(
            classify_ground(ground, &wires, &grounds, &set(&[]), &set(&[])),
            TopologyType::MultiCircuitBus,
            "{ground}"
        );
    }
}

#[test]
fn test_unwired_ground_scenario() {
    let wires = vec![WireEdge::new("A", "1", "G1", "1")];
    let grounds = set(&["G1", "G3"]);

    assert_eq!(
        classify_ground("G3", &wires, &grounds, &set(&[]), &set(&[])),
        TopologyType::Unknown
    );
}

#[test]
fn test_inline_bare_nodes_connect_independent_of_pins() {
    let wires = vec![
        WireEdge::new("IL1", "1", "IL2", "8"),
        WireEdge::new("X1", "1", "IL1", "2"),
        WireEdge::new("IL2", "5", "G1", "1"),
    ];
    let (graph, _) = ConnectivityGraph::build(&wires, &set(&[]), &set(&["IL1", "IL2"]));

    assert!(graph.has_edge(&ConnectorNode::bare("IL1"), &ConnectorNode::bare("IL2")));
    // pins 2 and 5 are not routed through the pin-level edge
    let x1 = graph.component_of(&ConnectorNode::pinned("X1", "1")).unwrap();
    assert!(!x1.contains(&&ConnectorNode::pinned("G1", "1")));
}

#[test]
fn test_every_ground_on_shared_net_is_bus() {
    let wires = vec![
        WireEdge::new("SP1", "X", "G1", "1"),
        WireEdge::new("SP1", "X", "G2", "1"),
        WireEdge::new("SP1", "X", "G3", "1"),
        WireEdge::new("X1", "1", "G4", "1"),
    ];
    let grounds = set(&["G1", "G2", "G3", "G4"]);
    let (graph, _) = ConnectivityGraph::build(&wires, &set(&["SP1"]), &set(&[]));
    let classifier = TopologyClassifier::new(&graph, &grounds);

    let all = classifier.classify_all();
    let bus: Vec<_> = all
        .iter()
        .filter(|c| c.topology == TopologyType::MultiCircuitBus)
        .map(|c| c.ground.as_str())
        .collect();
    assert_eq!(bus, vec!["G1", "G2", "G3"]);
    assert_eq!(classifier.classify("G4"), TopologyType::SingleCircuit);
}

#[test]
fn test_classification_is_repeatable() {
    let wires = vec![
        WireEdge::new("X1", "1", "G1", "1"),
        WireEdge::new("X1", "1", "G2", "1"),
        WireEdge::new("X2", "1", "G3", "1"),
    ];
    let grounds = set(&["G1", "G2", "G3"]);
    let (graph, _) = ConnectivityGraph::build(&wires, &set(&[]), &set(&[]));
    let classifier = TopologyClassifier::new(&graph, &grounds);

    let first: Vec<_> = ["G1", "G2", "G3"].iter().map(|g| classifier.classify(g)).collect();
    let second: Vec<_> = ["G1", "G2", "G3"].iter().map(|g| classifier.classify(g)).collect();
    assert_eq!(first, second);
}
