//! Ground Topology Classifier
//!
//! Decides whether a ground terminal is the only return point on its
//! electrical net (single-circuit) or is bussed together with other ground
//! terminals (multi-circuit-bus). The net of a ground terminal is the union
//! of the connected components of every node carrying its code, so the
//! result never depends on wire list order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::graph::ConnectivityGraph;
use super::schema::TopologyType;

/// Classification of one ground terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundClassification {
    pub ground: String,
    pub topology: TopologyType,
    /// Other ground terminals on the same net.
    pub shared_with: Vec<String>,
}

pub struct TopologyClassifier<'a> {
    graph: &'a ConnectivityGraph,
    grounds: &'a BTreeSet<String>,
}

impl<'a> TopologyClassifier<'a> {
    pub fn new(graph: &'a ConnectivityGraph, grounds: &'a BTreeSet<String>) -> Self {
        Self { graph, grounds }
    }

    /// Classify a single ground terminal.
    ///
    /// Returns [`TopologyType::Unknown`] when the code does not appear in the
    /// graph.
    pub fn classify(&self, ground: &str) -> TopologyType {
        TopologyType::from_ground_count(self.grounds_on_net(ground).len())
    }

    /// Distinct ground terminal codes on the net of `ground`, itself included.
    pub fn grounds_on_net(&self, ground: &str) -> BTreeSet<&'a str> {
        let Some(net) = self.graph.net_of_code(ground) else {
            return BTreeSet::new();
        };

        net.into_iter()
            .map(|node| node.code.as_str())
            .filter(|code| self.grounds.contains(*code))
            .collect()
    }

    /// Classify every known ground terminal, sorted by code.
    ///
    /// Labels components once for the whole graph instead of walking the
    /// net of each ground terminal separately.
    pub fn classify_all(&self) -> Vec<GroundClassification> {
        let labels = self.graph.component_labels();

        let mut grounds_by_label: HashMap<usize, BTreeSet<&str>> = HashMap::new();
        for (node, label) in labels.iter() {
            if self.grounds.contains(&node.code) {
                grounds_by_label
                    .entry(label)
                    .or_default()
                    .insert(node.code.as_str());
            }
        }

        let mut classified: BTreeMap<&str, GroundClassification> = BTreeMap::new();
        for ground in self.grounds {
            let mut on_net: BTreeSet<&str> = BTreeSet::new();
            for label in labels.labels_of_code(ground) {
                if let Some(codes) = grounds_by_label.get(&label) {
                    on_net.extend(codes.iter().copied());
                }
            }

            let topology = TopologyType::from_ground_count(on_net.len());
            tracing::debug!("Ground {} classified as {}", ground, topology);

            classified.insert(
                ground.as_str(),
                GroundClassification {
                    ground: ground.clone(),
                    topology,
                    shared_with: on_net
                        .into_iter()
                        .filter(|code| *code != ground.as_str())
                        .map(str::to_string)
                        .collect(),
                },
            );
        }

        classified.into_values().collect()
    }
}
