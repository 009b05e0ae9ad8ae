//! Grounding List Generator
//!
//! For every ground terminal, lists each connector pin on its net that is not
//! itself a ground terminal, inline splice or weld point, enriched with the
//! connector description and the gauge/option of the wire landing on it.
//!
//! Lookups resolve to the first matching row in table order. When rows
//! disagree the conflict is reported as an [`Ambiguity`] instead of being
//! hidden.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::codes::CodeSets;
use super::graph::ConnectivityGraph;
use super::schema::{GroundingRecord, TopologyType, WireEdge};
use super::topology::{GroundClassification, TopologyClassifier};
use crate::parser::harness_tables::ConnectorList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbiguityKind {
    Description,
    WireAttributes,
}

/// A lookup key with more than one distinct candidate value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ambiguity {
    pub kind: AmbiguityKind,
    /// Connector code, or `code:pin` for wire attributes.
    pub key: String,
    pub chosen: String,
    pub candidates: Vec<String>,
}

/// Outcome of a lookup: the first value plus every distinct candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub candidates: Vec<T>,
}

impl<T> Resolved<T> {
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }
}

/// Connector code -> descriptions, one per connector list row, in row order.
pub struct DescriptionLookup {
    by_code: HashMap<String, Vec<String>>,
}

impl DescriptionLookup {
    pub fn new(connectors: &ConnectorList, ground_keywords: &[String]) -> Self {
        let mut by_code: HashMap<String, Vec<String>> = HashMap::new();
        for entry in &connectors.entries {
            if let Some(text) = entry.display_description(ground_keywords) {
                by_code
                    .entry(entry.code.clone())
                    .or_default()
                    .push(text.to_string());
            }
        }
        Self { by_code }
    }

    pub fn resolve(&self, code: &str) -> Option<Resolved<String>> {
        let found = self.by_code.get(code)?;
        let candidates = distinct(found.iter().cloned());
        Some(Resolved {
            value: candidates.first()?.clone(),
            candidates,
        })
    }
}

/// Gauge and option of one wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireAttributes {
    pub gauge: String,
    pub option: String,
}

impl std::fmt::Display for WireAttributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.gauge, self.option)
    }
}

/// `(code, pin)` -> attributes of every wire landing there, in row order.
pub struct WireAttributeLookup {
    by_end: HashMap<(String, String), Vec<WireAttributes>>,
}

impl WireAttributeLookup {
    pub fn new(wires: &[WireEdge]) -> Self {
        let mut by_end: HashMap<(String, String), Vec<WireAttributes>> = HashMap::new();
        for wire in wires {
            let attrs = WireAttributes {
                gauge: wire.wire_gauge.clone(),
                option: wire.option.clone(),
            };
            let from = (wire.from_code.clone(), wire.from_pin.clone());
            let to = (wire.to_code.clone(), wire.to_pin.clone());
            let same_end = from == to;
            by_end.entry(from).or_default().push(attrs.clone());
            if !same_end {
                by_end.entry(to).or_default().push(attrs);
            }
        }
        Self { by_end }
    }

    pub fn resolve(&self, code: &str, pin: &str) -> Option<Resolved<WireAttributes>> {
        let found = self.by_end.get(&(code.to_string(), pin.to_string()))?;
        let candidates = distinct(found.iter().cloned());
        Some(Resolved {
            value: candidates.first()?.clone(),
            candidates,
        })
    }
}

fn distinct<T: Clone + Eq + std::hash::Hash>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(v.clone())).collect()
}

/// Numeric pins sort by value, then everything else lexically.
pub fn natural_pin_cmp(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Per ground terminal overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySummary {
    pub ground: String,
    pub topology: TopologyType,
    pub connector_count: usize,
    pub connectors: Vec<String>,
    pub shared_with: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroundingList {
    pub records: Vec<GroundingRecord>,
    pub classifications: Vec<GroundClassification>,
    pub ambiguities: Vec<Ambiguity>,
}

impl GroundingList {
    /// One entry per ground terminal, including those with no records.
    pub fn topology_summary(&self) -> Vec<TopologySummary> {
        self.classifications
            .iter()
            .map(|c| {
                let connectors: BTreeSet<&str> = self
                    .records
                    .iter()
                    .filter(|r| r.ground_terminal == c.ground)
                    .map(|r| r.connector.as_str())
                    .collect();
                TopologySummary {
                    ground: c.ground.clone(),
                    topology: c.topology,
                    connector_count: connectors.len(),
                    connectors: connectors.into_iter().map(str::to_string).collect(),
                    shared_with: c.shared_with.clone(),
                }
            })
            .collect()
    }

    pub fn records_for<'a>(&'a self, ground: &'a str) -> impl Iterator<Item = &'a GroundingRecord> {
        self.records.iter().filter(move |r| r.ground_terminal == ground)
    }
}

pub struct GroundingListGenerator<'a> {
    graph: &'a ConnectivityGraph,
    codes: &'a CodeSets,
    descriptions: DescriptionLookup,
    wires: WireAttributeLookup,
    exclude_welds: bool,
}

impl<'a> GroundingListGenerator<'a> {
    pub fn new(
        graph: &'a ConnectivityGraph,
        codes: &'a CodeSets,
        connectors: &ConnectorList,
        wires: &[WireEdge],
        ground_keywords: &[String],
    ) -> Self {
        Self {
            graph,
            codes,
            descriptions: DescriptionLookup::new(connectors, ground_keywords),
            wires: WireAttributeLookup::new(wires),
            exclude_welds: true,
        }
    }

    /// Keep pinned weld nodes (e.g. `SP1:X`) in the list.
    pub fn include_welds(mut self, include: bool) -> Self {
        self.exclude_welds = !include;
        self
    }

    fn is_endpoint(&self, code: &str) -> bool {
        !(self.codes.is_ground(code)
            || self.codes.is_inline(code)
            || (self.exclude_welds && self.codes.is_weld(code)))
    }

    pub fn generate(&self) -> GroundingList {
        let classifier = TopologyClassifier::new(self.graph, &self.codes.grounds);
        let classifications = classifier.classify_all();

        let mut records = Vec::new();
        let mut ambiguities = Vec::new();
        let mut reported: HashSet<(AmbiguityKind, String)> = HashSet::new();

        for classification in &classifications {
            let Some(net) = self.graph.net_of_code(&classification.ground) else {
                tracing::warn!(
                    "Ground terminal {} does not appear in the wire list",
                    classification.ground
                );
                continue;
            };

            let mut pins_by_connector: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
            for node in net {
                let Some(pin) = node.pin.as_deref() else {
                    continue;
                };
                if self.is_endpoint(&node.code) {
                    pins_by_connector
                        .entry(node.code.as_str())
                        .or_default()
                        .insert(pin);
                }
            }

            for (code, pins) in pins_by_connector {
                let description = match self.descriptions.resolve(code) {
                    Some(resolved) => {
                        if resolved.is_ambiguous()
                            && reported.insert((AmbiguityKind::Description, code.to_string()))
                        {
                            tracing::warn!(
                                "Connector {} has {} different descriptions, using '{}'",
                                code,
                                resolved.candidates.len(),
                                resolved.value
                            );
                            ambiguities.push(Ambiguity {
                                kind: AmbiguityKind::Description,
                                key: code.to_string(),
                                chosen: resolved.value.clone(),
                                candidates: resolved.candidates.clone(),
                            });
                        }
                        resolved.value
                    }
                    None => String::new(),
                };

                let mut pins: Vec<&str> = pins.into_iter().collect();
                pins.sort_by(|a, b| natural_pin_cmp(a, b));

                for pin in pins {
                    let attrs = match self.wires.resolve(code, pin) {
                        Some(resolved) => {
                            let key = format!("{}:{}", code, pin);
                            if resolved.is_ambiguous()
                                && reported.insert((AmbiguityKind::WireAttributes, key.clone()))
                            {
                                tracing::warn!(
                                    "Pin {} has {} different wire attributes, using '{}'",
                                    key,
                                    resolved.candidates.len(),
                                    resolved.value
                                );
                                ambiguities.push(Ambiguity {
                                    kind: AmbiguityKind::WireAttributes,
                                    key,
                                    chosen: resolved.value.to_string(),
                                    candidates: resolved
                                        .candidates
                                        .iter()
                                        .map(|c| c.to_string())
                                        .collect(),
                                });
                            }
                            resolved.value
                        }
                        None => WireAttributes::default(),
                    };

                    records.push(GroundingRecord {
                        ground_terminal: classification.ground.clone(),
                        connector: code.to_string(),
                        description: description.clone(),
                        pin: pin.to_string(),
                        wire_gauge: attrs.gauge,
                        option: attrs.option,
                        topology: classification.topology,
                    });
                }
            }
        }

        tracing::info!(
            "Generated {} grounding records for {} ground terminals",
            records.len(),
            classifications.len()
        );

        GroundingList {
            records,
            classifications,
            ambiguities,
        }
    }
}
