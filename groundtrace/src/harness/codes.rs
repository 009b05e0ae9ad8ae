//! Code classification
//!
//! Sorts every short code seen in a run into ground terminals, inline
//! splices, weld points and ordinary connectors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::schema::WireEdge;
use crate::parser::harness_tables::ConnectorList;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSets {
    pub grounds: BTreeSet<String>,
    pub inlines: BTreeSet<String>,
    pub welds: BTreeSet<String>,
    /// Connector list codes that are neither ground terminals nor inline splices.
    pub connectors: BTreeSet<String>,
}

impl CodeSets {
    pub fn derive(
        connectors: &ConnectorList,
        inlines: BTreeSet<String>,
        wires: &[WireEdge],
        ground_keywords: &[String],
        weld_pin_marker: &str,
    ) -> Self {
        let known = connectors.codes();
        let grounds = connectors.ground_terminals(ground_keywords);
        let welds = identify_weld_points(wires, &known, weld_pin_marker);
        let connectors = known
            .into_iter()
            .filter(|code| !grounds.contains(code) && !inlines.contains(code))
            .collect();

        Self {
            grounds,
            inlines,
            welds,
            connectors,
        }
    }

    pub fn is_ground(&self, code: &str) -> bool {
        self.grounds.contains(code)
    }

    pub fn is_inline(&self, code: &str) -> bool {
        self.inlines.contains(code)
    }

    pub fn is_weld(&self, code: &str) -> bool {
        self.welds.contains(code)
    }
}

/// A wire end whose pin is the weld marker and whose code is not a known
/// connector is a weld point.
pub fn identify_weld_points(
    wires: &[WireEdge],
    known_codes: &BTreeSet<String>,
    marker: &str,
) -> BTreeSet<String> {
    let mut welds = BTreeSet::new();
    for wire in wires {
        for (code, pin) in [
            (&wire.from_code, &wire.from_pin),
            (&wire.to_code, &wire.to_pin),
        ] {
            if pin == marker && !code.is_empty() && !known_codes.contains(code) {
                welds.insert(code.clone());
            }
        }
    }
    welds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::harness_tables::ConnectorEntry;

    #[test]
    fn test_weld_needs_marker_and_unknown_code() {
        let known: BTreeSet<String> = ["X1".to_string()].into();
        let wires = vec![
            WireEdge::new("X1", "X", "SP1", "X"),
            WireEdge::new("SP2", "3", "X1", "2"),
        ];
        let welds = identify_weld_points(&wires, &known, "X");
        assert_eq!(welds.into_iter().collect::<Vec<_>>(), vec!["SP1"]);
    }

    #[test]
    fn test_derive_code_sets() {
        let connectors = ConnectorList::new(vec![
            ConnectorEntry::new("G1").with_description("接地点"),
            ConnectorEntry::new("IL1").with_description("对接插件"),
            ConnectorEntry::new("X1").with_description("前大灯"),
        ]);
        let inlines: BTreeSet<String> = ["IL1".to_string()].into();
        let wires = vec![WireEdge::new("X1", "1", "W9", "X")];
        let keywords = vec!["接地".to_string()];

        let codes = CodeSets::derive(&connectors, inlines, &wires, &keywords, "X");

        assert!(codes.is_ground("G1"));
        assert!(codes.is_inline("IL1"));
        assert!(codes.is_weld("W9"));
        assert_eq!(codes.connectors.into_iter().collect::<Vec<_>>(), vec!["X1"]);
    }
}
