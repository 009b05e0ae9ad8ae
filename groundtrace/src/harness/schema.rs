//! Harness data model
//!
//! Typed records produced by the input normalization step and consumed by
//! the connectivity graph, the topology classifier and the grounding list
//! generator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One physical contact point in the harness.
///
/// A pinned node (`pin: Some(..)`) is a single cavity of a connector. A bare
/// node (`pin: None`) stands for the whole code and is used to aggregate weld
/// points and inline splices. Bare and pinned nodes of the same code are
/// distinct identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectorNode {
    pub code: String,
    pub pin: Option<String>,
}

impl ConnectorNode {
    pub fn bare(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            pin: None,
        }
    }

    pub fn pinned(code: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            pin: Some(pin.into()),
        }
    }

    pub fn is_bare(&self) -> bool {
        self.pin.is_none()
    }
}

impl fmt::Display for ConnectorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pin {
            Some(pin) => write!(f, "{}:{}", self.code, pin),
            None => write!(f, "{}", self.code),
        }
    }
}

/// One wire segment read from the wire list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEdge {
    /// Spreadsheet row number (1-based, header is row 1). Zero when the edge
    /// was not read from a sheet.
    pub row: usize,
    pub from_code: String,
    pub from_pin: String,
    pub to_code: String,
    pub to_pin: String,
    pub wire_gauge: String,
    pub option: String,
}

impl WireEdge {
    pub fn new(
        from_code: impl Into<String>,
        from_pin: impl Into<String>,
        to_code: impl Into<String>,
        to_pin: impl Into<String>,
    ) -> Self {
        Self {
            row: 0,
            from_code: from_code.into(),
            from_pin: from_pin.into(),
            to_code: to_code.into(),
            to_pin: to_pin.into(),
            wire_gauge: String::new(),
            option: String::new(),
        }
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row = row;
        self
    }

    pub fn with_gauge(mut self, gauge: impl Into<String>) -> Self {
        self.wire_gauge = gauge.into();
        self
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.option = option.into();
        self
    }

    pub fn from_node(&self) -> ConnectorNode {
        ConnectorNode::pinned(&self.from_code, &self.from_pin)
    }

    pub fn to_node(&self) -> ConnectorNode {
        ConnectorNode::pinned(&self.to_code, &self.to_pin)
    }

    /// True if the wire lands on `code`/`pin` at either end.
    pub fn touches(&self, code: &str, pin: &str) -> bool {
        (self.from_code == code && self.from_pin == pin)
            || (self.to_code == code && self.to_pin == pin)
    }
}

/// Electrical topology of a ground terminal's net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopologyType {
    /// The only ground terminal on its net.
    SingleCircuit,
    /// Shares its net with at least one other ground terminal.
    MultiCircuitBus,
    /// Not present in the wire list.
    Unknown,
}

impl TopologyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopologyType::SingleCircuit => "single-circuit",
            TopologyType::MultiCircuitBus => "multi-circuit-bus",
            TopologyType::Unknown => "unknown",
        }
    }

    /// Classification from the number of distinct ground terminals on a net.
    pub fn from_ground_count(count: usize) -> Self {
        match count {
            0 => TopologyType::Unknown,
            1 => TopologyType::SingleCircuit,
            _ => TopologyType::MultiCircuitBus,
        }
    }
}

impl fmt::Display for TopologyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the grounding list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingRecord {
    pub ground_terminal: String,
    pub connector: String,
    pub description: String,
    pub pin: String,
    pub wire_gauge: String,
    pub option: String,
    pub topology: TopologyType,
}
