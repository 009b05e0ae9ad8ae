//! GroundTrace - wire-harness grounding topology library
//!
//! Reads a wire list, a connector list and an inline-splice list, builds the
//! electrical connectivity graph of the harness and lists every connector
//! pin returning through each ground terminal. Each ground terminal is
//! classified as single-circuit (alone on its net) or multi-circuit-bus
//! (bussed with other ground terminals).
//!
//! # Quick Start
//!
//! ```no_run
//! use groundtrace::{GroundTraceCore, GroundingInputs, GroundingOptions};
//! use std::path::Path;
//!
//! let inputs = GroundingInputs::new("wirelist.xlsx", "connlist.xlsx", "inline.xlsx");
//! let options = GroundingOptions::default();
//! let result = GroundTraceCore::process(&inputs, &options).unwrap();
//!
//! for summary in &result.topology {
//!     println!("{}: {}", summary.ground, summary.topology);
//! }
//! GroundTraceCore::write_report(&result, Path::new("grounding_list.xlsx"), &options).unwrap();
//! ```
//!
//! # Features
//!
//! - **Keyword column matching**: Chinese and English harness spreadsheets
//! - **Weld and inline splice aware connectivity**
//! - **Diagnostics**: skipped wire rows and conflicting lookups are reported

pub mod core;
pub mod harness;
pub mod parser;
pub mod report;

// Re-export main types
pub use core::{
    GroundTraceCore, GroundTraceError, GroundingInputs, GroundingOptions, GroundingResult,
    GroundingStats, GroundingTables,
};
pub use harness::{
    Ambiguity, AmbiguityKind, ConnectivityGraph, ConnectorNode, GroundClassification,
    GroundingRecord, SkippedRow, TopologyClassifier, TopologySummary, TopologyType, WireEdge,
};
pub use parser::{load_table, Table};
pub use report::ReportWriter;

/// Classify one ground terminal against a set of wires (convenience wrapper).
///
/// `welds` and `inlines` are the weld point and inline splice codes; pass
/// empty sets when the harness has none.
pub fn classify_ground(
    ground: &str,
    wires: &[WireEdge],
    grounds: &std::collections::BTreeSet<String>,
    welds: &std::collections::BTreeSet<String>,
    inlines: &std::collections::BTreeSet<String>,
) -> TopologyType {
    let (graph, _) = ConnectivityGraph::build(wires, welds, inlines);
    TopologyClassifier::new(&graph, grounds).classify(ground)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        GroundTraceCore, GroundTraceError, GroundingInputs, GroundingOptions, GroundingRecord,
        GroundingResult, GroundingStats, TopologySummary, TopologyType,
    };
}
