//! Harness connectivity and grounding analysis
//!
//! Builds the connectivity graph of a harness from wire segments, classifies
//! ground terminal topology and generates the grounding list.

pub mod codes;
pub mod graph;
pub mod grounding;
pub mod schema;
pub mod topology;

pub use codes::{identify_weld_points, CodeSets};
pub use graph::{BuildReport, ConnectivityGraph, GraphStats, SkipReason, SkippedRow};
pub use grounding::{
    Ambiguity, AmbiguityKind, GroundingList, GroundingListGenerator, TopologySummary,
    WireAttributes,
};
pub use schema::*;
pub use topology::{GroundClassification, TopologyClassifier};
