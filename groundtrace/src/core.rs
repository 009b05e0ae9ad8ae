//! Core grounding pipeline shared by the CLI and library users.
//! Loads the three input tables, builds the connectivity graph, classifies
//! ground terminals and generates the grounding list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::harness::codes::CodeSets;
use crate::harness::graph::{ConnectivityGraph, SkippedRow};
use crate::harness::grounding::{Ambiguity, GroundingListGenerator, TopologySummary};
use crate::harness::schema::GroundingRecord;
use crate::parser::harness_tables::{inline_codes_from_table, wire_edges_from_table, ConnectorList};
use crate::parser::workbook::{load_table, Table};
use crate::report::ReportWriter;

#[derive(Debug, thiserror::Error)]
pub enum GroundTraceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Unsupported file format: {} (expected .xlsx, .xlsm, .xls or .ods)", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Workbook has no data: {}", .0.display())]
    EmptyWorkbook(PathBuf),
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Missing column '{column}' in {table}")]
    MissingColumn { table: String, column: String },
    #[error("Report error: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Options for a grounding run, loadable from a JSON file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroundingOptions {
    /// Description keywords that mark a connector as a ground terminal.
    pub ground_keywords: Vec<String>,
    /// Pin value marking a wire end as landing on a weld.
    pub weld_pin_marker: String,
    /// Leave weld pins out of the grounding list.
    pub exclude_welds_from_list: bool,
    /// Add a diagnostics sheet when rows were skipped or lookups conflicted.
    pub write_diagnostics_sheet: bool,
}

impl Default for GroundingOptions {
    fn default() -> Self {
        Self {
            ground_keywords: vec!["接地".to_string(), "ground".to_string(), "gnd".to_string()],
            weld_pin_marker: "X".to_string(),
            exclude_welds_from_list: true,
            write_diagnostics_sheet: true,
        }
    }
}

impl GroundingOptions {
    pub fn from_json_str(json: &str) -> Result<Self, GroundTraceError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, GroundTraceError> {
        if !path.exists() {
            return Err(GroundTraceError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Paths of the three input workbooks.
#[derive(Clone, Debug)]
pub struct GroundingInputs {
    pub wirelist: PathBuf,
    pub connlist: PathBuf,
    pub inline: PathBuf,
}

impl GroundingInputs {
    pub fn new(
        wirelist: impl Into<PathBuf>,
        connlist: impl Into<PathBuf>,
        inline: impl Into<PathBuf>,
    ) -> Self {
        Self {
            wirelist: wirelist.into(),
            connlist: connlist.into(),
            inline: inline.into(),
        }
    }
}

/// The three input tables, already loaded.
#[derive(Clone, Debug, Default)]
pub struct GroundingTables {
    pub wirelist: Table,
    pub connlist: Table,
    pub inline: Table,
}

impl GroundingTables {
    pub fn load(inputs: &GroundingInputs) -> Result<Self, GroundTraceError> {
        Ok(Self {
            wirelist: load_table(&inputs.wirelist)?,
            connlist: load_table(&inputs.connlist)?,
            inline: load_table(&inputs.inline)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingStats {
    pub wire_rows: usize,
    pub skipped_rows: usize,
    pub records: usize,
    pub ground_terminals: usize,
    pub connected_connectors: usize,
    pub weld_points: usize,
    pub inline_splices: usize,
    pub ambiguities: usize,
}

/// Result of one grounding run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundingResult {
    pub records: Vec<GroundingRecord>,
    pub topology: Vec<TopologySummary>,
    pub skipped: Vec<SkippedRow>,
    pub ambiguities: Vec<Ambiguity>,
    pub stats: GroundingStats,
    pub generated_at: DateTime<Utc>,
}

impl GroundingResult {
    pub fn has_skipped_rows(&self) -> bool {
        !self.skipped.is_empty()
    }

    pub fn has_ambiguities(&self) -> bool {
        !self.ambiguities.is_empty()
    }

    pub fn has_diagnostics(&self) -> bool {
        self.has_skipped_rows() || self.has_ambiguities()
    }

    pub fn topology_for(&self, ground: &str) -> Option<&TopologySummary> {
        self.topology.iter().find(|t| t.ground == ground)
    }
}

/// Core grounding API used by the CLI.
pub struct GroundTraceCore;

impl GroundTraceCore {
    /// Load the three workbooks and run the pipeline.
    pub fn process(
        inputs: &GroundingInputs,
        options: &GroundingOptions,
    ) -> Result<GroundingResult, GroundTraceError> {
        let tables = GroundingTables::load(inputs)?;
        Self::process_tables(&tables, options)
    }

    /// Run the pipeline on already loaded tables.
    pub fn process_tables(
        tables: &GroundingTables,
        options: &GroundingOptions,
    ) -> Result<GroundingResult, GroundTraceError> {
        let wires = wire_edges_from_table(&tables.wirelist)?;
        let connectors = ConnectorList::from_table(&tables.connlist)?;
        let inlines = inline_codes_from_table(&tables.inline);

        let codes = CodeSets::derive(
            &connectors,
            inlines,
            &wires,
            &options.ground_keywords,
            &options.weld_pin_marker,
        );
        tracing::info!(
            "Identified {} ground terminals, {} inline splices, {} weld points",
            codes.grounds.len(),
            codes.inlines.len(),
            codes.welds.len()
        );

        let (graph, report) = ConnectivityGraph::build(&wires, &codes.welds, &codes.inlines);
        tracing::info!(
            "Built connectivity graph from {} of {} wire rows ({} nodes, {} edges)",
            report.wires_added,
            report.wires_read,
            graph.node_count(),
            graph.edge_count()
        );

        let list = GroundingListGenerator::new(
            &graph,
            &codes,
            &connectors,
            &wires,
            &options.ground_keywords,
        )
        .include_welds(!options.exclude_welds_from_list)
        .generate();

        let topology = list.topology_summary();
        let connected_connectors = list
            .records
            .iter()
            .map(|r| r.connector.as_str())
            .collect::<std::collections::BTreeSet<_>>()
            .len();

        let stats = GroundingStats {
            wire_rows: report.wires_read,
            skipped_rows: report.skipped.len(),
            records: list.records.len(),
            ground_terminals: codes.grounds.len(),
            connected_connectors,
            weld_points: codes.welds.len(),
            inline_splices: codes.inlines.len(),
            ambiguities: list.ambiguities.len(),
        };

        Ok(GroundingResult {
            records: list.records,
            topology,
            skipped: report.skipped,
            ambiguities: list.ambiguities,
            stats,
            generated_at: Utc::now(),
        })
    }

    /// Write the grounding list workbook.
    pub fn write_report(
        result: &GroundingResult,
        path: &Path,
        options: &GroundingOptions,
    ) -> Result<(), GroundTraceError> {
        ReportWriter::new()
            .with_diagnostics(options.write_diagnostics_sheet)
            .write(result, path)?;
        tracing::info!("Wrote grounding list to {}", path.display());
        Ok(())
    }
}
