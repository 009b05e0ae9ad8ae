//! Typed harness tables
//!
//! Turns raw [`Table`]s into wire segments, connector entries and inline
//! splice codes. Nothing here knows about graphs.

use std::collections::BTreeSet;

use super::columns::{ConnectorListColumns, WireListColumns, INLINE_CODE};
use super::workbook::Table;
use crate::core::GroundTraceError;
use crate::harness::schema::WireEdge;

/// Read every wire list row as a [`WireEdge`]. Rows with missing codes are
/// kept; the graph builder decides what to do with them.
pub fn wire_edges_from_table(table: &Table) -> Result<Vec<WireEdge>, GroundTraceError> {
    let cols = WireListColumns::resolve(&table.headers)?;

    Ok(table
        .rows
        .iter()
        .map(|row| WireEdge {
            row: row.number,
            from_code: row.cell(cols.from_code).to_string(),
            from_pin: row.cell(cols.from_pin).to_string(),
            to_code: row.cell(cols.to_code).to_string(),
            to_pin: row.cell(cols.to_pin).to_string(),
            wire_gauge: row.cell_opt(cols.wire_size).to_string(),
            option: row.cell_opt(cols.option).to_string(),
        })
        .collect())
}

/// One connector list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorEntry {
    pub row: usize,
    pub code: String,
    pub descriptions: Vec<String>,
    pub english: Vec<String>,
}

impl ConnectorEntry {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            row: 0,
            code: code.into(),
            descriptions: Vec::new(),
            english: Vec::new(),
        }
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.descriptions.push(text.into());
        self
    }

    pub fn with_english(mut self, text: impl Into<String>) -> Self {
        self.english.push(text.into());
        self
    }

    /// True if any description mentions one of `keywords`.
    pub fn mentions_any(&self, keywords: &[String]) -> bool {
        self.descriptions
            .iter()
            .chain(self.english.iter())
            .any(|text| contains_keyword(text, keywords))
    }

    /// First non-empty description that is not itself a ground label,
    /// falling back to the English columns.
    pub fn display_description(&self, ground_keywords: &[String]) -> Option<&str> {
        self.descriptions
            .iter()
            .chain(self.english.iter())
            .map(String::as_str)
            .find(|text| !text.is_empty() && !contains_keyword(text, ground_keywords))
    }
}

/// Case-insensitive substring match against any keyword.
pub fn contains_keyword(text: &str, keywords: &[String]) -> bool {
    let lower = text.to_lowercase();
    keywords
        .iter()
        .any(|k| !k.is_empty() && lower.contains(&k.to_lowercase()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectorList {
    pub entries: Vec<ConnectorEntry>,
}

impl ConnectorList {
    pub fn new(entries: Vec<ConnectorEntry>) -> Self {
        Self { entries }
    }

    /// Rows with an empty short code are dropped.
    pub fn from_table(table: &Table) -> Result<Self, GroundTraceError> {
        let cols = ConnectorListColumns::resolve(&table.headers)?;

        let entries = table
            .rows
            .iter()
            .filter(|row| !row.cell(cols.short_code).is_empty())
            .map(|row| ConnectorEntry {
                row: row.number,
                code: row.cell(cols.short_code).to_string(),
                descriptions: cols
                    .descriptions
                    .iter()
                    .map(|&c| row.cell(c).to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                english: cols
                    .english
                    .iter()
                    .map(|&c| row.cell(c).to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn codes(&self) -> BTreeSet<String> {
        self.entries.iter().map(|e| e.code.clone()).collect()
    }

    /// Codes whose description matches a ground keyword.
    pub fn ground_terminals(&self, keywords: &[String]) -> BTreeSet<String> {
        self.entries
            .iter()
            .filter(|e| e.mentions_any(keywords))
            .map(|e| e.code.clone())
            .collect()
    }
}

/// Every non-empty value under an inline/short-code column.
pub fn inline_codes_from_table(table: &Table) -> BTreeSet<String> {
    let columns = INLINE_CODE.find_all(&table.headers);
    if columns.is_empty() {
        tracing::warn!(
            "Inline list '{}' has no inline/code column; no inline splices recognised",
            table.name
        );
    }

    table
        .rows
        .iter()
        .flat_map(|row| columns.iter().map(move |&c| row.cell(c)))
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}
