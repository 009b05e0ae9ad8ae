//! Spreadsheet loading
//!
//! Reads the first worksheet of an Excel/ODS workbook with calamine into a
//! [`Table`] of trimmed strings. Row 1 holds the headers.

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use crate::core::GroundTraceError;

/// File extensions accepted as workbook input.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

/// One data row with its spreadsheet row number (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub number: usize,
    pub cells: Vec<String>,
}

/// A header row plus data rows, all cells as trimmed strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            name: name.into(),
            headers: headers.iter().map(|h| h.trim().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; the row number follows the previous one (header is row 1).
    pub fn with_row(mut self, cells: &[&str]) -> Self {
        self.push_row(cells.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        let number = self.rows.last().map(|r| r.number + 1).unwrap_or(2);
        self.rows.push(Row {
            number,
            cells: cells.into_iter().map(|c| c.trim().to_string()).collect(),
        });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Row {
    /// Cell text, empty when the column is missing from this row.
    pub fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn cell_opt(&self, column: Option<usize>) -> &str {
        column.map(|c| self.cell(c)).unwrap_or("")
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

/// Load the first worksheet of `path`.
pub fn load_table(path: &Path) -> Result<Table, GroundTraceError> {
    check_extension(path)?;
    if !path.exists() {
        return Err(GroundTraceError::NotFound(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_vec();
    let Some(first_sheet) = sheet_names.first() else {
        return Err(GroundTraceError::EmptyWorkbook(path.to_path_buf()));
    };

    let range = workbook.worksheet_range(first_sheet)?;
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(GroundTraceError::EmptyWorkbook(path.to_path_buf()));
    };

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(first_sheet.as_str())
        .to_string();

    let mut table = Table {
        name,
        headers: header_row.iter().map(cell_text).collect(),
        rows: Vec::new(),
    };

    // header occupies spreadsheet row first_row + 1
    for (offset, cells) in rows.enumerate() {
        let row = Row {
            number: first_row + offset + 2,
            cells: cells.iter().map(cell_text).collect(),
        };
        if !row.is_blank() {
            table.rows.push(row);
        }
    }

    tracing::info!(
        "Loaded {} ({} columns, {} rows)",
        path.display(),
        table.headers.len(),
        table.rows.len()
    );

    Ok(table)
}

fn check_extension(path: &Path) -> Result<(), GroundTraceError> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(GroundTraceError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Render a cell as trimmed text. Whole floats print without a fraction so
/// pin `1` stays `"1"` rather than `"1.0"`.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        other => other.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_numbers() {
        assert_eq!(cell_text(&Data::Float(1.0)), "1");
        assert_eq!(cell_text(&Data::Float(0.35)), "0.35");
        assert_eq!(cell_text(&Data::Int(12)), "12");
        assert_eq!(cell_text(&Data::String("  X  ".into())), "X");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_table_row_numbers_follow_header() {
        let table = Table::new("wires", &["From Code", " To Code "])
            .with_row(&["A", "B"])
            .with_row(&["C", "D"]);
        assert_eq!(table.headers, vec!["From Code", "To Code"]);
        assert_eq!(table.rows[0].number, 2);
        assert_eq!(table.rows[1].number, 3);
    }

    #[test]
    fn test_row_cell_out_of_range() {
        let table = Table::new("t", &["a", "b"]).with_row(&["1"]);
        assert_eq!(table.rows[0].cell(0), "1");
        assert_eq!(table.rows[0].cell(1), "");
        assert_eq!(table.rows[0].cell_opt(None), "");
    }

    #[test]
    fn test_rejects_unsupported_extension() {
        let err = load_table(Path::new("wires.csv")).unwrap_err();
        assert!(matches!(err, GroundTraceError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_table(Path::new("definitely_missing_wirelist.xlsx")).unwrap_err();
        assert!(matches!(err, GroundTraceError::NotFound(_)));
    }
}
