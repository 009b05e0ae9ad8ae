//! Grounding list workbook output.

pub mod xlsx;

pub use xlsx::{ReportWriter, GROUNDING_HEADERS, SUMMARY_HEADERS};
