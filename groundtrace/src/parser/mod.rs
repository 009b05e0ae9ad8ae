pub mod columns;
pub mod harness_tables;
pub mod workbook;

// Re-export for convenience
pub use columns::{ColumnRule, ConnectorListColumns, WireListColumns, ALL_RULES};
pub use harness_tables::{
    inline_codes_from_table, wire_edges_from_table, ConnectorEntry, ConnectorList,
};
pub use workbook::{load_table, Row, Table, SUPPORTED_EXTENSIONS};
