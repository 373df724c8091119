//! # Domain Entities
//!
//! Entities are the "Nouns" of this application: the in-memory result table
//! produced by the query step and consumed by the serialization step, and the
//! timing report produced by a run.
//!
//! The column schema is discovered at runtime from the query result (the
//! query is `SELECT *`, so nothing is known at compile time). `ColumnKind`
//! is the closed set of scalar types the exporter knows how to carry from
//! MySQL into Parquet.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of scalar types a result column can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnKind {
    Int64,
    UInt64,
    Float64,
    Boolean,
    Utf8,
    Binary,
    /// Microseconds since the Unix epoch, no timezone.
    TimestampMicros,
    /// Days since the Unix epoch.
    Date32,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Int64 => write!(f, "INT64"),
            ColumnKind::UInt64 => write!(f, "UINT64"),
            ColumnKind::Float64 => write!(f, "FLOAT64"),
            ColumnKind::Boolean => write!(f, "BOOLEAN"),
            ColumnKind::Utf8 => write!(f, "UTF8"),
            ColumnKind::Binary => write!(f, "BINARY"),
            ColumnKind::TimestampMicros => write!(f, "TIMESTAMP_MICROS"),
            ColumnKind::Date32 => write!(f, "DATE32"),
        }
    }
}

/// Everything we need to know about a single result column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// The column name as reported by the server (e.g., "salary").
    pub name: String,
    /// The scalar kind this column was mapped to.
    pub kind: ColumnKind,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A single decoded cell. `Null` carries SQL NULLs through to Parquet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Boolean(bool),
    Utf8(String),
    Binary(Vec<u8>),
    TimestampMicros(i64),
    Date32(i32),
}

/// The complete, order-preserved result set of one query, held in memory.
///
/// Rows are stored positionally; each row has exactly one cell per entry in
/// `columns`, decoded to that column's `ColumnKind`. The table lives for the
/// duration of one pipeline run and is discarded afterwards.
#[derive(Debug, Clone)]
pub struct ResultTable {
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ResultTable {
    /// Creates an empty table with the given schema.
    pub fn new(columns: Vec<ColumnMeta>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Appends a row. The caller guarantees the cells line up with `columns`.
    pub fn push_row(&mut self, row: Vec<CellValue>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }
}

/// The "Report Card" for a completed run: what moved and how long it took.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// How many rows were exported.
    pub rows: u64,
    /// How many bytes the output file occupies.
    pub bytes: u64,
    /// Wall-clock seconds spent executing and fetching the query.
    pub query_secs: f64,
    /// Wall-clock seconds spent writing the Parquet file.
    pub write_secs: f64,
    /// Wall-clock seconds for the whole run, measured independently.
    pub total_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_table_preserves_row_order() {
        let mut table = ResultTable::new(vec![ColumnMeta::new("n", ColumnKind::Int64)]);
        table.push_row(vec![CellValue::Int64(1)]);
        table.push_row(vec![CellValue::Int64(2)]);
        table.push_row(vec![CellValue::Null]);

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 1);
        assert_eq!(table.rows[0][0], CellValue::Int64(1));
        assert_eq!(table.rows[2][0], CellValue::Null);
    }

    #[test]
    fn test_column_kind_display() {
        assert_eq!(ColumnKind::Int64.to_string(), "INT64");
        assert_eq!(ColumnKind::TimestampMicros.to_string(), "TIMESTAMP_MICROS");
    }
}
