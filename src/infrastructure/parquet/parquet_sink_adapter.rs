// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Parquet Sink Adapter
//!
//! Serializes the in-memory result table to a Parquet file via Arrow.
//!
//! Every column is nullable (NULLs are only discovered while fetching), the
//! writer uses default properties, and no synthetic row-index column is
//! added: the file carries exactly the columns the query returned.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow_array::builder::{
    BinaryBuilder, BooleanBuilder, Date32Builder, Float64Builder, Int64Builder, StringBuilder,
    TimestampMicrosecondBuilder, UInt64Builder,
};
use arrow_array::{ArrayRef, RecordBatch};
use arrow_schema::{Field, Schema};
use log::debug;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::domain::entities::{CellValue, ColumnKind, ResultTable};
use crate::domain::errors::{ExportError, Result};
use crate::domain::mapping;
use crate::ports::sink_port::SinkPort;

const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Helper enum to manage the different Arrow array builders.
enum ColumnBuilder {
    Int64(Int64Builder),
    UInt64(UInt64Builder),
    Float64(Float64Builder),
    Boolean(BooleanBuilder),
    Utf8(StringBuilder),
    Binary(BinaryBuilder),
    Timestamp(TimestampMicrosecondBuilder),
    Date32(Date32Builder),
}

impl ColumnBuilder {
    fn new(kind: ColumnKind, capacity: usize) -> Self {
        match kind {
            ColumnKind::Int64 => ColumnBuilder::Int64(Int64Builder::with_capacity(capacity)),
            ColumnKind::UInt64 => ColumnBuilder::UInt64(UInt64Builder::with_capacity(capacity)),
            ColumnKind::Float64 => ColumnBuilder::Float64(Float64Builder::with_capacity(capacity)),
            ColumnKind::Boolean => ColumnBuilder::Boolean(BooleanBuilder::with_capacity(capacity)),
            ColumnKind::Utf8 => {
                ColumnBuilder::Utf8(StringBuilder::with_capacity(capacity, capacity * 20))
            }
            ColumnKind::Binary => {
                ColumnBuilder::Binary(BinaryBuilder::with_capacity(capacity, capacity * 20))
            }
            ColumnKind::TimestampMicros => {
                ColumnBuilder::Timestamp(TimestampMicrosecondBuilder::with_capacity(capacity))
            }
            ColumnKind::Date32 => ColumnBuilder::Date32(Date32Builder::with_capacity(capacity)),
        }
    }

    /// Appends one cell. A cell that does not fit the column's builder is a
    /// serialization error: the value cannot be represented in the target
    /// encoding.
    fn append(&mut self, name: &str, cell: &CellValue) -> Result<()> {
        match (self, cell) {
            (ColumnBuilder::Int64(b), CellValue::Int64(v)) => b.append_value(*v),
            (ColumnBuilder::Int64(b), CellValue::Null) => b.append_null(),
            (ColumnBuilder::UInt64(b), CellValue::UInt64(v)) => b.append_value(*v),
            (ColumnBuilder::UInt64(b), CellValue::Null) => b.append_null(),
            (ColumnBuilder::Float64(b), CellValue::Float64(v)) => b.append_value(*v),
            (ColumnBuilder::Float64(b), CellValue::Null) => b.append_null(),
            (ColumnBuilder::Boolean(b), CellValue::Boolean(v)) => b.append_value(*v),
            (ColumnBuilder::Boolean(b), CellValue::Null) => b.append_null(),
            (ColumnBuilder::Utf8(b), CellValue::Utf8(v)) => b.append_value(v),
            (ColumnBuilder::Utf8(b), CellValue::Null) => b.append_null(),
            (ColumnBuilder::Binary(b), CellValue::Binary(v)) => b.append_value(v),
            (ColumnBuilder::Binary(b), CellValue::Null) => b.append_null(),
            (ColumnBuilder::Timestamp(b), CellValue::TimestampMicros(v)) => b.append_value(*v),
            (ColumnBuilder::Timestamp(b), CellValue::Null) => b.append_null(),
            (ColumnBuilder::Date32(b), CellValue::Date32(v)) => b.append_value(*v),
            (ColumnBuilder::Date32(b), CellValue::Null) => b.append_null(),
            (_, cell) => {
                return Err(ExportError::Serialization(format!(
                    "column '{}': value {:?} does not fit the column type",
                    name, cell
                )))
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> ArrayRef {
        match self {
            ColumnBuilder::Int64(b) => Arc::new(b.finish()) as ArrayRef,
            ColumnBuilder::UInt64(b) => Arc::new(b.finish()) as ArrayRef,
            ColumnBuilder::Float64(b) => Arc::new(b.finish()) as ArrayRef,
            ColumnBuilder::Boolean(b) => Arc::new(b.finish()) as ArrayRef,
            ColumnBuilder::Utf8(b) => Arc::new(b.finish()) as ArrayRef,
            ColumnBuilder::Binary(b) => Arc::new(b.finish()) as ArrayRef,
            ColumnBuilder::Timestamp(b) => Arc::new(b.finish()) as ArrayRef,
            ColumnBuilder::Date32(b) => Arc::new(b.finish()) as ArrayRef,
        }
    }
}

/// Accumulates rows into Arrow builders and flushes them as record batches.
struct RowBatch {
    builders: Vec<ColumnBuilder>,
    schema: Arc<Schema>,
    batch_size: usize,
    row_count: usize,
}

impl RowBatch {
    fn new(schema: Arc<Schema>, kinds: &[ColumnKind], batch_size: usize) -> Self {
        let builders = kinds
            .iter()
            .map(|k| ColumnBuilder::new(*k, batch_size))
            .collect();
        Self {
            builders,
            schema,
            batch_size,
            row_count: 0,
        }
    }

    fn push_row(&mut self, names: &[&str], row: &[CellValue]) -> Result<()> {
        for (i, builder) in self.builders.iter_mut().enumerate() {
            builder.append(names[i], &row[i])?;
        }
        self.row_count += 1;
        Ok(())
    }

    fn is_full(&self) -> bool {
        self.row_count >= self.batch_size
    }

    fn flush(&mut self, writer: &mut ArrowWriter<File>, kinds: &[ColumnKind]) -> Result<()> {
        if self.row_count == 0 {
            return Ok(());
        }

        let arrays: Vec<ArrayRef> = self.builders.iter_mut().map(|b| b.finish()).collect();
        let batch = RecordBatch::try_new(self.schema.clone(), arrays)
            .map_err(|e| ExportError::Serialization(format!("failed to build RecordBatch: {}", e)))?;
        writer
            .write(&batch)
            .map_err(|e| ExportError::Serialization(format!("failed to write batch: {}", e)))?;

        // Re-initialize builders for the next batch.
        self.builders = kinds
            .iter()
            .map(|k| ColumnBuilder::new(*k, self.batch_size))
            .collect();
        self.row_count = 0;
        Ok(())
    }
}

/// `ParquetSinkAdapter` implements the `SinkPort` for local Parquet files.
pub struct ParquetSinkAdapter {
    batch_size: usize,
}

impl Default for ParquetSinkAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ParquetSinkAdapter {
    pub fn new() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    #[cfg(test)]
    fn with_batch_size(batch_size: usize) -> Self {
        Self { batch_size }
    }
}

impl SinkPort for ParquetSinkAdapter {
    fn write_table(&self, table: &ResultTable, path: &Path) -> Result<u64> {
        let fields: Vec<Field> = table
            .columns
            .iter()
            .map(|c| Field::new(&c.name, mapping::map_kind_to_arrow(c.kind), true))
            .collect();
        let schema = Arc::new(Schema::new(fields));
        let kinds: Vec<ColumnKind> = table.columns.iter().map(|c| c.kind).collect();
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();

        let file = File::create(path).map_err(|e| {
            ExportError::Serialization(format!("cannot create '{}': {}", path.display(), e))
        })?;
        let props = WriterProperties::builder().build();
        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))
            .map_err(|e| ExportError::Serialization(format!("failed to open writer: {}", e)))?;

        let mut batch = RowBatch::new(schema, &kinds, self.batch_size);
        for row in &table.rows {
            batch.push_row(&names, row)?;
            if batch.is_full() {
                batch.flush(&mut writer, &kinds)?;
            }
        }
        batch.flush(&mut writer, &kinds)?;

        // For a zero-row table this still produces a valid file that carries
        // the column schema.
        writer
            .close()
            .map_err(|e| ExportError::Serialization(format!("failed to finalize file: {}", e)))?;

        let bytes = std::fs::metadata(path)
            .map_err(|e| ExportError::Serialization(format!("cannot stat output: {}", e)))?
            .len();
        debug!(
            "Wrote {} rows ({} bytes) to {}",
            table.row_count(),
            bytes,
            path.display()
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ColumnMeta;
    use arrow_array::{Array, BooleanArray, Float64Array, Int64Array, StringArray};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    fn salary_table() -> ResultTable {
        let mut table = ResultTable::new(vec![
            ColumnMeta::new("name", ColumnKind::Utf8),
            ColumnMeta::new("age", ColumnKind::Int64),
            ColumnMeta::new("salary", ColumnKind::Float64),
            ColumnMeta::new("is_employed", ColumnKind::Boolean),
        ]);
        table.push_row(vec![
            CellValue::Utf8("Alice".to_string()),
            CellValue::Int64(34),
            CellValue::Float64(85000.5),
            CellValue::Boolean(true),
        ]);
        table.push_row(vec![
            CellValue::Utf8("Bob".to_string()),
            CellValue::Int64(29),
            CellValue::Null,
            CellValue::Boolean(false),
        ]);
        table
    }

    fn read_back(path: &Path) -> Vec<RecordBatch> {
        let file = File::open(path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        reader.map(|b| b.unwrap()).collect()
    }

    #[test]
    fn test_round_trip_preserves_rows_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.parquet");

        let bytes = ParquetSinkAdapter::new()
            .write_table(&salary_table(), &path)
            .unwrap();
        assert!(bytes > 0);

        let batches = read_back(&path);
        let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(total_rows, 2);

        let batch = &batches[0];
        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        // Exactly the query's columns, in order, with no index column.
        assert_eq!(names, vec!["name", "age", "salary", "is_employed"]);

        let name_col = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(name_col.value(0), "Alice");
        assert_eq!(name_col.value(1), "Bob");

        let age_col = batch
            .column(1)
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap();
        assert_eq!(age_col.value(0), 34);

        let salary_col = batch
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(salary_col.value(0), 85000.5);
        assert!(salary_col.is_null(1));

        let employed_col = batch
            .column(3)
            .as_any()
            .downcast_ref::<BooleanArray>()
            .unwrap();
        assert!(employed_col.value(0));
        assert!(!employed_col.value(1));
    }

    #[test]
    fn test_zero_row_table_still_writes_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.parquet");

        let table = ResultTable::new(vec![
            ColumnMeta::new("id", ColumnKind::Int64),
            ColumnMeta::new("label", ColumnKind::Utf8),
        ]);
        ParquetSinkAdapter::new().write_table(&table, &path).unwrap();

        let file = File::open(&path).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let field_names: Vec<&str> = builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect();
        assert_eq!(field_names, vec!["id", "label"]);

        let total_rows: usize = builder.build().unwrap().map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(total_rows, 0);
    }

    #[test]
    fn test_rerun_overwrites_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.parquet");
        let sink = ParquetSinkAdapter::new();

        sink.write_table(&salary_table(), &path).unwrap();
        sink.write_table(&salary_table(), &path).unwrap();

        let total_rows: usize = read_back(&path).iter().map(|b| b.num_rows()).sum();
        assert_eq!(total_rows, 2);
    }

    #[test]
    fn test_rows_split_across_batches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batched.parquet");

        let mut table = ResultTable::new(vec![ColumnMeta::new("n", ColumnKind::Int64)]);
        for i in 0..7 {
            table.push_row(vec![CellValue::Int64(i)]);
        }
        ParquetSinkAdapter::with_batch_size(3)
            .write_table(&table, &path)
            .unwrap();

        let batches = read_back(&path);
        let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(total_rows, 7);

        // Row order survives batching.
        let mut seen = Vec::new();
        for batch in &batches {
            let col = batch
                .column(0)
                .as_any()
                .downcast_ref::<Int64Array>()
                .unwrap();
            for i in 0..col.len() {
                seen.push(col.value(i));
            }
        }
        assert_eq!(seen, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_unwritable_path_is_serialization_error() {
        let err = ParquetSinkAdapter::new()
            .write_table(&salary_table(), Path::new("/no/such/dir/out.parquet"))
            .unwrap_err();
        assert!(matches!(err, ExportError::Serialization(_)));
    }

    #[test]
    fn test_mismatched_cell_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.parquet");

        let mut table = ResultTable::new(vec![ColumnMeta::new("n", ColumnKind::Int64)]);
        table.rows.push(vec![CellValue::Utf8("oops".to_string())]);

        let err = ParquetSinkAdapter::new()
            .write_table(&table, &path)
            .unwrap_err();
        assert!(matches!(err, ExportError::Serialization(_)));
    }
}
