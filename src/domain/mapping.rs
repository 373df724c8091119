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

//! # Type Mapping Logic
//!
//! This module is the "Translator". MySQL and Parquet speak different
//! languages when it comes to data types, and the schema is only known at
//! query time (`SELECT *`). The mapping goes through two hops:
//!
//! 1. **MySQL column metadata → `ColumnKind`**: collapses the server's type
//!    zoo into the closed scalar set the exporter carries in memory.
//! 2. **`ColumnKind` → Arrow `DataType`**: the internal memory format used
//!    by the `parquet` writer.
//!
//! Anything without a faithful scalar representation (DECIMAL, JSON, ENUM,
//! SET, TIME, spatial types) is carried as UTF-8 text rather than rejected.

use arrow_schema::{DataType, TimeUnit};
use mysql::consts::{ColumnFlags, ColumnType};

use crate::domain::entities::ColumnKind;

/// Maps a MySQL result column to the scalar kind used in the result table.
///
/// `column_length` is the display width the server reports; it is only used
/// to spot `TINYINT(1)`, MySQL's conventional boolean.
pub fn map_mysql_to_kind(
    column_type: ColumnType,
    flags: ColumnFlags,
    column_length: u32,
) -> ColumnKind {
    use ColumnType::*;

    match column_type {
        // TINYINT(1) is what MySQL gives you for BOOL/BOOLEAN columns.
        MYSQL_TYPE_TINY if column_length == 1 && !flags.contains(ColumnFlags::UNSIGNED_FLAG) => {
            ColumnKind::Boolean
        }

        MYSQL_TYPE_TINY | MYSQL_TYPE_SHORT | MYSQL_TYPE_INT24 | MYSQL_TYPE_LONG
        | MYSQL_TYPE_LONGLONG | MYSQL_TYPE_YEAR => {
            if flags.contains(ColumnFlags::UNSIGNED_FLAG) {
                ColumnKind::UInt64
            } else {
                ColumnKind::Int64
            }
        }

        MYSQL_TYPE_FLOAT | MYSQL_TYPE_DOUBLE => ColumnKind::Float64,

        // Exact decimals are kept as text so no precision is silently lost.
        MYSQL_TYPE_DECIMAL | MYSQL_TYPE_NEWDECIMAL => ColumnKind::Utf8,

        MYSQL_TYPE_TIMESTAMP | MYSQL_TYPE_TIMESTAMP2 | MYSQL_TYPE_DATETIME
        | MYSQL_TYPE_DATETIME2 => ColumnKind::TimestampMicros,

        MYSQL_TYPE_DATE | MYSQL_TYPE_NEWDATE => ColumnKind::Date32,

        // TEXT and BLOB share the same wire types; the BINARY flag is the
        // only way to tell them apart.
        MYSQL_TYPE_TINY_BLOB | MYSQL_TYPE_MEDIUM_BLOB | MYSQL_TYPE_LONG_BLOB
        | MYSQL_TYPE_BLOB | MYSQL_TYPE_STRING | MYSQL_TYPE_VAR_STRING | MYSQL_TYPE_VARCHAR => {
            if flags.contains(ColumnFlags::BINARY_FLAG) {
                ColumnKind::Binary
            } else {
                ColumnKind::Utf8
            }
        }

        MYSQL_TYPE_BIT => ColumnKind::Binary,

        // JSON, ENUM, SET, TIME, GEOMETRY and anything unexpected.
        _ => ColumnKind::Utf8,
    }
}

/// Returns the Arrow DataType for Parquet export.
pub fn map_kind_to_arrow(kind: ColumnKind) -> DataType {
    match kind {
        ColumnKind::Int64 => DataType::Int64,
        ColumnKind::UInt64 => DataType::UInt64,
        ColumnKind::Float64 => DataType::Float64,
        ColumnKind::Boolean => DataType::Boolean,
        ColumnKind::Utf8 => DataType::Utf8,
        ColumnKind::Binary => DataType::Binary,
        ColumnKind::TimestampMicros => DataType::Timestamp(TimeUnit::Microsecond, None),
        ColumnKind::Date32 => DataType::Date32,
    }
}
