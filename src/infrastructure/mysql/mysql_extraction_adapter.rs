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

//! # MySQL Extraction Adapter
//!
//! Concrete implementation of the source port for MySQL.
//!
//! The adapter opens a single connection (no pool; the pipeline is strictly
//! sequential), runs the query over the text protocol, discovers the column
//! schema from the result metadata, and decodes every cell into the closed
//! `CellValue` set before handing the buffered table to the caller.

use log::debug;
use mysql::prelude::Queryable;
use mysql::{Conn, Opts, OptsBuilder, Value};

use crate::config::DatabaseConfig;
use crate::domain::entities::{CellValue, ColumnKind, ColumnMeta, ResultTable};
use crate::domain::errors::{ExportError, Result};
use crate::domain::mapping;
use crate::ports::source_port::{SourceConnection, SourcePort};

/// Opens MySQL connections from a fixed parameter set.
pub struct MysqlExtractionAdapter {
    opts: Opts,
}

impl MysqlExtractionAdapter {
    pub fn new(db: &DatabaseConfig) -> Self {
        let builder = OptsBuilder::new()
            .ip_or_hostname(Some(db.host.clone()))
            .tcp_port(db.port)
            .user(Some(db.username.clone()))
            .pass(Some(db.password.clone()))
            .db_name(Some(db.database.clone()));
        Self {
            opts: Opts::from(builder),
        }
    }
}

impl SourcePort for MysqlExtractionAdapter {
    fn connect(&self) -> Result<Box<dyn SourceConnection>> {
        let conn =
            Conn::new(self.opts.clone()).map_err(|e| ExportError::Connection(e.to_string()))?;
        Ok(Box::new(MysqlConnection { conn: Some(conn) }))
    }
}

/// An open MySQL connection. `close` drops the underlying `Conn`, which
/// sends COM_QUIT and tears down the TCP stream.
pub struct MysqlConnection {
    conn: Option<Conn>,
}

impl SourceConnection for MysqlConnection {
    fn fetch_all(&mut self, query: &str) -> Result<ResultTable> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| ExportError::Query("connection already released".to_string()))?;

        let mut result = conn
            .query_iter(query)
            .map_err(|e| ExportError::Query(e.to_string()))?;

        // Schema-on-read: the column set and types come from the result
        // metadata, not from anything declared in this program.
        let columns: Vec<ColumnMeta> = result
            .columns()
            .as_ref()
            .iter()
            .map(|c| {
                ColumnMeta::new(
                    c.name_str().into_owned(),
                    mapping::map_mysql_to_kind(c.column_type(), c.flags(), c.column_length()),
                )
            })
            .collect();
        debug!(
            "Discovered {} columns: {:?}",
            columns.len(),
            columns.iter().map(|c| &c.name).collect::<Vec<_>>()
        );

        let mut table = ResultTable::new(columns);
        for row in result.by_ref() {
            let row = row.map_err(|e| ExportError::Query(e.to_string()))?;
            let mut cells = Vec::with_capacity(table.column_count());
            for (i, meta) in table.columns.iter().enumerate() {
                let value = row.as_ref(i).cloned().unwrap_or(Value::NULL);
                cells.push(decode_value(value, meta)?);
            }
            table.push_row(cells);
        }

        Ok(table)
    }

    fn close(&mut self) -> Result<()> {
        // Dropping the Conn is the release; it cannot fail from here.
        self.conn.take();
        Ok(())
    }
}

/// Decodes one wire value into the cell kind the column was mapped to.
///
/// The text protocol delivers every non-NULL value as `Value::Bytes`; the
/// binary-protocol variants (`Int`, `Double`, `Date`, ...) are handled too
/// so the adapter keeps working if a prepared statement ever produces the
/// rows. A value that cannot be decoded is a `Query` error, since it means
/// the fetch produced something the discovered schema cannot hold.
fn decode_value(value: Value, meta: &ColumnMeta) -> Result<CellValue> {
    let mismatch = |value: &Value| {
        ExportError::Query(format!(
            "column '{}': cannot decode {:?} as {}",
            meta.name, value, meta.kind
        ))
    };

    if value == Value::NULL {
        return Ok(CellValue::Null);
    }

    let cell = match (meta.kind, &value) {
        (ColumnKind::Int64, Value::Int(v)) => CellValue::Int64(*v),
        (ColumnKind::Int64, Value::Bytes(b)) => CellValue::Int64(parse_text(b, meta)?),

        (ColumnKind::UInt64, Value::UInt(v)) => CellValue::UInt64(*v),
        (ColumnKind::UInt64, Value::Int(v)) if *v >= 0 => CellValue::UInt64(*v as u64),
        (ColumnKind::UInt64, Value::Bytes(b)) => CellValue::UInt64(parse_text(b, meta)?),

        (ColumnKind::Float64, Value::Float(v)) => CellValue::Float64(f64::from(*v)),
        (ColumnKind::Float64, Value::Double(v)) => CellValue::Float64(*v),
        (ColumnKind::Float64, Value::Bytes(b)) => CellValue::Float64(parse_text(b, meta)?),

        (ColumnKind::Boolean, Value::Int(v)) => CellValue::Boolean(*v != 0),
        (ColumnKind::Boolean, Value::Bytes(b)) => {
            CellValue::Boolean(parse_text::<i64>(b, meta)? != 0)
        }

        (ColumnKind::Utf8, Value::Bytes(b)) => {
            CellValue::Utf8(String::from_utf8_lossy(b).into_owned())
        }

        (ColumnKind::Binary, Value::Bytes(b)) => CellValue::Binary(b.clone()),

        (ColumnKind::TimestampMicros, Value::Date(y, mo, d, h, mi, s, us)) => {
            CellValue::TimestampMicros(datetime_to_micros(
                i32::from(*y),
                u32::from(*mo),
                u32::from(*d),
                u32::from(*h),
                u32::from(*mi),
                u32::from(*s),
                *us,
                meta,
            )?)
        }
        (ColumnKind::TimestampMicros, Value::Bytes(b)) => {
            let text = String::from_utf8_lossy(b);
            let dt = chrono::NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S%.f")
                .map_err(|_| mismatch(&value))?;
            CellValue::TimestampMicros(dt.and_utc().timestamp_micros())
        }

        (ColumnKind::Date32, Value::Date(y, mo, d, ..)) => CellValue::Date32(date_to_days(
            i32::from(*y),
            u32::from(*mo),
            u32::from(*d),
            meta,
        )?),
        (ColumnKind::Date32, Value::Bytes(b)) => {
            let text = String::from_utf8_lossy(b);
            let date = chrono::NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                .map_err(|_| mismatch(&value))?;
            CellValue::Date32(days_since_epoch(date))
        }

        _ => return Err(mismatch(&value)),
    };

    Ok(cell)
}

fn parse_text<T: std::str::FromStr>(bytes: &[u8], meta: &ColumnMeta) -> Result<T> {
    let text = std::str::from_utf8(bytes).map_err(|_| {
        ExportError::Query(format!("column '{}': non-UTF8 {} value", meta.name, meta.kind))
    })?;
    text.trim().parse::<T>().map_err(|_| {
        ExportError::Query(format!(
            "column '{}': cannot parse '{}' as {}",
            meta.name, text, meta.kind
        ))
    })
}

#[allow(clippy::too_many_arguments)]
fn datetime_to_micros(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    micros: u32,
    meta: &ColumnMeta,
) -> Result<i64> {
    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_micro_opt(hour, minute, second, micros))
        .map(|dt| dt.and_utc().timestamp_micros())
        .ok_or_else(|| {
            ExportError::Query(format!(
                "column '{}': invalid datetime {:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                meta.name, year, month, day, hour, minute, second
            ))
        })
}

fn date_to_days(year: i32, month: u32, day: u32, meta: &ColumnMeta) -> Result<i32> {
    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .map(days_since_epoch)
        .ok_or_else(|| {
            ExportError::Query(format!(
                "column '{}': invalid date {:04}-{:02}-{:02}",
                meta.name, year, month, day
            ))
        })
}

fn days_since_epoch(date: chrono::NaiveDate) -> i32 {
    // NaiveDate::default() is the Unix epoch, 1970-01-01.
    (date - chrono::NaiveDate::default()).num_days() as i32
}
