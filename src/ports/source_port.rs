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

//! # Source Port
//!
//! This Port defines the contract for the database side of the pipeline.
//!
//! Splitting `connect` from the connection itself keeps the pipeline's
//! release guarantee testable: once `connect` succeeds, the pipeline owns a
//! `SourceConnection` and must call `close` on it exactly once, no matter
//! what the fetch or the Parquet write do.

use crate::domain::entities::ResultTable;
use crate::domain::errors::Result;

/// Opens connections to the source database.
pub trait SourcePort: Send + Sync {
    /// Establishes a single connection. One attempt, no retry; a failure is
    /// an `ExportError::Connection`.
    fn connect(&self) -> Result<Box<dyn SourceConnection>>;
}

/// An established connection, valid until `close` is called.
pub trait SourceConnection {
    /// Executes `query` and buffers the complete result set in memory,
    /// discovering the column schema from the result metadata.
    fn fetch_all(&mut self, query: &str) -> Result<ResultTable>;

    /// Releases the connection. Safe to call after a failed fetch; a failure
    /// here is an `ExportError::Release`.
    fn close(&mut self) -> Result<()>;
}
