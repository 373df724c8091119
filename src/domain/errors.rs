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

//! Core error definitions for the MySQL exporter.
//!
//! This module provides a centralized `ExportError` enum and a `Result` type
//! used throughout the application. Each pipeline phase maps its failures to
//! its own variant, so a caller can always tell whether a run died while
//! connecting, querying, writing Parquet, or releasing the connection.

use thiserror::Error;

/// Error types encountered during the export process.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The database connection could not be established or authenticated.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The query failed to execute or fetch on an established connection.
    #[error("Query failed: {0}")]
    Query(String),

    /// The in-memory table could not be written to the output path/format.
    #[error("Parquet serialization failed: {0}")]
    Serialization(String),

    /// Closing the connection itself failed. Never masks a prior error.
    #[error("Connection release failed: {0}")]
    Release(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for the MySQL exporter.
pub type Result<T> = std::result::Result<T, ExportError>;
