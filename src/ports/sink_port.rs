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

//! Port for persisting the in-memory result table to local storage.

use std::path::Path;

use crate::domain::entities::ResultTable;
use crate::domain::errors::Result;

/// Writes a result table to a columnar file.
pub trait SinkPort: Send + Sync {
    /// Writes `table` to `path`, creating or overwriting the file, and
    /// returns the number of bytes the finished file occupies. A zero-row
    /// table still produces a valid file carrying the column schema. Any
    /// failure is an `ExportError::Serialization`; a partial file may be
    /// left behind.
    fn write_table(&self, table: &ResultTable, path: &Path) -> Result<u64>;
}
