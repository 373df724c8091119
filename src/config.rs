//! Fixed run parameters.
//!
//! This version intentionally has no configuration surface: connection
//! details, query text, and output path are literal constants compiled into
//! the binary. Invalid values are not validated here; they surface as
//! connection-phase errors at runtime.

use std::path::PathBuf;

/// Connection parameters for the source database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

/// Everything one pipeline run needs: where to connect, what to run, and
/// where to write the result.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub database: DatabaseConfig,
    pub query: String,
    pub output_file: PathBuf,
}

impl ExportConfig {
    /// The built-in parameter set this utility ships with.
    pub fn fixed() -> Self {
        Self {
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 3306,
                username: "thisisauser".to_string(),
                password: "thisisapassword".to_string(),
                database: "RUST_TEST".to_string(),
            },
            query: "SELECT * FROM RUST_TEST.salary_data".to_string(),
            output_file: PathBuf::from("salary_data.parquet"),
        }
    }
}
