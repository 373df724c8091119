//! # MySQL → Parquet Exporter
//!
//! A small utility that runs one fixed query against a MySQL database and
//! writes the complete result set to a local Parquet file, logging how long
//! each phase took.
//!
//! The code follows the **Hexagonal Architecture** (Ports and Adapters) in
//! miniature: the pipeline only talks to a source port and a sink port, so
//! the release-on-every-exit-path guarantee is testable without a server.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;

use std::process;
use std::sync::Arc;

use env_logger::Env;
use log::{error, info};

use crate::application::pipeline::ExportPipeline;
use crate::config::ExportConfig;
use crate::infrastructure::mysql::mysql_extraction_adapter::MysqlExtractionAdapter;
use crate::infrastructure::parquet::parquet_sink_adapter::ParquetSinkAdapter;

fn main() {
    // Default to info so the timing lines show up without RUST_LOG set.
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = ExportConfig::fixed();
    let output_file = config.output_file.clone();

    let source = Arc::new(MysqlExtractionAdapter::new(&config.database));
    let sink = Arc::new(ParquetSinkAdapter::new());
    let pipeline = ExportPipeline::new(source, sink, config);

    info!("Querying MySQL and writing to Parquet...");
    match pipeline.run() {
        Ok(report) => {
            info!(
                "Query results saved to {} ({} rows, {} bytes).",
                output_file.display(),
                report.rows,
                report.bytes
            );
        }
        Err(e) => {
            error!("Export failed: {}", e);
            process::exit(1);
        }
    }
}
