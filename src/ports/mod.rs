//! Ports are the traits that separate the pipeline from infrastructure.

pub mod sink_port;
pub mod source_port;
