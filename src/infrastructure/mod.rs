//! Concrete adapters behind the ports: MySQL in, Parquet out.

pub mod mysql;
pub mod parquet;
