pub mod parquet_sink_adapter;
