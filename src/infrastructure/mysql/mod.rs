pub mod mysql_extraction_adapter;
