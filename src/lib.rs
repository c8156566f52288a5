pub mod aspects;
pub mod comparison;
pub mod config;
pub mod eda;
pub mod env_loader;
pub mod excel_writer;
pub mod ingest;
pub mod lexicon;
pub mod model_mapping;
pub mod models;
pub mod nlp;
pub mod opinion_summary;
pub mod plots;
pub mod preprocess;
pub mod rule_mapping;
pub mod table_io;
pub mod text_clean;
pub mod zero_shot;
