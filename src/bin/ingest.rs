use anyhow::{anyhow, Result};
use log::info;

use review_aspects::config::PipelineConfig;
use review_aspects::env_loader;
use review_aspects::ingest;
use review_aspects::table_io;

fn main() -> Result<()> {
    env_loader::load_env();
    env_logger::init();

    let config = PipelineConfig::from_env();
    info!("Starting ingestion of review corpus under {:?}", config.data_dir);

    let output = ingest::parse_all_reviews(&config.data_dir)?;
    if output.per_dataset.is_empty() {
        return Err(anyhow!("No dataset folders with .txt files found under {:?}", config.data_dir));
    }

    for (dataset, records) in &output.per_dataset {
        let path = config.per_dataset_dir().join(format!("{}.csv", dataset));
        table_io::write_table(&path, records)?;
        println!("📁 {}: {} records -> {:?}", dataset, records.len(), path);
    }

    let combined_path = config.combined_reviews_path();
    table_io::write_table(&combined_path, &output.combined)?;
    println!("✅ All {} reviews saved to {:?}", output.combined.len(), combined_path);
    Ok(())
}
