use anyhow::Result;
use log::info;

use review_aspects::config::PipelineConfig;
use review_aspects::env_loader;
use review_aspects::model_mapping;
use review_aspects::models::CleanedRecord;
use review_aspects::table_io;
use review_aspects::zero_shot::HfInferenceClassifier;

#[tokio::main]
async fn main() -> Result<()> {
    env_loader::load_env();
    env_logger::init();

    let config = PipelineConfig::from_env();
    let records: Vec<CleanedRecord> = table_io::read_table(config.cleaned_reviews_path())?;

    let classifier = HfInferenceClassifier::new(&config.zero_shot)?;
    info!("Predicting sentiment with zero-shot model at {}", classifier.url());

    let run = model_mapping::model_based_relation_mapping(&records, &classifier, true).await;

    let output_path = config.bert_mapping_path();
    table_io::write_table(&output_path, &run.mappings)?;

    println!("\n✅ BERT-based relation mapping complete.");
    println!(
        "   {} rows classified, {} failed, {} not usable",
        run.mappings.len(),
        run.failures.len(),
        run.skipped_ineligible
    );
    println!("📄 Output saved to: {:?}", output_path);
    Ok(())
}
