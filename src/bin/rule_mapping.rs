use anyhow::Result;
use log::info;

use review_aspects::config::PipelineConfig;
use review_aspects::env_loader;
use review_aspects::lexicon::OpinionLexicon;
use review_aspects::models::CleanedRecord;
use review_aspects::nlp::HeuristicParser;
use review_aspects::rule_mapping;
use review_aspects::table_io;

fn main() -> Result<()> {
    env_loader::load_env();
    env_logger::init();

    let config = PipelineConfig::from_env();
    let records: Vec<CleanedRecord> = table_io::read_table(config.cleaned_reviews_path())?;
    let records: Vec<CleanedRecord> = records
        .into_iter()
        .filter(|r| !r.clean_sentence.is_empty() && !r.aspect.is_empty() && !r.domain.is_empty())
        .collect();

    let lexicon = OpinionLexicon::load(config.lexicon_dir())?;
    let parser = HeuristicParser::new();

    info!("Performing rule-based relation mapping on {} rows...", records.len());
    let mappings = rule_mapping::rule_based_relation_mapping(&records, &parser, &lexicon);

    let output_path = config.rule_mapping_path();
    table_io::write_table(&output_path, &mappings)?;
    println!("✅ Rule-based relation mapping complete. Saved {} rows to {:?}", mappings.len(), output_path);
    Ok(())
}
