use anyhow::Result;
use log::info;

use review_aspects::aspects::AspectNormalizer;
use review_aspects::config::PipelineConfig;
use review_aspects::env_loader;
use review_aspects::models::ReviewRecord;
use review_aspects::nlp::HeuristicParser;
use review_aspects::preprocess::Preprocessor;
use review_aspects::table_io;
use review_aspects::text_clean::TextCleaner;

const PREVIEW_ROWS: usize = 5;

fn main() -> Result<()> {
    env_loader::load_env();
    env_logger::init();

    let config = PipelineConfig::from_env();
    info!(
        "Preprocessing with stopword removal={}, aspect normalization, POS tagging and NP extraction...",
        config.remove_stopwords
    );

    let reviews: Vec<ReviewRecord> = table_io::read_table(config.combined_reviews_path())?;

    let cleaner = TextCleaner::new();
    let normalizer = AspectNormalizer::default();
    let parser = HeuristicParser::new();
    let preprocessor = Preprocessor {
        cleaner: &cleaner,
        normalizer: &normalizer,
        parser: &parser,
        remove_stopwords: config.remove_stopwords,
    };
    let cleaned = preprocessor.process_all(&reviews);

    println!("\n📄 Sample preview:");
    for row in cleaned.iter().take(PREVIEW_ROWS) {
        println!(
            "  [{}] {:?} -> {:?} | {} -> {} | {} | {}",
            row.domain, row.sentence, row.clean_sentence, row.feature, row.aspect, row.pos_tags, row.noun_phrases
        );
    }

    let output_path = config.cleaned_reviews_path();
    table_io::write_table(&output_path, &cleaned)?;
    println!("\n✅ Cleaned & enriched data saved to {:?}", output_path);
    Ok(())
}
