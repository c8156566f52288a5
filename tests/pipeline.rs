use std::fs;

use review_aspects::aspects::AspectNormalizer;
use review_aspects::comparison::{self, ComparisonStats, ConfusionMatrix};
use review_aspects::excel_writer;
use review_aspects::ingest;
use review_aspects::lexicon::OpinionLexicon;
use review_aspects::models::{CleanedRecord, MappingMethod, ModelMapping, ReviewRecord, Sentiment};
use review_aspects::nlp::HeuristicParser;
use review_aspects::opinion_summary::{self, SummaryMethod};
use review_aspects::plots;
use review_aspects::preprocess::Preprocessor;
use review_aspects::rule_mapping;
use review_aspects::table_io;
use review_aspects::text_clean::TextCleaner;

const ELECTRONICS: &str = "[t] phone review\n\
## The battery is great.\n\
battery[+2]\n\
\n\
## The screen is terrible.\n\
screen[-3]\n";

#[test]
fn annotated_files_flow_through_every_stage() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir_all(data.join("set1")).unwrap();
    fs::write(data.join("set1").join("electronics.txt"), ELECTRONICS).unwrap();

    let output = ingest::parse_all_reviews(&data).unwrap();
    assert_eq!(output.combined.len(), 2);
    assert_eq!(output.per_dataset[0].0, "set1");

    // Stage outputs go through CSV the same way the binaries hand them over.
    let combined_path = dir.path().join("output").join("combined_reviews.csv");
    table_io::write_table(&combined_path, &output.combined).unwrap();
    let reviews: Vec<ReviewRecord> = table_io::read_table(&combined_path).unwrap();

    let cleaner = TextCleaner::new();
    let normalizer = AspectNormalizer::default();
    let parser = HeuristicParser::new();
    let preprocessor = Preprocessor {
        cleaner: &cleaner,
        normalizer: &normalizer,
        parser: &parser,
        remove_stopwords: true,
    };
    let cleaned = preprocessor.process_all(&reviews);
    assert_eq!(cleaned.len(), 2);
    assert_eq!(cleaned[0].clean_sentence, "battery great");
    assert_eq!(cleaned[0].aspect, "battery");

    let cleaned_path = dir.path().join("output").join("cleaned_reviews.csv");
    table_io::write_table(&cleaned_path, &cleaned).unwrap();
    let cleaned: Vec<CleanedRecord> = table_io::read_table(&cleaned_path).unwrap();

    let rules = rule_mapping::rule_based_relation_mapping(&cleaned, &parser, &OpinionLexicon::builtin());
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].opinion_word, "great");
    assert_eq!(rules[0].sentiment, Sentiment::Positive);
    assert_eq!(rules[1].opinion_word, "terrible");
    assert_eq!(rules[1].sentiment, Sentiment::Negative);

    let models: Vec<ModelMapping> = cleaned
        .iter()
        .map(|r| ModelMapping {
            domain: r.domain.clone(),
            aspect: r.aspect.clone(),
            clean_sentence: r.clean_sentence.clone(),
            predicted_sentiment: Sentiment::Positive,
            confidence: 0.8,
            method: MappingMethod::BertBased,
        })
        .collect();

    let merged = comparison::compare_mappings(&rules, &models);
    let stats = ComparisonStats::from_records(&merged);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.agreement, 1);
    assert!((stats.agreement_rate - 0.5).abs() < 1e-12);
    assert_eq!(ConfusionMatrix::from_records(&merged).get(Sentiment::Negative, Sentiment::Positive), 1);

    let labels: Vec<(String, Sentiment)> = rules.iter().map(|r| (r.aspect.clone(), r.sentiment)).collect();
    let summary = opinion_summary::summarize(&labels);
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].aspect, "battery");
    assert_eq!(summary[0].positive_ratio, 1.0);
    assert_eq!(summary[1].negative, 1);

    let report = dir.path().join("figures").join("rule_based").join("opinion_report.xlsx");
    excel_writer::write_opinion_report(&report, SummaryMethod::Rule, &summary, opinion_summary::overall_counts(&labels))
        .unwrap();
    assert!(report.exists());

    let figures = plots::write_opinion_figures(
        &dir.path().join("figures").join("rule_based"),
        SummaryMethod::Rule,
        &summary,
        opinion_summary::overall_counts(&labels),
    )
    .unwrap();
    assert_eq!(figures.len(), 6);
    assert!(fs::read(&figures[0]).unwrap().starts_with(b"\x89PNG"));
}

#[test]
fn missing_data_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ingest::parse_all_reviews(&dir.path().join("absent")).is_err());
}
