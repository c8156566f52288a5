use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::models::{CleanedRecord, MappingMethod, ModelMapping, Sentiment};
use crate::zero_shot::{ClassifyError, ZeroShotClassifier};

pub const CANDIDATE_LABELS: [&str; 3] = ["positive", "neutral", "negative"];

const MIN_SENTENCE_CHARS: usize = 5;
const LOG_EVERY: usize = 100;

pub fn hypothesis_template(aspect: &str) -> String {
    format!("The sentiment toward the {} is {{}}", aspect)
}

/// Rows the classifier is asked about: non-empty fields and a sentence longer than five characters.
pub fn is_classifiable(record: &CleanedRecord) -> bool {
    !record.domain.is_empty()
        && !record.aspect.is_empty()
        && record.clean_sentence.chars().count() > MIN_SENTENCE_CHARS
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub async fn classify_record<C: ZeroShotClassifier>(
    record: &CleanedRecord,
    classifier: &C,
) -> Result<ModelMapping, ClassifyError> {
    let template = hypothesis_template(&record.aspect);
    let prediction = classifier
        .classify(&record.clean_sentence, &CANDIDATE_LABELS, &template)
        .await?;
    let (label, score) = prediction.top().ok_or(ClassifyError::EmptyPrediction)?;
    let predicted_sentiment =
        Sentiment::parse(label).ok_or_else(|| ClassifyError::UnknownLabel(label.to_string()))?;

    Ok(ModelMapping {
        domain: record.domain.clone(),
        aspect: record.aspect.clone(),
        clean_sentence: record.clean_sentence.clone(),
        predicted_sentiment,
        confidence: round3(score),
        method: MappingMethod::BertBased,
    })
}

/// Outcome of a classification pass.
#[derive(Debug, Default)]
pub struct MappingRun {
    pub mappings: Vec<ModelMapping>,
    pub skipped_ineligible: usize,
    pub failures: Vec<(usize, ClassifyError)>,
}

/// Classifies eligible rows one at a time. A failed row is logged and skipped.
pub async fn model_based_relation_mapping<C: ZeroShotClassifier>(
    records: &[CleanedRecord],
    classifier: &C,
    show_progress: bool,
) -> MappingRun {
    let mut run = MappingRun::default();
    let eligible: Vec<(usize, &CleanedRecord)> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| is_classifiable(r))
        .collect();
    run.skipped_ineligible = records.len() - eligible.len();
    info!(
        "Classifying {} rows ({} rows not usable).",
        eligible.len(),
        run.skipped_ineligible
    );

    let pb = if show_progress {
        let pb = ProgressBar::new(eligible.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.cyan} [{elapsed_precise}] {bar:30.green/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        pb.set_message("Classifying");
        pb
    } else {
        ProgressBar::hidden()
    };

    for (idx, record) in eligible {
        match classify_record(record, classifier).await {
            Ok(mapping) => {
                run.mappings.push(mapping);
                if idx % LOG_EVERY == 0 {
                    info!("Processed row {}", idx);
                }
            }
            Err(e) => {
                warn!("Error on row {}: {}", idx, e);
                run.failures.push((idx, e));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Classification done");

    info!(
        "Model-based mapping produced {} rows, {} failed.",
        run.mappings.len(),
        run.failures.len()
    );
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zero_shot::ZeroShotPrediction;
    use std::cell::RefCell;

    // Answers from a script keyed on the sentence; records every template it saw.
    struct ScriptedClassifier {
        templates: RefCell<Vec<String>>,
    }

    impl ZeroShotClassifier for ScriptedClassifier {
        async fn classify(
            &self,
            sequence: &str,
            candidate_labels: &[&str],
            hypothesis_template: &str,
        ) -> Result<ZeroShotPrediction, ClassifyError> {
            self.templates.borrow_mut().push(hypothesis_template.to_string());
            assert_eq!(candidate_labels, &CANDIDATE_LABELS);
            match sequence {
                s if s.contains("fail") => Err(ClassifyError::Status { status: 503, body: "loading".into() }),
                s if s.contains("odd") => ZeroShotPrediction::new(vec![("mixed".into(), 0.9)]),
                s if s.contains("awful") => ZeroShotPrediction::new(vec![
                    ("positive".into(), 0.05),
                    ("negative".into(), 0.87654),
                    ("neutral".into(), 0.07346),
                ]),
                _ => ZeroShotPrediction::new(vec![("positive".into(), 0.6), ("neutral".into(), 0.4)]),
            }
        }
    }

    fn record(sentence: &str, aspect: &str) -> CleanedRecord {
        CleanedRecord {
            domain: "audio".to_string(),
            sentence: sentence.to_string(),
            feature: aspect.to_string(),
            sentiment: Sentiment::Positive,
            strength: 1,
            clean_sentence: sentence.to_string(),
            clean_feature: aspect.to_string(),
            aspect: aspect.to_string(),
            pos_tags: String::new(),
            noun_phrases: String::new(),
        }
    }

    #[test]
    fn template_names_the_aspect() {
        assert_eq!(hypothesis_template("battery"), "The sentiment toward the battery is {}");
    }

    #[test]
    fn short_or_incomplete_rows_are_not_classifiable() {
        assert!(!is_classifiable(&record("short", "sound")));
        assert!(is_classifiable(&record("sound great", "sound")));
        assert!(!is_classifiable(&record("sound great", "")));
    }

    #[tokio::test]
    async fn failed_rows_are_skipped_and_processing_continues() {
        let classifier = ScriptedClassifier { templates: RefCell::new(Vec::new()) };
        let records = vec![
            record("speaker sounds awful", "sound"),
            record("tiny", "sound"),
            record("this one will fail", "battery"),
            record("odd label here", "screen"),
            record("screen looks fine", "screen"),
        ];

        let run = model_based_relation_mapping(&records, &classifier, false).await;

        assert_eq!(run.skipped_ineligible, 1);
        assert_eq!(run.mappings.len(), 2);
        assert_eq!(run.mappings[0].predicted_sentiment, Sentiment::Negative);
        assert_eq!(run.mappings[0].confidence, 0.877);
        assert_eq!(run.mappings[0].method, MappingMethod::BertBased);
        assert_eq!(run.mappings[1].predicted_sentiment, Sentiment::Positive);

        let failed_rows: Vec<usize> = run.failures.iter().map(|(i, _)| *i).collect();
        assert_eq!(failed_rows, vec![2, 3]);
        assert!(matches!(run.failures[1].1, ClassifyError::UnknownLabel(_)));
        assert_eq!(classifier.templates.borrow()[0], "The sentiment toward the sound is {}");
    }

    #[test]
    fn single_record_classification_blocks_to_completion() {
        let classifier = ScriptedClassifier { templates: RefCell::new(Vec::new()) };
        let mapping = tokio_test::block_on(classify_record(&record("battery holds up", "battery"), &classifier)).unwrap();
        assert_eq!(mapping.predicted_sentiment, Sentiment::Positive);
        assert_eq!(mapping.confidence, 0.6);
    }
}
