use log::{debug, info};

use crate::aspects::AspectNormalizer;
use crate::models::{CleanedRecord, ReviewRecord};
use crate::nlp::LinguisticParser;
use crate::text_clean::TextCleaner;

/// Explicitly constructed collaborators for the preprocessing stage.
pub struct Preprocessor<'a, P: LinguisticParser> {
    pub cleaner: &'a TextCleaner,
    pub normalizer: &'a AspectNormalizer,
    pub parser: &'a P,
    pub remove_stopwords: bool,
}

impl<P: LinguisticParser> Preprocessor<'_, P> {
    /// Cleans, normalizes and tags one record. Returns `None` when the cleaned
    /// sentence, feature or aspect is empty.
    pub fn process(&self, record: &ReviewRecord) -> Option<CleanedRecord> {
        let clean_sentence = self.cleaner.clean(&record.sentence, self.remove_stopwords);
        let clean_feature = self.cleaner.clean(&record.feature, false);
        let aspect = self.normalizer.normalize_feature(&clean_feature);

        if clean_sentence.is_empty() || clean_feature.is_empty() || aspect.is_empty() {
            debug!("Dropping record with empty cleaned fields: {:?}", record.sentence);
            return None;
        }

        let parsed = self.parser.parse(&clean_sentence);
        Some(CleanedRecord {
            domain: record.domain.clone(),
            sentence: record.sentence.clone(),
            feature: record.feature.clone(),
            sentiment: record.sentiment,
            strength: record.strength,
            pos_tags: parsed.pos_tag_string(),
            noun_phrases: parsed.noun_chunks().join(";"),
            clean_sentence,
            clean_feature,
            aspect,
        })
    }

    pub fn process_all(&self, records: &[ReviewRecord]) -> Vec<CleanedRecord> {
        let cleaned: Vec<CleanedRecord> = records.iter().filter_map(|r| self.process(r)).collect();
        info!(
            "Preprocessed {} records ({} dropped after cleaning).",
            cleaned.len(),
            records.len() - cleaned.len()
        );
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;
    use crate::nlp::HeuristicParser;

    fn record(sentence: &str, feature: &str) -> ReviewRecord {
        ReviewRecord {
            domain: "phone".to_string(),
            sentence: sentence.to_string(),
            feature: feature.to_string(),
            sentiment: Sentiment::Negative,
            strength: 1,
        }
    }

    #[test]
    fn enriches_record_with_clean_text_aspect_and_tags() {
        let (cleaner, normalizer, parser) = (TextCleaner::new(), AspectNormalizer::default(), HeuristicParser::new());
        let pre = Preprocessor { cleaner: &cleaner, normalizer: &normalizer, parser: &parser, remove_stopwords: true };

        let cleaned = pre.process(&record("The Batteries are weak!", "Batteries")).unwrap();
        assert_eq!(cleaned.clean_sentence, "batteries weak");
        assert_eq!(cleaned.clean_feature, "batteries");
        assert_eq!(cleaned.aspect, "battery");
        assert_eq!(cleaned.pos_tags, "batteries_NOUN weak_ADJ");
        assert_eq!(cleaned.noun_phrases, "batteries");
        assert_eq!(cleaned.sentiment, Sentiment::Negative);
    }

    #[test]
    fn keeps_stopwords_when_disabled() {
        let (cleaner, normalizer, parser) = (TextCleaner::new(), AspectNormalizer::default(), HeuristicParser::new());
        let pre = Preprocessor { cleaner: &cleaner, normalizer: &normalizer, parser: &parser, remove_stopwords: false };

        let cleaned = pre.process(&record("The screen is dim.", "display")).unwrap();
        assert_eq!(cleaned.clean_sentence, "the screen is dim");
        assert_eq!(cleaned.aspect, "screen");
        assert_eq!(cleaned.noun_phrases, "the screen");
    }

    #[test]
    fn drops_records_that_clean_to_nothing() {
        let (cleaner, normalizer, parser) = (TextCleaner::new(), AspectNormalizer::default(), HeuristicParser::new());
        let pre = Preprocessor { cleaner: &cleaner, normalizer: &normalizer, parser: &parser, remove_stopwords: true };

        let input = vec![record("it is what it is", "battery"), record("good battery", "!!"), record("good battery", "battery")];
        let cleaned = pre.process_all(&input);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].clean_sentence, "good battery");
    }
}
