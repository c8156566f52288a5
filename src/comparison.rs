use log::info;
use std::collections::HashMap;

use crate::models::{ComparisonRecord, ModelMapping, RuleMapping, Sentiment};

/// Inner join of the two mapping tables on (sentence, aspect).
/// Every matching pair is kept, in rule-table order then model-table order.
pub fn compare_mappings(rule: &[RuleMapping], model: &[ModelMapping]) -> Vec<ComparisonRecord> {
    let mut model_index: HashMap<(&str, &str), Vec<&ModelMapping>> = HashMap::new();
    for m in model {
        model_index
            .entry((m.clean_sentence.as_str(), m.aspect.as_str()))
            .or_default()
            .push(m);
    }

    let mut merged = Vec::new();
    for r in rule {
        let Some(matches) = model_index.get(&(r.clean_sentence.as_str(), r.aspect.as_str())) else {
            continue;
        };
        for m in matches {
            merged.push(ComparisonRecord {
                sentence: r.clean_sentence.clone(),
                aspect: r.aspect.clone(),
                rule_domain: r.domain.clone(),
                bert_domain: m.domain.clone(),
                opinion_word: r.opinion_word.clone(),
                rule_sentiment: r.sentiment,
                bert_sentiment: m.predicted_sentiment,
                confidence: m.confidence,
                agreement: r.sentiment == m.predicted_sentiment,
            });
        }
    }

    info!("Joined {} rule rows and {} model rows into {} pairs.", rule.len(), model.len(), merged.len());
    merged
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonStats {
    pub total: usize,
    pub agreement: usize,
    pub agreement_rate: f64,
}

impl ComparisonStats {
    pub fn from_records(records: &[ComparisonRecord]) -> Self {
        let total = records.len();
        let agreement = records.iter().filter(|r| r.agreement).count();
        let agreement_rate = if total > 0 { agreement as f64 / total as f64 } else { 0.0 };
        Self { total, agreement, agreement_rate }
    }
}

/// Counts over `Sentiment::ALL`; rows are rule-based labels, columns model-based labels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    pub counts: [[u64; 3]; 3],
}

impl ConfusionMatrix {
    pub fn from_records(records: &[ComparisonRecord]) -> Self {
        let mut matrix = Self::default();
        for r in records {
            matrix.counts[r.rule_sentiment.index()][r.bert_sentiment.index()] += 1;
        }
        matrix
    }

    pub fn get(&self, rule: Sentiment, bert: Sentiment) -> u64 {
        self.counts[rule.index()][bert.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MappingMethod;

    fn rule(sentence: &str, aspect: &str, sentiment: Sentiment) -> RuleMapping {
        RuleMapping {
            domain: "phone".to_string(),
            aspect: aspect.to_string(),
            clean_sentence: sentence.to_string(),
            opinion_word: "word".to_string(),
            sentiment,
            method: MappingMethod::RuleBased,
        }
    }

    fn model(sentence: &str, aspect: &str, sentiment: Sentiment) -> ModelMapping {
        ModelMapping {
            domain: "phone".to_string(),
            aspect: aspect.to_string(),
            clean_sentence: sentence.to_string(),
            predicted_sentiment: sentiment,
            confidence: 0.9,
            method: MappingMethod::BertBased,
        }
    }

    #[test]
    fn three_of_five_agreeing_pairs_is_sixty_percent() {
        use Sentiment::*;
        let rules = vec![
            rule("s1", "battery", Positive),
            rule("s2", "screen", Negative),
            rule("s3", "sound", Neutral),
            rule("s4", "camera", Positive),
            rule("s5", "price", Negative),
            rule("s6", "size", Positive),
        ];
        let models = vec![
            model("s1", "battery", Positive),
            model("s2", "screen", Negative),
            model("s3", "sound", Neutral),
            model("s4", "camera", Negative),
            model("s5", "price", Neutral),
            model("s6", "design", Positive),
        ];

        let merged = compare_mappings(&rules, &models);
        let stats = ComparisonStats::from_records(&merged);

        assert_eq!(stats.total, 5);
        assert_eq!(stats.agreement, 3);
        assert!((stats.agreement_rate - 0.6).abs() < 1e-12);
    }

    #[test]
    fn empty_join_has_zero_rate() {
        let stats = ComparisonStats::from_records(&[]);
        assert_eq!(stats, ComparisonStats { total: 0, agreement: 0, agreement_rate: 0.0 });
    }

    #[test]
    fn duplicate_keys_join_every_pair() {
        let rules = vec![rule("s", "battery", Sentiment::Positive), rule("s", "battery", Sentiment::Negative)];
        let models = vec![model("s", "battery", Sentiment::Positive), model("s", "battery", Sentiment::Neutral)];
        let merged = compare_mappings(&rules, &models);

        assert_eq!(merged.len(), 4);
        assert_eq!(merged.iter().filter(|r| r.agreement).count(), 1);
        assert_eq!(merged[1].bert_sentiment, Sentiment::Neutral);
    }

    #[test]
    fn confusion_matrix_rows_are_rule_labels() {
        use Sentiment::*;
        let rules = vec![rule("a", "x", Positive), rule("b", "x", Neutral), rule("c", "x", Neutral)];
        let models = vec![model("a", "x", Negative), model("b", "x", Neutral), model("c", "x", Positive)];
        let matrix = ConfusionMatrix::from_records(&compare_mappings(&rules, &models));

        assert_eq!(matrix.get(Positive, Negative), 1);
        assert_eq!(matrix.get(Neutral, Neutral), 1);
        assert_eq!(matrix.get(Neutral, Positive), 1);
        assert_eq!(matrix.get(Negative, Positive), 0);
        assert_eq!(matrix.total(), 3);
    }
}
