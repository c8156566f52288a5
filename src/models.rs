use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment label shared by the annotations and both relation mappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Fixed label order used for candidate labels, pivots and the confusion matrix.
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }

    pub fn parse(label: &str) -> Option<Sentiment> {
        match label.trim().to_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }

    /// Position of the label in `Sentiment::ALL`.
    pub fn index(&self) -> usize {
        match self {
            Sentiment::Positive => 0,
            Sentiment::Neutral => 1,
            Sentiment::Negative => 2,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MappingMethod {
    #[serde(rename = "rule-based")]
    RuleBased,
    #[serde(rename = "bert-based")]
    BertBased,
}

// Raw annotation rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub domain: String,
    pub sentence: String,
    pub feature: String,
    pub sentiment: Sentiment,
    pub strength: u8,
}

// Annotation rows after cleaning, aspect normalization and tagging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub domain: String,
    pub sentence: String,
    pub feature: String,
    pub sentiment: Sentiment,
    pub strength: u8,
    pub clean_sentence: String,
    pub clean_feature: String,
    pub aspect: String,
    pub pos_tags: String,   // "token_TAG token_TAG ..."
    pub noun_phrases: String, // ';'-joined chunk texts
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleMapping {
    pub domain: String,
    pub aspect: String,
    pub clean_sentence: String,
    pub opinion_word: String,
    pub sentiment: Sentiment,
    pub method: MappingMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMapping {
    pub domain: String,
    pub aspect: String,
    pub clean_sentence: String,
    pub predicted_sentiment: Sentiment,
    pub confidence: f64,
    pub method: MappingMethod,
}

// One joined (sentence, aspect) pair from both mappers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub sentence: String,
    pub aspect: String,
    pub rule_domain: String,
    pub bert_domain: String,
    pub opinion_word: String,
    pub rule_sentiment: Sentiment,
    pub bert_sentiment: Sentiment,
    pub confidence: f64,
    pub agreement: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpinionSummaryRow {
    pub aspect: String,
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
    pub total_mentions: u64,
    pub positive_ratio: f64,
    pub neutral_ratio: f64,
    pub negative_ratio: f64,
}

impl OpinionSummaryRow {
    pub fn count(&self, label: Sentiment) -> u64 {
        match label {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    pub fn ratio(&self, label: Sentiment) -> f64 {
        match label {
            Sentiment::Positive => self.positive_ratio,
            Sentiment::Neutral => self.neutral_ratio,
            Sentiment::Negative => self.negative_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_parses_case_insensitively() {
        assert_eq!(Sentiment::parse(" Positive "), Some(Sentiment::Positive));
        assert_eq!(Sentiment::parse("NEUTRAL"), Some(Sentiment::Neutral));
        assert_eq!(Sentiment::parse("mixed"), None);
    }

    #[test]
    fn sentiment_index_matches_label_order() {
        for (i, label) in Sentiment::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
        }
    }

    #[test]
    fn method_serializes_with_hyphenated_names() {
        assert_eq!(serde_json::to_string(&MappingMethod::RuleBased).unwrap(), "\"rule-based\"");
        assert_eq!(serde_json::to_string(&MappingMethod::BertBased).unwrap(), "\"bert-based\"");
    }
}
