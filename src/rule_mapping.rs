use log::{debug, info};
use std::collections::HashSet;

use crate::lexicon::OpinionLexicon;
use crate::models::{CleanedRecord, MappingMethod, RuleMapping};
use crate::nlp::{LinguisticParser, ParsedSentence, PosTag};

/// First adjective among the token's children, else its head when that is an adjective.
pub fn find_opinion_word(parsed: &ParsedSentence, token: usize) -> Option<usize> {
    let tokens = parsed.tokens();
    parsed
        .children(token)
        .into_iter()
        .find(|&child| tokens[child].pos == PosTag::Adj)
        .or_else(|| parsed.head(token).filter(|&head| tokens[head].pos == PosTag::Adj))
}

/// Maps one record to at most one aspect/opinion pair.
pub fn map_record<P: LinguisticParser>(
    record: &CleanedRecord,
    parser: &P,
    lexicon: &OpinionLexicon,
) -> Option<RuleMapping> {
    if record.aspect.is_empty() || record.clean_sentence.is_empty() {
        return None;
    }

    let parsed = parser.parse(&record.clean_sentence);
    let (aspect_idx, opinion_idx) = parsed
        .tokens()
        .iter()
        .enumerate()
        .filter(|(_, t)| t.lower == record.aspect)
        .find_map(|(i, _)| find_opinion_word(&parsed, i).map(|o| (i, o)))?;

    let opinion = &parsed.tokens()[opinion_idx].text;
    debug!("Aspect '{}' (token {}) -> opinion '{}'", record.aspect, aspect_idx, opinion);
    Some(RuleMapping {
        domain: record.domain.clone(),
        aspect: record.aspect.clone(),
        clean_sentence: record.clean_sentence.clone(),
        opinion_word: opinion.clone(),
        sentiment: lexicon.classify(opinion),
        method: MappingMethod::RuleBased,
    })
}

/// At most one mapping per (clean_sentence, aspect) pair, in record order.
pub fn rule_based_relation_mapping<P: LinguisticParser>(
    records: &[CleanedRecord],
    parser: &P,
    lexicon: &OpinionLexicon,
) -> Vec<RuleMapping> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut mappings = Vec::new();
    for record in records {
        // One row per (sentence, aspect); the first record that yields an opinion wins.
        if seen.contains(&(record.clean_sentence.clone(), record.aspect.clone())) {
            continue;
        }
        if let Some(mapping) = map_record(record, parser, lexicon) {
            seen.insert((mapping.clean_sentence.clone(), mapping.aspect.clone()));
            mappings.push(mapping);
        }
    }
    info!("Rule-based mapping found opinions for {} of {} records.", mappings.len(), records.len());
    mappings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;
    use crate::nlp::HeuristicParser;

    fn cleaned(sentence: &str, aspect: &str) -> CleanedRecord {
        CleanedRecord {
            domain: "electronics".to_string(),
            sentence: sentence.to_string(),
            feature: aspect.to_string(),
            sentiment: Sentiment::Positive,
            strength: 2,
            clean_sentence: sentence.to_string(),
            clean_feature: aspect.to_string(),
            aspect: aspect.to_string(),
            pos_tags: String::new(),
            noun_phrases: String::new(),
        }
    }

    #[test]
    fn copular_sentence_yields_positive_opinion() {
        let mapping = map_record(&cleaned("The battery is great", "battery"), &HeuristicParser::new(), &OpinionLexicon::builtin()).unwrap();
        assert_eq!(mapping.opinion_word, "great");
        assert_eq!(mapping.sentiment, Sentiment::Positive);
        assert_eq!(mapping.method, MappingMethod::RuleBased);
    }

    #[test]
    fn attributive_adjective_child_is_found() {
        let mapping = map_record(&cleaned("terrible screen", "screen"), &HeuristicParser::new(), &OpinionLexicon::builtin()).unwrap();
        assert_eq!(mapping.opinion_word, "terrible");
        assert_eq!(mapping.sentiment, Sentiment::Negative);
    }

    #[test]
    fn adjective_outside_lexicon_is_neutral() {
        let mapping = map_record(&cleaned("the case is blue", "case"), &HeuristicParser::new(), &OpinionLexicon::builtin()).unwrap();
        assert_eq!(mapping.opinion_word, "blue");
        assert_eq!(mapping.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn no_aspect_token_or_no_adjective_emits_nothing() {
        let parser = HeuristicParser::new();
        let lexicon = OpinionLexicon::builtin();
        assert!(map_record(&cleaned("the screen is great", "battery"), &parser, &lexicon).is_none());
        assert!(map_record(&cleaned("i charged the battery", "battery"), &parser, &lexicon).is_none());
        assert!(map_record(&cleaned("", "battery"), &parser, &lexicon).is_none());
    }

    #[test]
    fn first_matching_occurrence_wins() {
        let mapping = map_record(
            &cleaned("great sound and the sound is awful", "sound"),
            &HeuristicParser::new(),
            &OpinionLexicon::builtin(),
        )
        .unwrap();
        assert_eq!(mapping.opinion_word, "great");
    }

    #[test]
    fn emits_at_most_one_mapping_per_record() {
        let records = vec![
            cleaned("great sound and the sound is awful", "sound"),
            cleaned("nothing to see", "camera"),
            cleaned("the camera is sharp", "camera"),
        ];
        let mappings = rule_based_relation_mapping(&records, &HeuristicParser::new(), &OpinionLexicon::builtin());
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[1].aspect, "camera");
        assert_eq!(mappings[1].sentiment, Sentiment::Positive);
    }

    #[test]
    fn repeated_sentence_aspect_pair_is_mapped_once() {
        let mut plural = cleaned("battery great", "battery");
        plural.feature = "batteries".to_string();
        let records = vec![cleaned("battery great", "battery"), plural, cleaned("battery great", "screen")];

        let mappings = rule_based_relation_mapping(&records, &HeuristicParser::new(), &OpinionLexicon::builtin());
        let battery_rows = mappings.iter().filter(|m| m.aspect == "battery").count();
        assert_eq!(battery_rows, 1);
        assert_eq!(mappings.len(), 1);
    }

    #[test]
    fn adjective_child_wins_over_adjective_head() {
        let parser = HeuristicParser::new();
        let parsed = parser.parse("great battery is terrible");
        let battery = 1;
        assert_eq!(parsed.tokens()[parsed.head(battery).unwrap()].text, "terrible");

        let mapping = map_record(&cleaned("great battery is terrible", "battery"), &parser, &OpinionLexicon::builtin()).unwrap();
        assert_eq!(mapping.opinion_word, "great");
        assert_eq!(mapping.sentiment, Sentiment::Positive);
    }
}
