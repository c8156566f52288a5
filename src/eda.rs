//! Exploratory statistics over the cleaned review table.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{CleanedRecord, Sentiment};

const TOP_N: usize = 15;

/// Aspects shown in the aspect-per-domain charts.
pub const TOP_DOMAIN_ASPECTS: usize = 10;

/// Aspect mention counts per domain.
#[derive(Debug, Clone, PartialEq)]
pub struct AspectDomainTable {
    pub aspects: Vec<String>,
    pub domains: Vec<String>,
    /// `counts[aspect][domain]`
    pub counts: Vec<Vec<u64>>,
}

impl AspectDomainTable {
    pub fn aspect_total(&self, aspect: usize) -> u64 {
        self.counts[aspect].iter().sum()
    }

    /// The `n` most mentioned aspects, most mentioned first; ties ordered by name.
    pub fn top_aspects(&self, n: usize) -> AspectDomainTable {
        let mut order: Vec<usize> = (0..self.aspects.len()).collect();
        order.sort_by(|&a, &b| {
            self.aspect_total(b)
                .cmp(&self.aspect_total(a))
                .then_with(|| self.aspects[a].cmp(&self.aspects[b]))
        });
        order.truncate(n);
        AspectDomainTable {
            aspects: order.iter().map(|&a| self.aspects[a].clone()).collect(),
            domains: self.domains.clone(),
            counts: order.iter().map(|&a| self.counts[a].clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdaStats {
    pub rows: usize,
    /// Counts in `Sentiment::ALL` order.
    pub sentiment_counts: [u64; 3],
    /// (strength, counts in `Sentiment::ALL` order)
    pub strength_counts: Vec<(u8, [u64; 3])>,
    pub unique_features: usize,
    pub unique_aspects: usize,
    /// `None` when no row carries a domain.
    pub unique_domains: Option<usize>,
    /// (words in clean_sentence, rows)
    pub sentence_lengths: Vec<(usize, u64)>,
    pub top_pos_tags: Option<Vec<(String, u64)>>,
    pub top_noun_phrases: Option<Vec<(String, u64)>>,
    pub aspect_domain: Option<AspectDomainTable>,
}

impl EdaStats {
    pub fn compute(records: &[CleanedRecord]) -> Self {
        let mut sentiment_counts = [0u64; 3];
        let mut strengths: BTreeMap<u8, [u64; 3]> = BTreeMap::new();
        let mut lengths: BTreeMap<usize, u64> = BTreeMap::new();
        for r in records {
            sentiment_counts[r.sentiment.index()] += 1;
            strengths.entry(r.strength).or_default()[r.sentiment.index()] += 1;
            *lengths.entry(r.clean_sentence.split_whitespace().count()).or_default() += 1;
        }

        let unique = |f: fn(&CleanedRecord) -> &str| -> usize {
            records.iter().map(f).filter(|s| !s.is_empty()).collect::<BTreeSet<_>>().len()
        };
        let unique_domains = Some(unique(|r| r.domain.as_str())).filter(|&n| n > 0);

        let pos_tags = records
            .iter()
            .flat_map(|r| r.pos_tags.split_whitespace())
            .filter_map(|pair| pair.rsplit('_').next())
            .filter(|tag| !tag.is_empty());
        let noun_phrases = records
            .iter()
            .flat_map(|r| r.noun_phrases.split(';'))
            .map(str::trim)
            .filter(|np| !np.is_empty());

        Self {
            rows: records.len(),
            sentiment_counts,
            strength_counts: strengths.into_iter().collect(),
            unique_features: unique(|r| r.clean_feature.as_str()),
            unique_aspects: unique(|r| r.aspect.as_str()),
            unique_domains,
            sentence_lengths: lengths.into_iter().collect(),
            top_pos_tags: Some(value_counts(pos_tags, TOP_N)).filter(|v| !v.is_empty()),
            top_noun_phrases: Some(value_counts(noun_phrases, TOP_N)).filter(|v| !v.is_empty()),
            aspect_domain: unique_domains.map(|_| aspect_domain_table(records)),
        }
    }

    pub fn sentiment_count(&self, label: Sentiment) -> u64 {
        self.sentiment_counts[label.index()]
    }
}

/// Most frequent values first; ties ordered by value.
pub fn value_counts<'a, I>(values: I, limit: usize) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut sorted: Vec<(String, u64)> = counts.into_iter().map(|(k, n)| (k.to_string(), n)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(limit);
    sorted
}

fn aspect_domain_table(records: &[CleanedRecord]) -> AspectDomainTable {
    let aspects: Vec<String> = records.iter().map(|r| r.aspect.clone()).collect::<BTreeSet<_>>().into_iter().collect();
    let domains: Vec<String> = records
        .iter()
        .filter(|r| !r.domain.is_empty())
        .map(|r| r.domain.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut counts = vec![vec![0u64; domains.len()]; aspects.len()];
    for r in records {
        let (Ok(a), Ok(d)) = (aspects.binary_search(&r.aspect), domains.binary_search(&r.domain)) else {
            continue;
        };
        counts[a][d] += 1;
    }
    AspectDomainTable { aspects, domains, counts }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(domain: &str, sentence: &str, aspect: &str, sentiment: Sentiment, strength: u8, pos: &str, nps: &str) -> CleanedRecord {
        CleanedRecord {
            domain: domain.to_string(),
            sentence: sentence.to_string(),
            feature: aspect.to_string(),
            sentiment,
            strength,
            clean_sentence: sentence.to_string(),
            clean_feature: aspect.to_string(),
            aspect: aspect.to_string(),
            pos_tags: pos.to_string(),
            noun_phrases: nps.to_string(),
        }
    }

    #[test]
    fn computes_distributions() {
        let records = vec![
            record("phone", "battery great", "battery", Sentiment::Positive, 2, "battery_NOUN great_ADJ", "battery"),
            record("phone", "screen dim", "screen", Sentiment::Negative, 1, "screen_NOUN dim_ADJ", "screen"),
            record("camera", "great battery life", "battery", Sentiment::Positive, 2, "great_ADJ battery_NOUN life_NOUN", "great battery life"),
        ];
        let stats = EdaStats::compute(&records);

        assert_eq!(stats.rows, 3);
        assert_eq!(stats.sentiment_count(Sentiment::Positive), 2);
        assert_eq!(stats.strength_counts, vec![(1, [0, 0, 1]), (2, [2, 0, 0])]);
        assert_eq!(stats.unique_aspects, 2);
        assert_eq!(stats.unique_domains, Some(2));
        assert_eq!(stats.sentence_lengths, vec![(2, 2), (3, 1)]);
        assert_eq!(
            stats.top_pos_tags.as_deref().unwrap()[..2],
            [("NOUN".to_string(), 4), ("ADJ".to_string(), 3)]
        );

        let table = stats.aspect_domain.unwrap();
        assert_eq!(table.aspects, vec!["battery", "screen"]);
        assert_eq!(table.domains, vec!["camera", "phone"]);
        assert_eq!(table.counts, vec![vec![1, 1], vec![0, 1]]);
    }

    #[test]
    fn missing_optional_columns_degrade_to_none() {
        let records = vec![record("", "battery great", "battery", Sentiment::Positive, 3, "", "")];
        let stats = EdaStats::compute(&records);
        assert!(stats.unique_domains.is_none());
        assert!(stats.top_pos_tags.is_none());
        assert!(stats.top_noun_phrases.is_none());
        assert!(stats.aspect_domain.is_none());
    }

    #[test]
    fn aspect_domain_chart_keeps_most_mentioned_aspects() {
        let mut records = Vec::new();
        for i in 0..300 {
            records.push(record("phone", "some words", &format!("aspect{:03}", i), Sentiment::Neutral, 1, "", ""));
        }
        for _ in 0..3 {
            records.push(record("camera", "lens sharp", "aspect250", Sentiment::Positive, 2, "", ""));
        }
        records.push(record("camera", "zoom fine", "aspect100", Sentiment::Positive, 2, "", ""));

        let table = EdaStats::compute(&records).aspect_domain.unwrap();
        assert_eq!(table.aspects.len(), 300);

        let top = table.top_aspects(TOP_DOMAIN_ASPECTS);
        assert_eq!(top.aspects.len(), TOP_DOMAIN_ASPECTS);
        assert_eq!(top.aspects[0], "aspect250");
        assert_eq!(top.aspects[1], "aspect100");
        assert_eq!(top.aspects[2], "aspect000");
        assert_eq!(top.counts[0], vec![3, 1]);
        assert_eq!(top.domains, table.domains);
    }

    #[test]
    fn value_counts_breaks_ties_by_value() {
        let counts = value_counts(["b", "a", "c", "a", "b"], 2);
        assert_eq!(counts, vec![("a".to_string(), 2), ("b".to_string(), 2)]);
    }
}
