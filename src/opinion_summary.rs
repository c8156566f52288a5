use anyhow::{anyhow, Result};
use log::info;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::PipelineConfig;
use crate::models::{ModelMapping, OpinionSummaryRow, RuleMapping, Sentiment};
use crate::table_io;

/// Which relation-mapping table a summary is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMethod {
    Bert,
    Rule,
}

impl SummaryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryMethod::Bert => "bert",
            SummaryMethod::Rule => "rule",
        }
    }

    /// "Bert" / "Rule", used in chart titles.
    pub fn title(&self) -> &'static str {
        match self {
            SummaryMethod::Bert => "Bert",
            SummaryMethod::Rule => "Rule",
        }
    }

    pub fn input_path(&self, config: &PipelineConfig) -> PathBuf {
        match self {
            SummaryMethod::Bert => config.bert_mapping_path(),
            SummaryMethod::Rule => config.rule_mapping_path(),
        }
    }

    /// Loads the mapping table as (aspect, sentiment) pairs, dropping rows without an aspect.
    pub fn load_labels(&self, config: &PipelineConfig) -> Result<Vec<(String, Sentiment)>> {
        let path = self.input_path(config);
        info!("Using relation mapping from: {:?}", path);
        let pairs: Vec<(String, Sentiment)> = match self {
            SummaryMethod::Bert => table_io::read_table::<ModelMapping, _>(&path)?
                .into_iter()
                .map(|m| (m.aspect, m.predicted_sentiment))
                .collect(),
            SummaryMethod::Rule => table_io::read_table::<RuleMapping, _>(&path)?
                .into_iter()
                .map(|m| (m.aspect, m.sentiment))
                .collect(),
        };
        Ok(pairs.into_iter().filter(|(aspect, _)| !aspect.is_empty()).collect())
    }
}

impl FromStr for SummaryMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bert" => Ok(SummaryMethod::Bert),
            "rule" => Ok(SummaryMethod::Rule),
            other => Err(anyhow!("Unknown summary method '{}', expected 'bert' or 'rule'", other)),
        }
    }
}

/// Per-aspect label counts and ratios, sorted by aspect.
pub fn summarize(labels: &[(String, Sentiment)]) -> Vec<OpinionSummaryRow> {
    let mut counts: BTreeMap<&str, [u64; 3]> = BTreeMap::new();
    for (aspect, sentiment) in labels {
        counts.entry(aspect.as_str()).or_default()[sentiment.index()] += 1;
    }

    counts
        .into_iter()
        .map(|(aspect, c)| {
            let total = c.iter().sum::<u64>();
            let ratio = |n: u64| n as f64 / total as f64;
            OpinionSummaryRow {
                aspect: aspect.to_string(),
                positive: c[0],
                neutral: c[1],
                negative: c[2],
                total_mentions: total,
                positive_ratio: ratio(c[0]),
                neutral_ratio: ratio(c[1]),
                negative_ratio: ratio(c[2]),
            }
        })
        .collect()
}

/// Overall label counts in `Sentiment::ALL` order.
pub fn overall_counts(labels: &[(String, Sentiment)]) -> [u64; 3] {
    let mut counts = [0u64; 3];
    for (_, sentiment) in labels {
        counts[sentiment.index()] += 1;
    }
    counts
}

/// Up to `n` rows ordered by `key`, largest first; ties keep aspect order.
pub fn top_by<F>(summary: &[OpinionSummaryRow], n: usize, key: F) -> Vec<&OpinionSummaryRow>
where
    F: Fn(&OpinionSummaryRow) -> f64,
{
    let mut rows: Vec<&OpinionSummaryRow> = summary.iter().collect();
    rows.sort_by(|a, b| key(b).total_cmp(&key(a)));
    rows.truncate(n);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn labels(pairs: &[(&str, Sentiment)]) -> Vec<(String, Sentiment)> {
        pairs.iter().map(|(a, s)| (a.to_string(), *s)).collect()
    }

    #[test]
    fn pivots_counts_and_ratios_per_aspect() {
        use Sentiment::*;
        let summary = summarize(&labels(&[
            ("screen", Negative),
            ("battery", Positive),
            ("battery", Positive),
            ("battery", Neutral),
            ("screen", Negative),
        ]));

        assert_eq!(summary.len(), 2);
        let battery = &summary[0];
        assert_eq!(battery.aspect, "battery");
        assert_eq!((battery.positive, battery.neutral, battery.negative), (2, 1, 0));
        assert_eq!(battery.total_mentions, 3);
        assert_relative_eq!(battery.positive_ratio, 2.0 / 3.0);
        assert_eq!(summary[1].negative_ratio, 1.0);
        assert_eq!(summary[1].count(Positive), 0);
    }

    #[test]
    fn ratios_sum_to_one() {
        use Sentiment::*;
        let summary = summarize(&labels(&[
            ("a", Positive),
            ("a", Neutral),
            ("a", Negative),
            ("b", Neutral),
            ("c", Negative),
            ("c", Positive),
            ("c", Positive),
        ]));
        for row in &summary {
            assert!(row.total_mentions > 0);
            let sum: f64 = Sentiment::ALL.iter().map(|s| row.ratio(*s)).sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn top_by_orders_descending_and_truncates() {
        use Sentiment::*;
        let summary = summarize(&labels(&[("a", Positive), ("b", Negative), ("b", Positive), ("c", Negative)]));
        let top = top_by(&summary, 2, |r| r.total_mentions as f64);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].aspect, "b");
        assert_eq!(top[1].aspect, "a");
        assert_eq!(overall_counts(&labels(&[("a", Positive), ("b", Negative)])), [1, 0, 1]);
    }

    #[test]
    fn parses_method_names() {
        assert_eq!("bert".parse::<SummaryMethod>().unwrap(), SummaryMethod::Bert);
        assert_eq!(" RULE ".parse::<SummaryMethod>().unwrap(), SummaryMethod::Rule);
        assert!("lexicon".parse::<SummaryMethod>().is_err());
    }
}
