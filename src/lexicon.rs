//! Positive/negative opinion-word lexicon.
//!
//! The built-in word lists are a compact subset of the Hu & Liu opinion
//! lexicon. The full lists can be loaded from a directory holding
//! `positive-words.txt` and `negative-words.txt` in the same format.

use anyhow::{Context, Result};
use log::info;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::models::Sentiment;

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "attractive", "awesome", "beautiful", "best", "better", "bright", "brilliant",
    "cheap", "clean", "clear", "comfortable", "compact", "convenient", "cool", "crisp", "decent",
    "dependable", "durable", "easy", "effective", "efficient", "elegant", "enjoyable", "excellent",
    "exceptional", "fabulous", "fantastic", "fast", "favorite", "fine", "flawless", "flexible",
    "fun", "good", "gorgeous", "great", "handy", "happy", "helpful", "ideal",
    "impressive", "incredible", "intuitive", "love", "loved", "lovely", "loud", "lucid", "nice",
    "outstanding", "perfect", "pleasant", "pleased", "portable", "positive", "powerful", "pretty",
    "quick", "quiet", "reasonable", "recommend", "reliable", "responsive", "rich", "robust",
    "satisfied", "sharp", "simple", "sleek", "slim", "smooth", "snappy", "solid", "sturdy",
    "stunning", "stylish", "superb", "superior", "terrific", "tough", "useful", "versatile",
    "vivid", "wonderful", "worth", "worthy",
];

const NEGATIVE_WORDS: &[&str] = &[
    "annoying", "awful", "awkward", "bad", "blurry", "bogus", "broken", "buggy", "bulky",
    "cheesy", "clumsy", "complicated", "confusing", "costly", "crap", "cumbersome", "defective",
    "difficult", "dim", "disappointed", "disappointing", "dull", "expensive", "faulty", "flaky",
    "flimsy", "fragile", "frustrating", "fuzzy", "garbage", "glitchy", "grainy", "hard", "harsh",
    "hate", "heavy", "horrible", "inaccurate", "inadequate", "inconsistent", "inferior",
    "junk", "lame", "laggy", "limited", "mediocre", "messy", "noisy", "overpriced", "pathetic",
    "poor", "problem", "problematic", "sluggish", "slow", "tedious", "terrible", "tiny",
    "troublesome", "ugly", "unacceptable", "unreliable", "unstable", "unusable", "useless",
    "weak", "worse", "worst", "worthless", "wrong",
];

#[derive(Debug, Clone, Default)]
pub struct OpinionLexicon {
    positive: HashSet<String>,
    negative: HashSet<String>,
}

impl OpinionLexicon {
    pub fn new<P, N>(positive: P, negative: N) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        Self {
            positive: positive.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
            negative: negative.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(POSITIVE_WORDS.iter(), NEGATIVE_WORDS.iter())
    }

    /// Loads `positive-words.txt` and `negative-words.txt` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let positive = read_word_list(&dir.join("positive-words.txt"))?;
        let negative = read_word_list(&dir.join("negative-words.txt"))?;
        info!(
            "Loaded opinion lexicon from {:?}: {} positive, {} negative words",
            dir,
            positive.len(),
            negative.len()
        );
        Ok(Self::new(positive, negative))
    }

    /// Directory lexicon when configured, built-in lists otherwise.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => {
                info!("Using built-in opinion lexicon");
                Ok(Self::builtin())
            }
        }
    }

    /// Positive membership is checked first; words in neither set are neutral.
    pub fn classify(&self, word: &str) -> Sentiment {
        let word = word.to_lowercase();
        if self.positive.contains(&word) {
            Sentiment::Positive
        } else if self.negative.contains(&word) {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn sizes(&self) -> (usize, usize) {
        (self.positive.len(), self.negative.len())
    }
}

// Hu & Liu files: ';' comment header, one word per line. The files ship as Latin-1.
fn read_word_list(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read lexicon file {:?}", path))?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    };
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(';'))
        .map(str::to_string)
        .collect())
}
