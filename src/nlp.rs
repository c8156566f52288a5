//! Part-of-speech tagging, noun chunking and dependency attachment.
//!
//! `HeuristicParser` is a lexicon- and suffix-driven tagger followed by a
//! small set of attachment rules in the Universal Dependencies style:
//! predicative adjectives head their subjects, copulas hang off the
//! adjective, and prenominal modifiers hang off the chunk's last noun.
//! The tree is kept in a `petgraph` graph with head -> dependent edges.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+(?:'\w+)?|[^\w\s]").unwrap());

/// Coarse Universal Dependencies part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Noun,
    Num,
    Part,
    Pron,
    Punct,
    Sconj,
    Verb,
}

impl PosTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosTag::Adj => "ADJ",
            PosTag::Adp => "ADP",
            PosTag::Adv => "ADV",
            PosTag::Aux => "AUX",
            PosTag::Cconj => "CCONJ",
            PosTag::Det => "DET",
            PosTag::Noun => "NOUN",
            PosTag::Num => "NUM",
            PosTag::Part => "PART",
            PosTag::Pron => "PRON",
            PosTag::Punct => "PUNCT",
            PosTag::Sconj => "SCONJ",
            PosTag::Verb => "VERB",
        }
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepRel {
    Det,
    Poss,
    Amod,
    Nummod,
    Compound,
    Nsubj,
    Obj,
    Cop,
    Advmod,
    Conj,
    Dep,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub lower: String,
    pub pos: PosTag,
}

/// A tagged sentence with its dependency tree and noun chunks.
#[derive(Debug, Clone)]
pub struct ParsedSentence {
    tokens: Vec<Token>,
    tree: DiGraph<usize, DepRel>,
    nodes: Vec<NodeIndex>,
    chunks: Vec<Range<usize>>,
}

impl ParsedSentence {
    fn new(tokens: Vec<Token>, heads: &[Option<(usize, DepRel)>], chunks: Vec<Range<usize>>) -> Self {
        let mut tree = DiGraph::with_capacity(tokens.len(), tokens.len());
        let nodes: Vec<NodeIndex> = (0..tokens.len()).map(|i| tree.add_node(i)).collect();
        for (dependent, head) in heads.iter().enumerate() {
            if let Some((head, rel)) = head {
                tree.add_edge(nodes[*head], nodes[dependent], *rel);
            }
        }
        Self { tokens, tree, nodes, chunks }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Syntactic children of token `i`, left to right.
    pub fn children(&self, i: usize) -> Vec<usize> {
        let mut children: Vec<usize> = self
            .tree
            .neighbors_directed(self.nodes[i], Direction::Outgoing)
            .map(|n| self.tree[n])
            .collect();
        children.sort_unstable();
        children
    }

    /// Syntactic head of token `i`; `None` for the root.
    pub fn head(&self, i: usize) -> Option<usize> {
        self.tree
            .neighbors_directed(self.nodes[i], Direction::Incoming)
            .next()
            .map(|n| self.tree[n])
    }

    pub fn relation(&self, i: usize) -> Option<DepRel> {
        let head = self.head(i)?;
        self.tree
            .find_edge(self.nodes[head], self.nodes[i])
            .map(|e| self.tree[e])
    }

    pub fn root(&self) -> Option<usize> {
        (0..self.tokens.len()).find(|&i| self.head(i).is_none())
    }

    /// `token_TAG` pairs joined by spaces.
    pub fn pos_tag_string(&self) -> String {
        self.tokens
            .iter()
            .map(|t| format!("{}_{}", t.text, t.pos))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn noun_chunks(&self) -> Vec<String> {
        self.chunks
            .iter()
            .map(|r| {
                self.tokens[r.clone()]
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

/// Tokenization, tagging and dependency parsing of one sentence.
pub trait LinguisticParser {
    fn parse(&self, text: &str) -> ParsedSentence;
}

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "each", "every", "some", "any", "no",
    "another", "all", "both", "either", "neither",
];
const POSSESSIVES: &[&str] = &["my", "your", "his", "her", "its", "our", "their"];
const PRONOUNS: &[&str] = &[
    "i", "me", "you", "he", "him", "she", "it", "we", "us", "they", "them", "mine", "yours",
    "hers", "ours", "theirs", "myself", "yourself", "himself", "herself", "itself", "ourselves",
    "themselves", "what", "who", "whom", "which", "something", "anything", "everything",
    "nothing", "one",
];
const AUXILIARIES: &[&str] = &[
    "is", "am", "are", "was", "were", "be", "been", "being", "has", "have", "had", "do", "does",
    "did", "will", "would", "can", "could", "should", "shall", "may", "might", "must", "isnt",
    "arent", "wasnt", "werent", "dont", "doesnt", "didnt", "cant", "wont", "couldnt",
    "shouldnt", "wouldnt", "seems", "seemed", "feels", "felt", "looks", "looked", "appears",
    "becomes", "became", "remains", "stays", "gets", "got",
];
const ADPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from", "up", "down", "out",
    "off", "over", "under", "without", "within", "than", "across", "around", "per",
];
const COORDINATORS: &[&str] = &["and", "or", "but", "nor", "yet", "so", "plus"];
const SUBORDINATORS: &[&str] = &[
    "because", "although", "though", "if", "while", "when", "whereas", "unless", "since",
    "whether", "until",
];
const PARTICLES: &[&str] = &["not", "n't", "never"];
const ADVERBS: &[&str] = &[
    "very", "really", "too", "quite", "extremely", "pretty", "just", "also", "still", "even",
    "always", "only", "much", "rather", "fairly", "somewhat", "almost", "already", "ever",
    "here", "there", "now", "then", "again", "enough", "definitely", "super", "overall",
    "however", "sometimes", "often", "soon", "later",
];
const ADJECTIVES: &[&str] = &[
    "amazing", "attractive", "awesome", "awful", "awkward", "bad", "beautiful", "best", "better",
    "big", "black", "blurry", "blue", "bright", "brilliant", "broken", "buggy", "bulky", "cheap",
    "clean", "clear", "cold", "comfortable", "compact", "complicated", "confusing", "convenient",
    "cool", "costly", "crisp", "cumbersome", "decent", "defective", "difficult", "dim",
    "disappointed", "disappointing", "dull", "durable", "easy", "efficient", "elegant",
    "excellent", "expensive", "fantastic", "fast", "faulty", "fine", "flimsy", "fragile", "free",
    "full", "fuzzy", "glad", "good", "gorgeous", "grainy", "great", "happy", "hard", "harsh",
    "heavy", "high", "horrible", "hot", "huge", "ideal", "impressive", "incredible", "large",
    "lame", "light", "little", "long", "loud", "lovely", "low", "main", "mediocre", "new",
    "nice", "noisy", "old", "ok", "okay", "outstanding", "perfect", "pleasant", "pleased",
    "poor", "quick", "quiet", "real", "reliable", "rich", "right", "sharp", "short", "silver",
    "simple", "sleek", "slim", "slow", "small", "smooth", "solid", "sturdy", "stunning",
    "superb", "terrible", "thick", "thin", "tiny", "tough", "ugly", "unhappy", "unreliable",
    "unusable", "useless", "weak", "white", "wide", "wonderful", "worse", "worst", "wrong",
];
const VERBS: &[&str] = &[
    "love", "loved", "loves", "like", "liked", "likes", "hate", "hated", "hates", "work",
    "works", "worked", "buy", "bought", "use", "used", "uses", "recommend", "take", "takes",
    "took", "make", "makes", "made", "need", "needs", "want", "wanted", "charge", "charges",
    "last", "lasts", "lasted", "die", "dies", "died", "broke", "return", "returned", "think",
    "thought", "feel", "know", "knew", "say", "said", "come", "comes", "came", "go", "goes",
    "went", "keep", "keeps", "kept", "try", "tried", "find", "found", "give", "gives", "gave",
    "drains", "drained", "crashes", "crashed", "freezes", "froze", "holds", "held",
];
const NUMBER_WORDS: &[&str] = &[
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "hundred",
    "thousand",
];
const ADJECTIVE_SUFFIXES: &[&str] = &["able", "ible", "ful", "ous", "ive", "less", "ish", "ic"];

/// Rule-based stand-in for a statistical tagger and parser.
#[derive(Debug, Clone)]
pub struct HeuristicParser {
    adjectives: HashSet<String>,
    verbs: HashSet<String>,
}

impl Default for HeuristicParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicParser {
    pub fn new() -> Self {
        Self {
            adjectives: ADJECTIVES.iter().map(|w| w.to_string()).collect(),
            verbs: VERBS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Adds words that should always be tagged ADJ.
    pub fn with_adjectives<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.adjectives.extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    pub fn tag(&self, lower: &str) -> PosTag {
        if !lower.chars().any(|c| c.is_alphanumeric()) {
            return PosTag::Punct;
        }
        if lower.chars().all(|c| c.is_ascii_digit()) {
            return PosTag::Num;
        }
        if DETERMINERS.contains(&lower) {
            return PosTag::Det;
        }
        if POSSESSIVES.contains(&lower) || PRONOUNS.contains(&lower) {
            return if NUMBER_WORDS.contains(&lower) { PosTag::Num } else { PosTag::Pron };
        }
        if NUMBER_WORDS.contains(&lower) {
            return PosTag::Num;
        }
        if AUXILIARIES.contains(&lower) {
            return PosTag::Aux;
        }
        if ADPOSITIONS.contains(&lower) {
            return PosTag::Adp;
        }
        if COORDINATORS.contains(&lower) {
            return PosTag::Cconj;
        }
        if SUBORDINATORS.contains(&lower) {
            return PosTag::Sconj;
        }
        if PARTICLES.contains(&lower) {
            return PosTag::Part;
        }
        if self.adjectives.contains(lower) {
            return PosTag::Adj;
        }
        if ADVERBS.contains(&lower) {
            return PosTag::Adv;
        }
        if self.verbs.contains(lower) {
            return PosTag::Verb;
        }
        let len = lower.chars().count();
        if len > 4 && lower.ends_with("ly") {
            return PosTag::Adv;
        }
        if len > 4 && ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
            return PosTag::Adj;
        }
        if len > 5 && lower.ends_with("ing") {
            return PosTag::Verb;
        }
        if len > 4 && lower.ends_with("ed") && !lower.ends_with("eed") {
            return PosTag::Verb;
        }
        PosTag::Noun
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        TOKEN_REGEX
            .find_iter(text)
            .map(|m| {
                let lower = m.as_str().to_lowercase();
                Token {
                    text: m.as_str().to_string(),
                    pos: self.tag(&lower),
                    lower,
                }
            })
            .collect()
    }
}

impl LinguisticParser for HeuristicParser {
    fn parse(&self, text: &str) -> ParsedSentence {
        let tokens = self.tokenize(text);
        let chunks = find_chunks(&tokens);
        let heads = attach(&tokens, &chunks);
        ParsedSentence::new(tokens, &heads, chunks)
    }
}

// (DET|poss)? (ADJ|NUM)* NOUN+ ; a lone personal pronoun is its own chunk.
fn find_chunks(tokens: &[Token]) -> Vec<Range<usize>> {
    let mut chunks = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let tok = &tokens[i];
        if tok.pos == PosTag::Pron && !POSSESSIVES.contains(&tok.lower.as_str()) {
            chunks.push(i..i + 1);
            i += 1;
            continue;
        }

        let start = i;
        let mut j = i;
        if matches!(tok.pos, PosTag::Det | PosTag::Pron) {
            j += 1;
        }
        while j < tokens.len() && matches!(tokens[j].pos, PosTag::Adj | PosTag::Num) {
            j += 1;
        }
        let noun_start = j;
        while j < tokens.len() && tokens[j].pos == PosTag::Noun {
            j += 1;
        }

        if j > noun_start {
            chunks.push(start..j);
            i = j;
        } else {
            i += 1;
        }
    }
    chunks
}

fn attach(tokens: &[Token], chunks: &[Range<usize>]) -> Vec<Option<(usize, DepRel)>> {
    let n = tokens.len();
    let mut heads: Vec<Option<(usize, DepRel)>> = vec![None; n];
    let mut in_chunk = vec![false; n];
    let mut chunk_head = vec![false; n];

    for chunk in chunks {
        let head = chunk.end - 1;
        chunk_head[head] = true;
        for k in chunk.clone() {
            in_chunk[k] = true;
            if k == head {
                continue;
            }
            let rel = match tokens[k].pos {
                PosTag::Det => DepRel::Det,
                PosTag::Pron => DepRel::Poss,
                PosTag::Adj => DepRel::Amod,
                PosTag::Num => DepRel::Nummod,
                _ => DepRel::Compound,
            };
            heads[k] = Some((head, rel));
        }
    }

    // Predicative adjectives take the nearest preceding chunk as subject.
    let mut predicative = vec![false; n];
    for a in 0..n {
        if tokens[a].pos != PosTag::Adj || in_chunk[a] {
            continue;
        }
        predicative[a] = true;

        let mut modifiers = Vec::new();
        let mut k = a;
        while k > 0 && matches!(tokens[k - 1].pos, PosTag::Aux | PosTag::Adv | PosTag::Part) {
            k -= 1;
            modifiers.push(k);
        }
        for &m in &modifiers {
            if heads[m].is_none() {
                let rel = if tokens[m].pos == PosTag::Aux { DepRel::Cop } else { DepRel::Advmod };
                heads[m] = Some((a, rel));
            }
        }
        if k == 0 {
            continue;
        }

        let left = k - 1;
        if chunk_head[left] && heads[left].is_none() {
            heads[left] = Some((a, DepRel::Nsubj));
        } else if predicative[left] && heads[a].is_none() {
            heads[a] = Some((left, DepRel::Conj));
        } else if left > 0
            && tokens[left].pos == PosTag::Cconj
            && predicative[left - 1]
            && heads[a].is_none()
        {
            heads[a] = Some((left - 1, DepRel::Conj));
        }
    }

    // Verbs take the adjacent chunks as subject and object.
    for v in 0..n {
        if tokens[v].pos != PosTag::Verb {
            continue;
        }
        let mut k = v;
        while k > 0 && matches!(tokens[k - 1].pos, PosTag::Aux | PosTag::Adv | PosTag::Part) {
            k -= 1;
            if heads[k].is_none() {
                heads[k] = Some((v, DepRel::Advmod));
            }
        }
        if k > 0 && chunk_head[k - 1] && heads[k - 1].is_none() {
            heads[k - 1] = Some((v, DepRel::Nsubj));
        }
        if let Some(chunk) = chunks.iter().find(|c| c.start == v + 1) {
            let object = chunk.end - 1;
            if heads[object].is_none() {
                heads[object] = Some((v, DepRel::Obj));
            }
        }
    }

    let root = (0..n)
        .find(|&i| tokens[i].pos == PosTag::Verb && heads[i].is_none())
        .or_else(|| (0..n).find(|&i| predicative[i] && heads[i].is_none()))
        .or_else(|| (0..n).find(|&i| chunk_head[i] && heads[i].is_none()))
        .or_else(|| (0..n).find(|&i| heads[i].is_none()));

    if let Some(root) = root {
        for (i, head) in heads.iter_mut().enumerate() {
            if i != root && head.is_none() {
                *head = Some((root, DepRel::Dep));
            }
        }
    }
    heads
}
