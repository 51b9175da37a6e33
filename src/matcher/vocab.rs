// src/matcher/vocab.rs
//! Pool-local vocabulary and IDF weighting.
//!
//! Built once per headline over that headline's candidate pool and discarded
//! afterwards. A term common within one pool must not be penalized based on
//! unrelated headlines, so nothing here outlives a single match call.

use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Tokens shorter than this carry no signal for matching.
pub const MIN_TOKEN_LEN: usize = 3;

fn is_stopword(word: &str) -> bool {
    matches!(
        word,
        "the" | "and"
            | "for"
            | "are"
            | "but"
            | "not"
            | "you"
            | "all"
            | "can"
            | "was"
            | "has"
            | "have"
            | "been"
            | "from"
            | "this"
            | "that"
            | "with"
            | "they"
            | "will"
            | "its"
            | "into"
            | "more"
            | "after"
            | "over"
            | "amid"
            | "says"
            | "said"
            | "new"
            | "out"
            | "how"
            | "why"
            | "what"
            | "could"
            | "would"
            | "about"
    )
}

/// Lowercase, split on non-alphanumeric boundaries, drop short tokens and
/// stopwords. Order-preserving; duplicates kept (callers dedup as needed).
pub fn tokenize(text: &str) -> Vec<String> {
    static RE_TOKEN: OnceCell<Regex> = OnceCell::new();
    let re = RE_TOKEN.get_or_init(|| Regex::new(r"(?u)\b\w+\b").expect("tokenizer regex"));
    re.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN && !is_stopword(t))
        .collect()
}

/// IDF model over one headline's pool: the headline text plus each
/// candidate's text, each counted once as a document.
#[derive(Debug)]
pub struct PoolVocab {
    idf: HashMap<String, f32>,
    doc_count: usize,
}

impl PoolVocab {
    pub fn build<'a, I>(docs: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut df: HashMap<String, usize> = HashMap::new();
        let mut doc_count = 0usize;
        for doc in docs {
            doc_count += 1;
            let unique: HashSet<String> = tokenize(doc).into_iter().collect();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        // Smoothed: idf = ln((N+1)/(df+1)) + 1, positive even when a term
        // appears in every document.
        let n = doc_count as f32;
        let idf = df
            .into_iter()
            .map(|(term, f)| (term, ((n + 1.0) / (f as f32 + 1.0)).ln() + 1.0))
            .collect();

        Self { idf, doc_count }
    }

    /// Weight for a term; unseen terms get the df=0 smoothing value.
    pub fn idf(&self, term: &str) -> f32 {
        match self.idf.get(term) {
            Some(&w) => w,
            None => ((self.doc_count as f32 + 1.0) / 1.0).ln() + 1.0,
        }
    }

    pub fn doc_count(&self) -> usize {
        self.doc_count
    }
}
