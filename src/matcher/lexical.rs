// src/matcher/lexical.rs
//! Lexical similarity: idf-weighted token overlap plus an order-sensitive
//! title similarity. Two metrics on purpose: overlap saturates for "same
//! topic, different wording", title similarity only for near-duplicates.

use super::vocab::PoolVocab;
use std::collections::HashSet;

/// Idf-weighted share of headline-title tokens present in the candidate
/// text, normalized by the headline's own token mass. Returns the score in
/// [0,1] plus the distinct shared-token count (diagnostic only).
pub fn overlap_score(
    headline_tokens: &[String],
    candidate_tokens: &[String],
    vocab: &PoolVocab,
) -> (f32, usize) {
    if headline_tokens.is_empty() {
        // Degenerate headline: nothing to match against, never divide by zero.
        return (0.0, 0);
    }
    let cand: HashSet<&str> = candidate_tokens.iter().map(String::as_str).collect();

    let mut num = 0.0f32;
    let mut denom = 0.0f32;
    let mut shared = 0usize;
    // Iterate distinct terms in first-occurrence order so float accumulation
    // is deterministic across runs (the spec requires byte-identical output).
    let mut seen: HashSet<&str> = HashSet::with_capacity(headline_tokens.len());
    for term in headline_tokens.iter().map(String::as_str) {
        if !seen.insert(term) {
            continue;
        }
        let w = vocab.idf(term);
        denom += w;
        if cand.contains(term) {
            num += w;
            shared += 1;
        }
    }

    if denom <= f32::EPSILON {
        return (0.0, 0);
    }
    ((num / denom).clamp(0.0, 1.0), shared)
}

/// Token-order-sensitive similarity over title tokens only, in [0,1].
/// Edit distance at the token level; not idf-weighted by design.
pub fn title_similarity(headline_tokens: &[String], candidate_tokens: &[String]) -> f32 {
    let max_len = headline_tokens.len().max(candidate_tokens.len());
    if max_len == 0 {
        return 0.0;
    }
    let a: Vec<&str> = headline_tokens.iter().map(String::as_str).collect();
    let b: Vec<&str> = candidate_tokens.iter().map(String::as_str).collect();
    let dist = strsim::generic_levenshtein(&a, &b);
    (1.0 - dist as f32 / max_len as f32).clamp(0.0, 1.0)
}
