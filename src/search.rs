// src/search.rs
//! Candidate search seam. The matcher treats search as an opaque producer of
//! per-headline candidate pools; query generation and web-API mechanics live
//! behind this trait.

use crate::collect::types::{Candidate, Headline};
use anyhow::Result;
use std::collections::HashMap;

/// Recall knobs interpreted by search implementations, never by the matcher.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct RecallKnobs {
    pub queries_per_headline: usize,
    pub results_per_query: usize,
    pub search_per_headline: usize,
}

impl Default for RecallKnobs {
    fn default() -> Self {
        Self {
            queries_per_headline: 3,
            results_per_query: 8,
            search_per_headline: 20,
        }
    }
}

#[async_trait::async_trait]
pub trait CandidateSearch: Send + Sync {
    /// Produce a finite candidate pool for one headline. Pools are
    /// per-headline and never merged across headlines.
    async fn find_candidates(
        &self,
        headline: &Headline,
        knobs: &RecallKnobs,
    ) -> Result<Vec<Candidate>>;
}

/// In-memory pools keyed by headline URL, for tests and the demo binary.
#[derive(Default)]
pub struct StaticSearch {
    pools: HashMap<String, Vec<Candidate>>,
}

impl StaticSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, headline_url: &str, pool: Vec<Candidate>) {
        self.pools.insert(headline_url.to_string(), pool);
    }
}

#[async_trait::async_trait]
impl CandidateSearch for StaticSearch {
    async fn find_candidates(
        &self,
        headline: &Headline,
        knobs: &RecallKnobs,
    ) -> Result<Vec<Candidate>> {
        let mut pool = self.pools.get(&headline.url).cloned().unwrap_or_default();
        pool.truncate(knobs.search_per_headline);
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headline(url: &str) -> Headline {
        Headline {
            source: "test".into(),
            title: "EU ETS prices climb".into(),
            url: url.into(),
            excerpt: None,
            published_at: None,
        }
    }

    fn candidate(url: &str) -> Candidate {
        Candidate {
            source: "web".into(),
            title: "EU carbon prices climb".into(),
            url: url.into(),
            snippet: None,
            published_at: None,
        }
    }

    #[tokio::test]
    async fn unknown_headline_yields_empty_pool() {
        let search = StaticSearch::new();
        let pool = search
            .find_candidates(&headline("https://x.example/1"), &RecallKnobs::default())
            .await
            .expect("static search");
        assert!(pool.is_empty());
    }

    #[tokio::test]
    async fn pool_is_capped_by_recall_knob() {
        let mut search = StaticSearch::new();
        search.insert(
            "https://x.example/1",
            (0..30).map(|i| candidate(&format!("https://c.example/{i}"))).collect(),
        );
        let knobs = RecallKnobs {
            search_per_headline: 5,
            ..RecallKnobs::default()
        };
        let pool = search
            .find_candidates(&headline("https://x.example/1"), &knobs)
            .await
            .expect("static search");
        assert_eq!(pool.len(), 5);
    }
}
