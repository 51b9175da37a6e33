// src/collect/types.rs
use anyhow::Result;

/// A short reference item from a (possibly paywalled) outlet.
/// Immutable once collected; the matcher reads it, never edits it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Headline {
    pub source: String, // e.g., "Carbon Pulse", "Quantum Commodity Intelligence"
    pub title: String,
    pub url: String,
    pub excerpt: Option<String>,
    pub published_at: Option<u64>, // unix seconds; most collected items carry none
}

impl Headline {
    /// Title plus excerpt, the text the signal extractor and vocabulary see.
    pub fn text(&self) -> String {
        match self.excerpt.as_deref() {
            Some(e) if !e.trim().is_empty() => format!("{} {}", self.title, e),
            _ => self.title.clone(),
        }
    }
}

/// A freely accessible document proposed by the search stage for one headline.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub source: String,
    pub title: String,
    pub url: String,
    pub snippet: Option<String>,
    pub published_at: Option<u64>, // unix seconds
}

impl Candidate {
    pub fn text(&self) -> String {
        match self.snippet.as_deref() {
            Some(s) if !s.trim().is_empty() => format!("{} {}", self.title, s),
            _ => self.title.clone(),
        }
    }
}

/// One content source adapter. Site-specific scraping/parsing lives behind
/// this seam; the registry in `collect::SourceRegistry` dispatches on key.
#[async_trait::async_trait]
pub trait HeadlineSource: Send + Sync {
    async fn collect(&self, max_items: usize) -> Result<Vec<Headline>>;
    fn key(&self) -> &'static str;
}
