// src/collect/mod.rs
pub mod providers;
pub mod types;

use crate::collect::types::{Headline, HeadlineSource};
use anyhow::{anyhow, Result};
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use std::collections::{HashMap, HashSet};

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "collect_headlines_total",
            "Headlines parsed from source adapters."
        );
        describe_counter!(
            "collect_kept_total",
            "Headlines kept after normalization + dedup."
        );
        describe_counter!(
            "collect_dropped_total",
            "Headlines dropped as empty after normalization."
        );
        describe_counter!("collect_dedup_total", "Headlines removed as duplicate URLs.");
        describe_counter!("collect_source_errors_total", "Source adapter fetch/parse errors.");
        describe_histogram!("collect_parse_ms", "Source adapter parse time in milliseconds.");
    });
}

/// Normalize text: decode entities, strip tags, collapse whitespace,
/// trim stray trailing punctuation, cap length.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize typographic quotes to ASCII
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // 5) Strip trailing sentence punctuation (keep quotes)
    while let Some(last) = out.chars().last() {
        if matches!(last, '!' | '?' | '.' | ',') {
            out.pop();
        } else {
            break;
        }
    }

    // 6) Length cap: 600 chars is plenty for a headline + excerpt
    if out.chars().count() > 600 {
        out = out.chars().take(600).collect();
    }

    out
}

/// Normalize titles/excerpts and drop duplicates by URL within this run.
/// Returns (kept, dropped_empty, deduped).
pub fn normalize_and_dedup(raw: Vec<Headline>) -> (Vec<Headline>, usize, usize) {
    let mut dropped = 0usize;
    let mut deduped = 0usize;
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(raw.len());

    for mut h in raw {
        h.title = normalize_text(&h.title);
        h.excerpt = h
            .excerpt
            .as_deref()
            .map(normalize_text)
            .filter(|e| !e.is_empty());
        if h.title.is_empty() || h.url.trim().is_empty() {
            dropped += 1;
            continue;
        }
        if !seen_urls.insert(h.url.clone()) {
            deduped += 1;
            continue;
        }
        kept.push(h);
    }

    (kept, dropped, deduped)
}

/// Registry of source adapters keyed by source key, populated at startup.
#[derive(Default)]
pub struct SourceRegistry {
    sources: HashMap<&'static str, Box<dyn HeadlineSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source: Box<dyn HeadlineSource>) {
        self.sources.insert(source.key(), source);
    }

    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<_> = self.sources.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Collect from one source by key. Unknown keys are an explicit error,
    /// not a silent no-op.
    pub async fn collect_from(&self, key: &str, max_items: usize) -> Result<Vec<Headline>> {
        ensure_metrics_described();
        let source = self
            .sources
            .get(key)
            .ok_or_else(|| anyhow!("unknown source key: {key}"))?;
        // Adapters report collect_headlines_total themselves at parse time.
        let raw = source.collect(max_items).await?;
        let (kept, dropped, deduped) = normalize_and_dedup(raw);
        counter!("collect_kept_total").increment(kept.len() as u64);
        counter!("collect_dropped_total").increment(dropped as u64);
        counter!("collect_dedup_total").increment(deduped as u64);
        Ok(kept)
    }

    /// Collect from every registered source. Adapter failures are logged and
    /// skipped; one broken site never blocks the others.
    pub async fn collect_all(&self, max_per_source: usize) -> Vec<Headline> {
        ensure_metrics_described();
        let mut out = Vec::new();
        for key in self.keys() {
            match self.collect_from(key, max_per_source).await {
                Ok(mut v) => out.append(&mut v),
                Err(e) => {
                    tracing::warn!(error = ?e, source = key, "source adapter error");
                    counter!("collect_source_errors_total").increment(1);
                }
            }
        }
        out
    }
}
