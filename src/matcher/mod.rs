// src/matcher/mod.rs
//! # Relevance matcher
//!
//! Given one headline and its candidate pool, score every candidate on seven
//! normalized component signals, gate, filter, and return a bounded,
//! deterministic, explainable ranking. Pure and synchronous per headline:
//! (headline, pool, config) → MatchResult, no hidden state, no I/O.

pub mod lexical;
pub mod quality;
pub mod recency;
pub mod signals;
pub mod vocab;

use crate::collect::types::{Candidate, Headline};
use anyhow::{bail, Result};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use quality::QualityRules;
use serde::{Deserialize, Serialize};
use signals::{category_score, SignalTables};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "match_candidates_total",
            "Candidates scored across all pools."
        );
        describe_counter!(
            "match_dropped_malformed_total",
            "Candidates dropped before scoring for missing title/url."
        );
        describe_counter!(
            "match_returned_total",
            "Candidates returned after gating, filtering and truncation."
        );
    });
}

/// Weights of the linear combination. The defaults are a tuning choice, not
/// a structural contract; callers can override per run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchWeights {
    pub overlap: f32,
    pub title_sim: f32,
    pub recency: f32,
    pub market: f32,
    pub topic: f32,
    pub geo: f32,
    pub quality: f32,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            overlap: 0.40,
            title_sim: 0.15,
            recency: 0.05,
            market: 0.12,
            topic: 0.12,
            geo: 0.06,
            quality: 0.10,
        }
    }
}

impl MatchWeights {
    /// Highest aggregate score any candidate can reach.
    pub fn max_score(&self) -> f32 {
        self.overlap
            + self.title_sim
            + self.recency
            + self.market
            + self.topic
            + self.geo
            + self.quality
    }

    fn all(&self) -> [f32; 7] {
        [
            self.overlap,
            self.title_sim,
            self.recency,
            self.market,
            self.topic,
            self.geo,
            self.quality,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Candidates below this aggregate score are dropped (inclusive bound:
    /// `score >= min_score` survives).
    pub min_score: f32,
    /// Hard cap on returned candidates per headline.
    pub top_k: usize,
    /// When true and the headline has market signals, candidates must share
    /// at least one market code.
    pub strict_market: bool,
    /// Day window for the linear recency decay.
    pub recency_window_days: u32,
    #[serde(default)]
    pub weights: MatchWeights,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_score: 0.32,
            top_k: 5,
            strict_market: false,
            recency_window_days: 14,
            weights: MatchWeights::default(),
        }
    }
}

impl MatchConfig {
    /// Reject misconfiguration before any headline is processed. No silent
    /// clamping.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            bail!("top_k must be >= 1");
        }
        for w in self.weights.all() {
            if !w.is_finite() || w < 0.0 {
                bail!("weights must be finite and non-negative, got {w}");
            }
        }
        let max = self.weights.max_score();
        if max <= 0.0 {
            bail!("at least one weight must be positive");
        }
        if !self.min_score.is_finite() || self.min_score < 0.0 || self.min_score > max {
            bail!(
                "min_score must lie in [0, {max:.2}], got {}",
                self.min_score
            );
        }
        Ok(())
    }
}

/// Per-candidate component values, each in [0,1]. `shared_tokens` is a
/// diagnostic count, not a score input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub overlap: f32,
    pub title_sim: f32,
    pub recency: f32,
    pub market: f32,
    pub topic: f32,
    pub geo: f32,
    pub quality: f32,
    pub shared_tokens: usize,
}

impl Breakdown {
    pub fn score(&self, w: &MatchWeights) -> f32 {
        let s = self.overlap * w.overlap
            + self.title_sim * w.title_sim
            + self.recency * w.recency
            + self.market * w.market
            + self.topic * w.topic
            + self.geo * w.geo
            + self.quality * w.quality;
        if s.is_finite() {
            s
        } else {
            0.0
        }
    }

    /// Audit string enumerating every component and the shared-token count.
    pub fn reason(&self) -> String {
        format!(
            "overlap={:.2} titleSim={:.2} recency={:.2} market={:.2} topic={:.2} geo={:.2} quality={:.2} sharedTokens={}",
            self.overlap,
            self.title_sim,
            self.recency,
            self.market,
            self.topic,
            self.geo,
            self.quality,
            self.shared_tokens
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub score: f32,
    pub breakdown: Breakdown,
    pub reason: String,
}

/// Ranked, filtered, capped result for one headline. Never mutated after
/// construction; the caller owns it exclusively.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub headline: Headline,
    #[serde(rename = "relatedCandidates")]
    pub related: Vec<RankedCandidate>,
    #[serde(rename = "droppedMalformed")]
    pub dropped_malformed: usize,
}

/// The engine: configuration plus the declarative signal and quality tables.
pub struct MatchEngine {
    config: MatchConfig,
    tables: SignalTables,
    quality: QualityRules,
}

impl MatchEngine {
    pub fn new(config: MatchConfig, tables: SignalTables, quality: QualityRules) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tables,
            quality,
        })
    }

    /// Default config with the built-in seed tables.
    pub fn with_defaults() -> Self {
        Self::new(
            MatchConfig::default(),
            SignalTables::default_seed(),
            QualityRules::default_seed(),
        )
        .expect("default config is valid")
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Score and rank one headline's candidate pool.
    ///
    /// Order of operations: drop malformed → score all → strict-market gate
    /// → min-score filter (inclusive) → sort (score desc, url asc) →
    /// truncate to top_k.
    pub fn match_headline(&self, headline: &Headline, pool: &[Candidate]) -> MatchResult {
        ensure_metrics_described();

        let (pool, dropped_malformed) = drop_malformed(pool);
        counter!("match_candidates_total").increment(pool.len() as u64);
        counter!("match_dropped_malformed_total").increment(dropped_malformed as u64);

        let head_text = headline.text();
        let head_signals = self.tables.extract(&head_text, None);
        let head_title_tokens = vocab::tokenize(&headline.title);

        // Pool-local vocabulary: headline + each candidate counted once.
        let cand_texts: Vec<String> = pool.iter().map(|c| c.text()).collect();
        let docs = std::iter::once(head_text.as_str()).chain(cand_texts.iter().map(String::as_str));
        let vocab = vocab::PoolVocab::build(docs);

        let mut scored: Vec<RankedCandidate> = Vec::with_capacity(pool.len());
        for (cand, cand_text) in pool.iter().zip(cand_texts.iter()) {
            let cand_signals = self.tables.extract(cand_text, Some(&cand.url));

            if self.config.strict_market
                && !head_signals.market.is_empty()
                && category_score(&head_signals.market, &cand_signals.market) == 0.0
            {
                continue;
            }

            let cand_tokens = vocab::tokenize(cand_text);
            let cand_title_tokens = vocab::tokenize(&cand.title);
            let (overlap, shared_tokens) =
                lexical::overlap_score(&head_title_tokens, &cand_tokens, &vocab);

            let breakdown = Breakdown {
                overlap,
                title_sim: lexical::title_similarity(&head_title_tokens, &cand_title_tokens),
                recency: recency::recency_score(
                    headline.published_at,
                    cand.published_at,
                    self.config.recency_window_days,
                ),
                market: category_score(&head_signals.market, &cand_signals.market),
                topic: category_score(&head_signals.topic, &cand_signals.topic),
                geo: category_score(&head_signals.geo, &cand_signals.geo),
                quality: self.quality.score(&cand.url),
                shared_tokens,
            };

            let score = breakdown.score(&self.config.weights);
            if score < self.config.min_score {
                continue;
            }

            let reason = breakdown.reason();
            scored.push(RankedCandidate {
                candidate: (*cand).clone(),
                score,
                breakdown,
                reason,
            });
        }

        // Total order: score descending, URL ascending. Repeated runs on
        // identical input produce byte-identical ordering.
        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.candidate.url.cmp(&b.candidate.url))
        });
        scored.truncate(self.config.top_k);

        counter!("match_returned_total").increment(scored.len() as u64);
        debug!(
            headline = %headline.title,
            pool = pool.len(),
            returned = scored.len(),
            dropped_malformed,
            "matched headline"
        );

        MatchResult {
            headline: headline.clone(),
            related: scored,
            dropped_malformed,
        }
    }
}

/// Candidates with an empty title or url cannot be scored or cited; drop
/// them up front and surface the count.
fn drop_malformed(pool: &[Candidate]) -> (Vec<&Candidate>, usize) {
    let mut kept = Vec::with_capacity(pool.len());
    let mut dropped = 0usize;
    for c in pool {
        if c.title.trim().is_empty() || c.url.trim().is_empty() {
            dropped += 1;
        } else {
            kept.push(c);
        }
    }
    (kept, dropped)
}

/// Match many headlines' pools concurrently under a bounded worker pool.
/// Headlines are independent; results come back in input order.
pub async fn match_many(
    engine: Arc<MatchEngine>,
    jobs: Vec<(Headline, Vec<Candidate>)>,
    max_in_flight: usize,
) -> Result<Vec<MatchResult>> {
    let sem = Arc::new(Semaphore::new(max_in_flight.max(1)));
    let mut handles = Vec::with_capacity(jobs.len());
    for (headline, pool) in jobs {
        let engine = engine.clone();
        let sem = sem.clone();
        handles.push(tokio::spawn(async move {
            let _permit = sem.acquire_owned().await.expect("semaphore never closed");
            engine.match_headline(&headline, &pool)
        }));
    }

    let mut out = Vec::with_capacity(handles.len());
    for h in handles {
        out.push(h.await?);
    }
    Ok(out)
}
