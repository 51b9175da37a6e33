// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod collect;
pub mod matcher;
pub mod search;

// ---- Re-exports for stable public API ----
pub use crate::collect::types::{Candidate, Headline, HeadlineSource};
pub use crate::collect::SourceRegistry;
pub use crate::matcher::{
    match_many, Breakdown, MatchConfig, MatchEngine, MatchResult, MatchWeights, RankedCandidate,
};
pub use crate::search::{CandidateSearch, RecallKnobs, StaticSearch};
