// src/matcher/recency.rs
//! Recency decay. Linear falloff over a configured day window; same-day
//! publication scores highest. Most collected items carry no reliable date,
//! so a missing timestamp on either side is neutral (0.0), never an error.

const SECS_PER_DAY: f32 = 86_400.0;

pub fn recency_score(
    headline_ts: Option<u64>,
    candidate_ts: Option<u64>,
    window_days: u32,
) -> f32 {
    let (Some(a), Some(b)) = (headline_ts, candidate_ts) else {
        return 0.0;
    };
    let days_apart = a.abs_diff(b) as f32 / SECS_PER_DAY;
    let window = window_days.max(1) as f32;
    (1.0 - days_apart / window).clamp(0.0, 1.0)
}
