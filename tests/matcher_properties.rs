// tests/matcher_properties.rs
// Property-style checks: determinism, ordering, caps, and the inclusive
// min_score boundary.

use paywall_scout::{match_many, Candidate, Headline, MatchConfig, MatchEngine, MatchWeights};
use std::sync::Arc;

fn engine_with(config: MatchConfig) -> MatchEngine {
    MatchEngine::new(
        config,
        paywall_scout::matcher::signals::SignalTables::default_seed(),
        paywall_scout::matcher::quality::QualityRules::default_seed(),
    )
    .expect("test config is valid")
}

fn headline(title: &str) -> Headline {
    Headline {
        source: "Carbon Pulse".into(),
        title: title.into(),
        url: "https://paywalled.example/item".into(),
        excerpt: None,
        published_at: None,
    }
}

fn candidate(title: &str, url: &str) -> Candidate {
    Candidate {
        source: "web".into(),
        title: title.into(),
        url: url.into(),
        snippet: None,
        published_at: None,
    }
}

fn sample_pool() -> Vec<Candidate> {
    vec![
        candidate(
            "EU carbon prices rebound after auction backlog clears",
            "https://openwire.example/a",
        ),
        candidate("EU carbon prices rebound", "https://openwire.example/b"),
        candidate("EU auction calendar published", "https://openwire.example/c"),
        candidate("Hydrogen subsidies under review", "https://openwire.example/d"),
        candidate(
            "EU ETS prices rebound as backlog clears",
            "https://openwire.example/e",
        ),
        candidate("Carbon border levy explained", "https://openwire.example/f"),
    ]
}

#[test]
fn every_returned_candidate_meets_min_score() {
    let e = engine_with(MatchConfig::default());
    let r = e.match_headline(
        &headline("EU ETS prices rebound as EUAs clear auction backlog"),
        &sample_pool(),
    );
    for c in &r.related {
        assert!(c.score >= e.config().min_score, "{} < min_score", c.score);
    }
}

#[test]
fn result_length_never_exceeds_top_k() {
    let e = engine_with(MatchConfig {
        min_score: 0.0,
        top_k: 2,
        ..MatchConfig::default()
    });
    let r = e.match_headline(
        &headline("EU ETS prices rebound as EUAs clear auction backlog"),
        &sample_pool(),
    );
    assert!(r.related.len() <= 2);
}

#[test]
fn min_score_boundary_is_inclusive() {
    let open = engine_with(MatchConfig {
        min_score: 0.0,
        ..MatchConfig::default()
    });
    let h = headline("EU ETS prices rebound as EUAs clear auction backlog");
    let pool = sample_pool();
    let r = open.match_headline(&h, &pool);
    let boundary = r.related.first().expect("at least one match").score;

    // Re-run with the threshold set to an observed score: that candidate
    // must still be returned (score >= min_score, not strict inequality).
    let exact = engine_with(MatchConfig {
        min_score: boundary,
        ..MatchConfig::default()
    });
    let r2 = exact.match_headline(&h, &pool);
    assert!(
        r2.related.iter().any(|c| c.score == boundary),
        "candidate at the exact threshold must survive the filter"
    );
}

#[test]
fn repeated_runs_are_byte_identical() {
    let e = engine_with(MatchConfig {
        min_score: 0.0,
        ..MatchConfig::default()
    });
    let h = headline("EU ETS prices rebound as EUAs clear auction backlog");
    let pool = sample_pool();

    let a = serde_json::to_string(&e.match_headline(&h, &pool)).expect("serialize");
    let b = serde_json::to_string(&e.match_headline(&h, &pool)).expect("serialize");
    assert_eq!(a, b);
}

#[test]
fn overlap_is_monotonic_as_headline_tokens_accumulate() {
    let e = engine_with(MatchConfig {
        min_score: 0.0,
        top_k: 10,
        ..MatchConfig::default()
    });
    let h = headline("Brazil forest carbon auction draws record bids");
    let pool = vec![
        candidate("Brazil news roundup", "https://openwire.example/1"),
        candidate("Brazil forest news", "https://openwire.example/2"),
        candidate("Brazil forest carbon news", "https://openwire.example/3"),
        candidate(
            "Brazil forest carbon auction draws record bids",
            "https://openwire.example/4",
        ),
    ];
    let r = e.match_headline(&h, &pool);
    let overlap_of = |url: &str| {
        r.related
            .iter()
            .find(|c| c.candidate.url == url)
            .map(|c| c.breakdown.overlap)
            .expect("candidate present")
    };
    let o1 = overlap_of("https://openwire.example/1");
    let o2 = overlap_of("https://openwire.example/2");
    let o3 = overlap_of("https://openwire.example/3");
    let o4 = overlap_of("https://openwire.example/4");
    assert!(o1 <= o2 && o2 <= o3 && o3 <= o4);
    assert!((o4 - 1.0).abs() < 1e-6);
}

#[test]
fn shared_token_count_is_reported() {
    let e = engine_with(MatchConfig {
        min_score: 0.0,
        ..MatchConfig::default()
    });
    let r = e.match_headline(
        &headline("Brazil forest carbon auction"),
        &[candidate(
            "Brazil forest carbon auction",
            "https://openwire.example/x",
        )],
    );
    let c = &r.related[0];
    assert_eq!(c.breakdown.shared_tokens, 4);
    assert!(c.reason.ends_with("sharedTokens=4"), "{}", c.reason);
}

#[test]
fn rejected_config_never_builds_an_engine() {
    for bad in [
        MatchConfig {
            top_k: 0,
            ..MatchConfig::default()
        },
        MatchConfig {
            min_score: -0.1,
            ..MatchConfig::default()
        },
        MatchConfig {
            min_score: 2.0,
            ..MatchConfig::default()
        },
        MatchConfig {
            weights: MatchWeights {
                overlap: f32::NAN,
                ..MatchWeights::default()
            },
            ..MatchConfig::default()
        },
    ] {
        assert!(
            MatchEngine::new(
                bad,
                paywall_scout::matcher::signals::SignalTables::default_seed(),
                paywall_scout::matcher::quality::QualityRules::default_seed(),
            )
            .is_err(),
            "misconfiguration must be rejected before any headline is processed"
        );
    }
}

#[tokio::test]
async fn match_many_preserves_input_order() {
    let engine = Arc::new(MatchEngine::with_defaults());
    let jobs: Vec<(Headline, Vec<Candidate>)> = (0..8)
        .map(|i| {
            let mut h = headline("EU ETS prices rebound");
            h.url = format!("https://paywalled.example/{i}");
            (h, sample_pool())
        })
        .collect();

    let results = match_many(engine, jobs, 3).await.expect("match_many");
    assert_eq!(results.len(), 8);
    for (i, r) in results.iter().enumerate() {
        assert_eq!(r.headline.url, format!("https://paywalled.example/{i}"));
    }
}
