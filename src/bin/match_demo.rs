//! Demo that runs a few fixture headlines and candidate pools through the
//! matcher and prints the ranked results as JSON.

use std::sync::Arc;

use chrono::Utc;
use paywall_scout::{match_many, Candidate, Headline, MatchEngine};

fn headline(source: &str, title: &str, url: &str) -> Headline {
    Headline {
        source: source.into(),
        title: title.into(),
        url: url.into(),
        excerpt: None,
        published_at: Some(Utc::now().timestamp().max(0) as u64),
    }
}

fn candidate(source: &str, title: &str, url: &str, snippet: &str) -> Candidate {
    Candidate {
        source: source.into(),
        title: title.into(),
        url: url.into(),
        snippet: Some(snippet.into()),
        published_at: Some(Utc::now().timestamp().max(0) as u64),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let engine = Arc::new(MatchEngine::with_defaults());

    let jobs = vec![
        (
            headline(
                "Carbon Pulse",
                "Climate litigation marks 'turning point' in 2025",
                "https://paywalled.example/litigation-2025",
            ),
            vec![
                candidate(
                    "web",
                    "Climate litigation marks a turning point in 2025, report finds",
                    "https://openwire.example/litigation-turning-point",
                    "A global survey of climate court cases.",
                ),
                candidate(
                    "web",
                    "Global trends in climate change litigation: 2025 snapshot",
                    "https://www.lse.ac.uk/granthaminstitute/trends-2025.pdf",
                    "Annual policy report on climate lawsuits worldwide.",
                ),
            ],
        ),
        (
            headline(
                "Quantum Commodity Intelligence",
                "EU ETS prices rebound as EUAs clear auction backlog",
                "https://paywalled.example/eua-rebound",
            ),
            vec![
                candidate(
                    "web",
                    "EU carbon prices rebound after auction backlog clears",
                    "https://openwire.example/eua-auction",
                    "EUAs climbed back above last week's close.",
                ),
                candidate(
                    "web",
                    "Voluntary carbon credit issuances hit quarterly high",
                    "https://openwire.example/vcm-issuances",
                    "Registry data shows record issuance volumes.",
                ),
            ],
        ),
    ];

    let results = match_many(engine, jobs, 4).await?;
    for r in &results {
        println!("{}", serde_json::to_string_pretty(r)?);
    }

    println!("match-demo done");
    Ok(())
}
