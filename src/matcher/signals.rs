// src/matcher/signals.rs
//! # Signal tables
//!
//! Categorical signals detected in headline/candidate text against three
//! closed vocabularies:
//!
//! - *market*: compliance/voluntary carbon-market identifiers (EU ETS, UK
//!   ETS, RGGI, VCM, CORSIA, Article 6, ...)
//! - *topic*: subject clusters (forest carbon, hydrogen, litigation, CBAM,
//!   removals, ...)
//! - *geo*: country/region codes, from keywords and from government TLDs on
//!   candidate URLs.
//!
//! Tables are data, not branching logic: loadable from TOML, with a built-in
//! `default_seed()` fallback. An empty signal set is a valid "no detected
//! signal", never an error.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::{fs, path::Path};

/// One keyword → canonical code mapping. Phrases are matched on word
/// boundaries after normalization, so "eu ets" hits "EU-ETS" and "EU ETS"
/// but not "deut etsch".
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordRule {
    pub phrase: String,
    pub code: String,
}

/// Domain-suffix → geo code hint, e.g. ".gov.uk" → "uk". Ordered; first
/// match wins, so longer suffixes belong before shorter ones.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainRule {
    pub suffix: String,
    pub code: String,
}

/// Canonical category codes detected for one Headline or Candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SignalSet {
    pub market: BTreeSet<String>,
    pub topic: BTreeSet<String>,
    pub geo: BTreeSet<String>,
}

impl SignalSet {
    pub fn is_empty(&self) -> bool {
        self.market.is_empty() && self.topic.is_empty() && self.geo.is_empty()
    }
}

/// Per-category score: 1.0 when the headline has a signal in the category
/// and the candidate intersects it, 0.0 otherwise. A headline without a
/// signal is neutral for all candidates, not penalizing.
pub fn category_score(headline: &BTreeSet<String>, candidate: &BTreeSet<String>) -> f32 {
    if headline.is_empty() {
        return 0.0;
    }
    if headline.intersection(candidate).next().is_some() {
        1.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignalTables {
    #[serde(default)]
    pub market: Vec<KeywordRule>,
    #[serde(default)]
    pub topic: Vec<KeywordRule>,
    #[serde(default)]
    pub geo: Vec<KeywordRule>,
    #[serde(default)]
    pub geo_domains: Vec<DomainRule>,
}

impl SignalTables {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file, falling back to `default_seed()` on error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => Self::from_toml_str(&s).unwrap_or_else(|_| Self::default_seed()),
            Err(_) => Self::default_seed(),
        }
    }

    /// Extract all three signal categories from text, plus geo hints from
    /// the URL's domain when one is given (candidate URLs; headline URLs are
    /// paywalled outlets and carry no geo meaning).
    pub fn extract(&self, text: &str, url: Option<&str>) -> SignalSet {
        let padded = normalize_padded(text);
        let mut out = SignalSet::default();

        for rule in &self.market {
            if contains_phrase(&padded, &rule.phrase) {
                out.market.insert(rule.code.clone());
            }
        }
        for rule in &self.topic {
            if contains_phrase(&padded, &rule.phrase) {
                out.topic.insert(rule.code.clone());
            }
        }
        for rule in &self.geo {
            if contains_phrase(&padded, &rule.phrase) {
                out.geo.insert(rule.code.clone());
            }
        }

        if let Some(host) = url.and_then(host_of) {
            for rule in &self.geo_domains {
                if host.ends_with(&rule.suffix) {
                    out.geo.insert(rule.code.clone());
                    break;
                }
            }
        }

        out
    }

    /// Built-in seed covering the markets, topics, and regions the collected
    /// outlets write about. Used as fallback if no table file is found.
    pub fn default_seed() -> Self {
        fn rules(pairs: &[(&str, &str)]) -> Vec<KeywordRule> {
            pairs
                .iter()
                .map(|(p, c)| KeywordRule {
                    phrase: (*p).to_string(),
                    code: (*c).to_string(),
                })
                .collect()
        }

        let market = rules(&[
            ("eu ets", "eu-ets"),
            ("eu emissions trading", "eu-ets"),
            ("european carbon", "eu-ets"),
            ("eua", "eu-ets"),
            ("euas", "eu-ets"),
            ("uk ets", "uk-ets"),
            ("uka", "uk-ets"),
            ("china ets", "cn-ets"),
            ("national carbon market", "cn-ets"),
            ("korea ets", "kr-ets"),
            ("k ets", "kr-ets"),
            ("rggi", "rggi"),
            ("california cap and trade", "ca-cat"),
            ("cap and trade", "ca-cat"),
            ("voluntary carbon market", "vcm"),
            ("voluntary carbon", "vcm"),
            ("carbon credit", "vcm"),
            ("carbon credits", "vcm"),
            ("carbon offset", "vcm"),
            ("carbon offsets", "vcm"),
            ("vcm", "vcm"),
            ("corsia", "corsia"),
            ("article 6", "article6"),
        ]);

        let topic = rules(&[
            ("forest", "forest-carbon"),
            ("forestry", "forest-carbon"),
            ("redd", "forest-carbon"),
            ("deforestation", "forest-carbon"),
            ("hydrogen", "hydrogen"),
            ("litigation", "litigation"),
            ("lawsuit", "litigation"),
            ("court", "litigation"),
            ("tribunal", "litigation"),
            ("cbam", "cbam"),
            ("border adjustment", "cbam"),
            ("removal", "removals"),
            ("removals", "removals"),
            ("direct air capture", "removals"),
            ("biochar", "biochar"),
            ("cookstove", "cookstoves"),
            ("cookstoves", "cookstoves"),
            ("aviation", "aviation"),
            ("shipping", "shipping"),
            ("maritime", "shipping"),
            ("methane", "methane"),
        ]);

        let geo = rules(&[
            ("brazil", "br"),
            ("indonesia", "id"),
            ("india", "in"),
            ("china", "cn"),
            ("chinese", "cn"),
            ("european union", "eu"),
            ("europe", "eu"),
            ("brussels", "eu"),
            ("united states", "us"),
            ("america", "us"),
            ("washington", "us"),
            ("australia", "au"),
            ("japan", "jp"),
            ("korea", "kr"),
            ("united kingdom", "uk"),
            ("britain", "uk"),
            ("kenya", "ke"),
            ("ghana", "gh"),
        ]);

        // Longest suffixes first; first match wins.
        let geo_domains = [
            (".gov.uk", "uk"),
            (".gov.au", "au"),
            (".gov.br", "br"),
            (".gov.cn", "cn"),
            (".gov.in", "in"),
            (".go.jp", "jp"),
            (".go.kr", "kr"),
            (".gc.ca", "ca"),
            (".europa.eu", "eu"),
            (".gov", "us"),
        ]
        .iter()
        .map(|(s, c)| DomainRule {
            suffix: (*s).to_string(),
            code: (*c).to_string(),
        })
        .collect();

        Self {
            market,
            topic,
            geo,
            geo_domains,
        }
    }
}

/// Lowercase, map separators/punctuation to spaces, collapse, and pad with
/// one space on each side so phrase containment checks stay word-bounded.
fn normalize_padded(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(' ');
    let mut last_space = true;
    for ch in s.chars() {
        if ch.is_alphanumeric() {
            for c in ch.to_lowercase() {
                out.push(c);
            }
            last_space = false;
        } else if !last_space {
            out.push(' ');
            last_space = true;
        }
    }
    if !last_space {
        out.push(' ');
    }
    out
}

fn contains_phrase(padded: &str, phrase: &str) -> bool {
    let needle = normalize_padded(phrase);
    padded.contains(&needle)
}

/// Host part of a URL, lowercased: scheme stripped, cut at the first `/`,
/// `:` or `?`. Hand-rolled on purpose; candidate URLs come from a search
/// API and are well-formed enough for suffix checks.
pub fn host_of(url: &str) -> Option<String> {
    let rest = url
        .trim()
        .strip_prefix("https://")
        .or_else(|| url.trim().strip_prefix("http://"))
        .unwrap_or_else(|| url.trim());
    let host = rest.split(['/', ':', '?']).next().unwrap_or_default();
    if host.is_empty() {
        None
    } else {
        Some(host.to_ascii_lowercase())
    }
}
