// src/matcher/quality.rs
//! Domain/source quality boosts. A small ordered rule table; each matching
//! rule adds its boost, the total is clipped to [0,1]. Rules are data so new
//! trusted domains land in a table edit, not in scoring code.

use super::signals::host_of;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlPart {
    /// Matches when the host ends with the pattern (".gov.uk").
    HostSuffix,
    /// Matches when the host contains the pattern ("unfccc").
    HostContains,
    /// Matches when the URL path ends with the pattern (".pdf").
    PathSuffix,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QualityRule {
    pub part: UrlPart,
    pub pattern: String,
    pub boost: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QualityRules {
    #[serde(default)]
    pub rules: Vec<QualityRule>,
}

impl QualityRules {
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

    /// Additive boost for a candidate URL, clipped to [0,1].
    pub fn score(&self, url: &str) -> f32 {
        let Some(host) = host_of(url) else {
            return 0.0;
        };
        let path = url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        let mut total = 0.0f32;
        for rule in &self.rules {
            let hit = match rule.part {
                UrlPart::HostSuffix => host.ends_with(&rule.pattern),
                UrlPart::HostContains => host.contains(&rule.pattern),
                UrlPart::PathSuffix => path.ends_with(&rule.pattern),
            };
            if hit {
                total += rule.boost;
            }
        }
        total.clamp(0.0, 1.0)
    }

    /// Government domains, standards/registry bodies, recognized NGOs and
    /// international organizations, academic domains, and PDFs.
    pub fn default_seed() -> Self {
        fn r(part: UrlPart, pattern: &str, boost: f32) -> QualityRule {
            QualityRule {
                part,
                pattern: pattern.to_string(),
                boost,
            }
        }
        use UrlPart::*;

        Self {
            rules: vec![
                r(HostSuffix, ".gov.uk", 0.15),
                r(HostSuffix, ".gov.au", 0.15),
                r(HostSuffix, ".gov.br", 0.15),
                r(HostSuffix, ".gov", 0.15),
                r(HostSuffix, ".europa.eu", 0.15),
                r(HostSuffix, ".int", 0.15),
                r(HostSuffix, ".edu", 0.12),
                r(HostSuffix, ".ac.uk", 0.12),
                r(HostContains, "unfccc", 0.15),
                r(HostContains, "verra.org", 0.12),
                r(HostContains, "goldstandard.org", 0.12),
                r(HostContains, "icvcm.org", 0.12),
                r(HostContains, "iso.org", 0.12),
                r(HostContains, "iea.org", 0.12),
                r(HostContains, "worldbank.org", 0.12),
                r(HostContains, "wri.org", 0.12),
                r(HostContains, "carbonmarketwatch.org", 0.12),
                r(PathSuffix, ".pdf", 0.15),
            ],
        }
    }
}
