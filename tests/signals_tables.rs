// tests/signals_tables.rs
// Declarative table behavior: TOML loading, geo-from-TLD, quality rule
// ordering and cap. Tables are data; these tests stay independent of the
// scoring code paths.

use paywall_scout::matcher::quality::QualityRules;
use paywall_scout::matcher::signals::SignalTables;

const TABLES_TOML: &str = r#"
[[market]]
phrase = "eu ets"
code = "eu-ets"

[[market]]
phrase = "rggi"
code = "rggi"

[[topic]]
phrase = "hydrogen"
code = "hydrogen"

[[geo]]
phrase = "germany"
code = "de"

[[geo_domains]]
suffix = ".gov.uk"
code = "uk"

[[geo_domains]]
suffix = ".gov"
code = "us"
"#;

const QUALITY_TOML: &str = r#"
[[rules]]
part = "host_suffix"
pattern = ".gov"
boost = 0.15

[[rules]]
part = "path_suffix"
pattern = ".pdf"
boost = 0.15

[[rules]]
part = "host_contains"
pattern = "unfccc"
boost = 0.15
"#;

#[test]
fn keyword_tables_extract_all_three_categories() {
    let t = SignalTables::from_toml_str(TABLES_TOML).expect("parse tables");
    let s = t.extract("Germany weighs EU ETS link as hydrogen demand grows", None);
    assert!(s.market.contains("eu-ets"));
    assert!(s.topic.contains("hydrogen"));
    assert!(s.geo.contains("de"));
    assert!(!s.market.contains("rggi"));
}

#[test]
fn domain_suffix_order_gives_longest_match() {
    let t = SignalTables::from_toml_str(TABLES_TOML).expect("parse tables");
    let uk = t.extract("consultation", Some("https://www.defra.gov.uk/doc"));
    let us = t.extract("rulemaking", Some("https://www.epa.gov/doc"));
    assert!(uk.geo.contains("uk") && !uk.geo.contains("us"));
    assert!(us.geo.contains("us"));
}

#[test]
fn geo_domain_hint_applies_without_keyword_matches() {
    let t = SignalTables::from_toml_str(TABLES_TOML).expect("parse tables");
    let s = t.extract("untagged press release", Some("https://agency.gov/item"));
    assert!(s.market.is_empty() && s.topic.is_empty());
    assert_eq!(s.geo.iter().map(String::as_str).collect::<Vec<_>>(), vec!["us"]);
}

#[test]
fn quality_rules_are_additive_and_capped() {
    let q = QualityRules::from_toml_str(QUALITY_TOML).expect("parse rules");
    assert!((q.score("https://unfccc.int/report.pdf") - 0.30).abs() < 1e-6);
    assert!((q.score("https://epa.gov/report.pdf") - 0.30).abs() < 1e-6);
    assert_eq!(q.score("https://blog.example/post"), 0.0);
}

#[test]
fn seed_tables_are_usable_without_any_files() {
    let s = SignalTables::default_seed().extract(
        "Article 6 credits and CORSIA eligibility in Indonesia",
        None,
    );
    assert!(s.market.contains("article6"));
    assert!(s.market.contains("corsia"));
    assert!(s.geo.contains("id"));

    let q = QualityRules::default_seed();
    assert!(q.score("https://unfccc.int/documents/624444") > 0.0);
}

#[test]
fn missing_table_file_falls_back_to_seed() {
    let t = SignalTables::load_from_file("/nonexistent/tables.toml");
    let s = t.extract("EU ETS auction calendar", None);
    assert!(s.market.contains("eu-ets"));

    let q = QualityRules::load_from_file("/nonexistent/quality.toml");
    assert!(q.score("https://x.example/doc.pdf") > 0.0);
}
