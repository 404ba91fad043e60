mod integration;

use gridmatch::{InstituteRecord, MatchScope, Matcher, MatcherConfig, Registry};
use integration::{institute, with_aliases, RegistryFixture};

#[tokio::test]
async fn test_toml_config_replaces_country_table() {
    let fixture = RegistryFixture::new();
    let config_path = fixture.write_file(
        "gridmatch.toml",
        r#"
[[countries]]
pattern = '\bBayern\b|\bBavaria\b'
country = "Germany"
"#,
    );

    let config = MatcherConfig::load(&config_path).await.expect("Failed to load config");
    assert_eq!(config.countries.len(), 1);
    // Tables the file omits keep their built-in values
    assert_eq!(config.abbreviations, MatcherConfig::default().abbreviations);

    let registry_path = fixture.write_registry(
        "grid.json",
        vec![institute("grid.5252.0", "Ludwig Maximilian University of Munich", "Germany")],
    );
    let registry = Registry::load(&registry_path).await.unwrap();
    let matcher = Matcher::from_records(&registry.institutes, &config).unwrap();

    let result = matcher.match_affiliation("Ludwig Maximilian University of Munich, Bavaria");
    assert_eq!(result.scope, Some(MatchScope::Country));
    assert_eq!(result.countries, vec!["Germany"]);
}

#[tokio::test]
async fn test_toml_ambiguous_names_block_patterns() {
    let fixture = RegistryFixture::new();
    let config_path = fixture.write_file(
        "gridmatch.toml",
        r#"
ambiguous_names = ["kth"]
manual_overrides = []
"#,
    );
    let config = MatcherConfig::load(&config_path).await.unwrap();

    let records = vec![with_aliases(
        institute("grid.5037.1", "Royal Institute of Technology", "Sweden"),
        &["KTH"],
    )];
    let records: Vec<InstituteRecord> =
        serde_json::from_value(serde_json::Value::Array(records)).unwrap();
    let matcher = Matcher::from_records(&records, &config).unwrap();

    assert!(!matcher.match_affiliation("KTH, Stockholm").is_match());
    assert!(matcher
        .match_affiliation("Royal Institute of Technology, Stockholm")
        .is_match());
}

#[tokio::test]
async fn test_manual_override_from_config() {
    let fixture = RegistryFixture::new();
    let config_path = fixture.write_file(
        "gridmatch.toml",
        r#"
[[manual_overrides]]
country = "Sweden"
pattern = "KTH Royal"
canonical_name = "Royal Institute of Technology"
"#,
    );
    let config = MatcherConfig::load(&config_path).await.unwrap();

    let registry_path = fixture.write_registry(
        "grid.json",
        vec![institute("grid.5037.1", "Royal Institute of Technology", "Sweden")],
    );
    let registry = Registry::load(&registry_path).await.unwrap();
    let matcher = Matcher::from_records(&registry.institutes, &config).unwrap();

    let result = matcher.match_affiliation("School of Engineering, KTH Royal, Sweden");
    assert_eq!(result.canonical_name, "Royal Institute of Technology");
    assert_eq!(result.candidate_ids, vec!["grid.5037.1"]);
}

#[tokio::test]
async fn test_missing_config_file_is_an_error() {
    let fixture = RegistryFixture::new();
    let error = MatcherConfig::load(&fixture.path("absent.toml"))
        .await
        .expect_err("missing config must fail");
    assert!(error.to_string().contains("does not exist"));
}

#[test]
fn test_default_config_survives_toml_round_trip() {
    let config = MatcherConfig::default();
    let text = config.to_toml_string().unwrap();
    assert_eq!(MatcherConfig::from_toml_str(&text).unwrap(), config);
}
