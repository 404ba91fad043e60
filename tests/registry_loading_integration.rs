mod integration;

use gridmatch::Registry;
use integration::{institute, sample_institutes, with_parent, RegistryFixture};

#[tokio::test]
async fn test_load_registry_snapshot() {
    let fixture = RegistryFixture::new();
    let path = fixture.write_registry("grid.json", sample_institutes());

    let registry = Registry::load(&path).await.expect("Failed to load registry");
    assert_eq!(registry.len(), 6);

    let harvard = &registry.institutes[0];
    assert_eq!(harvard.id, "grid.38142.3c");
    assert_eq!(harvard.display_name(), Some("Harvard University"));
    assert_eq!(harvard.country(), Some("United States"));
    assert_eq!(harvard.aliases, vec!["Harvard"]);

    let department = &registry.institutes[5];
    assert_eq!(department.parent_id(), Some("grid.4991.5"));
}

#[tokio::test]
async fn test_missing_snapshot_is_fatal() {
    let fixture = RegistryFixture::new();
    let result = Registry::load(&fixture.path("does-not-exist.json")).await;

    let error = result.expect_err("missing snapshot must fail");
    assert!(error.to_string().contains("does not exist"));
}

#[tokio::test]
async fn test_empty_snapshot_is_fatal() {
    let fixture = RegistryFixture::new();
    let path = fixture.write_registry("empty.json", vec![]);

    let error = Registry::load(&path).await.expect_err("empty snapshot must fail");
    assert!(error.to_string().contains("no institutes"));
}

#[tokio::test]
async fn test_malformed_snapshot_is_rejected() {
    let fixture = RegistryFixture::new();
    let path = fixture.write_file("broken.json", "{ \"institutes\": [ { \"id\": ");

    assert!(Registry::load(&path).await.is_err());
}

#[test]
fn test_incomplete_records_still_parse() {
    // Missing names and addresses are tolerated here and skipped at index build
    let content = r#"{
        "institutes": [
            { "id": "grid.1", "name": "Kyoto University", "addresses": [{ "country": "Japan" }] },
            { "id": "grid.2", "status": "redirected" },
            { "id": "grid.3", "name": "Orphan Lab", "addresses": [] }
        ]
    }"#;

    let registry = Registry::from_json_str(content).expect("Failed to parse registry");
    assert_eq!(registry.len(), 3);
    assert!(registry.institutes[0].is_indexable());
    assert!(!registry.institutes[1].is_indexable());
    assert!(!registry.institutes[2].is_indexable());
}

#[test]
fn test_from_reader_matches_from_str() {
    let records = vec![with_parent(
        institute("grid.2", "Kyoto University Hospital", "Japan"),
        "grid.1",
    )];
    let content = serde_json::json!({ "institutes": records }).to_string();

    let from_str = Registry::from_json_str(&content).unwrap();
    let from_reader = Registry::from_reader(content.as_bytes()).unwrap();
    assert_eq!(from_str.institutes, from_reader.institutes);
}
