//! The shipped question catalog.

use std::path::Path;

use batq::catalog::QueryCatalog;
use batq::engine::{MockAnalysisClient, QueryRegistry};
use batq::selection::ParamType;
use pretty_assertions::assert_eq;

fn shipped_catalog() -> QueryCatalog {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("questions.yaml");
    QueryCatalog::load(&path).unwrap()
}

#[test]
fn test_shipped_catalog_loads() {
    let catalog = shipped_catalog();
    let names: Vec<&str> = catalog
        .categories()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "Snapshot Input and Integrity",
            "Configuration Properties",
            "Topology",
            "Routing and Forwarding Tables",
            "Packet Forwarding",
        ]
    );
    assert!(catalog.entry("Routes").is_some());
    assert_eq!(
        catalog.entry_by_fun("layer3Edges").map(|e| e.name.as_str()),
        Some("Layer 3 Topology")
    );
}

#[test]
fn test_traceroute_parameters() {
    let catalog = shipped_catalog();
    let traceroute = catalog.entry("Traceroute").unwrap();

    let labels: Vec<String> = traceroute.params.iter().map(|p| p.label()).collect();
    assert_eq!(labels, vec!["startLocation*", "headers*", "maxTraces"]);
    assert_eq!(
        traceroute.param("headers").and_then(|p| p.param_type.clone()),
        Some(ParamType::HeaderConstraints)
    );
    assert_eq!(
        traceroute.param("maxTraces").and_then(|p| p.param_type.clone()),
        Some(ParamType::Integer)
    );
}

#[tokio::test]
async fn test_mock_engine_knows_every_catalog_question() {
    let catalog = shipped_catalog();
    let client = MockAnalysisClient::new();
    let registry = QueryRegistry::discover(&client).await.unwrap();

    for entry in catalog.entries() {
        assert!(
            registry.contains(&entry.fun),
            "mock engine does not offer '{}'",
            entry.fun
        );
    }
}
