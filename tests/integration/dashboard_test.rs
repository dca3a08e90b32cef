//! Page-to-page flows with the session persisted between commands.

use batq::catalog::QueryCatalog;
use batq::config::ServerConfig;
use batq::engine::{FailingAnalysisClient, MockAnalysisClient};
use batq::pages::analysis::analysis;
use batq::pages::differential::differential;
use batq::pages::failure::{failure, FailureRequest};
use batq::pages::home::{home, HomeAction};
use batq::pages::questions::{questions, QuestionsAction};
use batq::pages::{PageContext, PageOutput, Tab, NO_SELECTION, NO_SNAPSHOT};
use batq::selection::SelectionAction;
use batq::session::{SessionContext, SessionStore};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const CATALOG: &str = r#"
Batfish:
  - category: Routing
    questions:
      - name: Routes
        fun: routes
        input:
          - name: nodes
          - name: rib
            optional: false
  - category: Topology
    questions:
      - name: Layer 3
        fun: layer3Edges
"#;

fn tabs(outputs: &[PageOutput]) -> &[Tab] {
    outputs
        .iter()
        .rev()
        .find_map(|o| match o {
            PageOutput::Tabs(tabs) => Some(tabs.as_slice()),
            _ => None,
        })
        .expect("page has no tabs")
}

fn titles(tabs: &[Tab]) -> Vec<&str> {
    tabs.iter().map(|t| t.title.as_str()).collect()
}

#[tokio::test]
async fn test_full_session_flow() {
    let dir = tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    let client = MockAnalysisClient::new();
    let catalog = QueryCatalog::from_yaml(CATALOG).unwrap();
    let server = ServerConfig::default();
    let ctx = PageContext::new(&client, &catalog, &server).without_probe();

    // Home picks the first snapshot.
    let mut session = store.load();
    let page = home(&ctx, &mut session, HomeAction::Show).await;
    assert!(!page.has_errors());
    assert_eq!(session.active_name(), Some("base"));
    store.save(&session).unwrap();

    // Select two queries and add a second Routes variant.
    let mut session = store.load();
    questions(
        &ctx,
        &mut session,
        QuestionsAction::Apply(SelectionAction::SetCategory {
            category: "Routing".into(),
            checked: vec!["Routes".into()],
        }),
    );
    questions(
        &ctx,
        &mut session,
        QuestionsAction::Apply(SelectionAction::SetCategory {
            category: "Topology".into(),
            checked: vec!["Layer 3".into()],
        }),
    );
    for (variant, node) in [(0, "as1border1"), (1, "as2core1")] {
        questions(
            &ctx,
            &mut session,
            QuestionsAction::Apply(SelectionAction::SetParam {
                query: "Routes".into(),
                param: "nodes".into(),
                variant,
                text: node.into(),
            }),
        );
    }
    store.save(&session).unwrap();

    // Analysis runs one tab per invocation, in selection order.
    let session = store.load();
    let page = analysis(&ctx, &session).await;
    assert!(!page.has_errors());
    assert_eq!(
        page.outputs[0],
        PageOutput::info("Active snapshot: base")
    );
    assert_eq!(titles(tabs(&page.outputs)), vec!["Routes", "Routes_1", "Layer 3"]);

    let runs: Vec<String> = client
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("run_query"))
        .collect();
    assert_eq!(
        runs,
        vec![
            "run_query routes base",
            "run_query routes base",
            "run_query layer3Edges base",
        ]
    );
}

#[tokio::test]
async fn test_pages_warn_on_missing_preconditions() {
    let client = MockAnalysisClient::new();
    let catalog = QueryCatalog::from_yaml(CATALOG).unwrap();
    let server = ServerConfig::default();
    let ctx = PageContext::new(&client, &catalog, &server).without_probe();

    let mut session = SessionContext::default();
    let page = analysis(&ctx, &session).await;
    assert_eq!(page.outputs, vec![PageOutput::warning(NO_SNAPSHOT)]);
    assert!(!page.blocked);

    session.select_active("base");
    let page = analysis(&ctx, &session).await;
    assert_eq!(page.outputs, vec![PageOutput::warning(NO_SELECTION)]);
}

#[tokio::test]
async fn test_unreachable_engine_blocks_every_page() {
    let client = FailingAnalysisClient::new();
    let catalog = QueryCatalog::from_yaml(CATALOG).unwrap();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let closed_port = listener.local_addr().unwrap().port();
    drop(listener);

    let mut server = ServerConfig::default();
    server.host = Some("127.0.0.1".to_string());
    server.probe_port = closed_port;
    let ctx = PageContext::new(&client, &catalog, &server);

    let mut session = SessionContext::default();
    session.select_active("base");

    let page = home(&ctx, &mut session, HomeAction::Show).await;
    assert!(page.blocked);
    assert_eq!(
        page.outputs,
        vec![PageOutput::error("Connection error: 127.0.0.1 is not reachable")]
    );

    assert!(analysis(&ctx, &session).await.blocked);
    assert!(differential(&ctx, &session).await.blocked);
    assert!(
        failure(&ctx, &mut session, FailureRequest::default())
            .await
            .blocked
    );
}

#[tokio::test]
async fn test_upload_select_compare_and_delete() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("branch.2024.zip");
    std::fs::write(&archive, b"PK\x03\x04rest-of-archive").unwrap();

    let client = MockAnalysisClient::new();
    let catalog = QueryCatalog::from_yaml(CATALOG).unwrap();
    let server = ServerConfig::default();
    let ctx = PageContext::new(&client, &catalog, &server).without_probe();
    let mut session = SessionContext::default();

    let page = home(&ctx, &mut session, HomeAction::Upload(archive)).await;
    assert!(page.outputs.contains(&PageOutput::info("Snapshot branch loaded")));
    assert_eq!(session.active_name(), Some("branch"));

    home(&ctx, &mut session, HomeAction::Alternate("base".into())).await;
    session.apply(
        SelectionAction::SetCategory {
            category: "Routing".into(),
            checked: vec!["Routes".into()],
        },
        &catalog,
    );

    let page = differential(&ctx, &session).await;
    assert!(!page.has_errors());
    assert!(page
        .outputs
        .contains(&PageOutput::info("Comparing base against reference branch")));
    assert!(client
        .calls()
        .contains(&"run_query routes base vs branch".to_string()));

    let page = home(&ctx, &mut session, HomeAction::Delete("branch".into())).await;
    assert!(page.outputs.contains(&PageOutput::info("Snapshot branch deleted")));
    // The first remaining snapshot becomes active again.
    assert_eq!(session.active_name(), Some("base"));
    assert!(!client.snapshots().contains(&"branch".to_string()));
}

#[tokio::test]
async fn test_failure_selection_survives_reload() {
    let dir = tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("nested").join("session.json"));
    let client = MockAnalysisClient::new();
    let catalog = QueryCatalog::from_yaml(CATALOG).unwrap();
    let server = ServerConfig::default();
    let ctx = PageContext::new(&client, &catalog, &server).without_probe();

    let mut session = SessionContext::default();
    session.select_active("base");
    session.apply(
        SelectionAction::SetCategory {
            category: "Topology".into(),
            checked: vec!["Layer 3".into()],
        },
        &catalog,
    );
    let request = FailureRequest {
        nodes: Some(vec!["as2core1".into()]),
        interfaces: None,
    };
    let page = failure(&ctx, &mut session, request).await;
    assert!(page.outputs.contains(&PageOutput::info("Running against base_Fail")));
    store.save(&session).unwrap();

    let mut reloaded = store.load();
    assert_eq!(reloaded, session);
    let active = reloaded.active.as_ref().unwrap();
    assert_eq!(active.failed_nodes, vec!["as2core1"]);

    // Switching snapshots starts without failures.
    reloaded.select_active("changed");
    assert!(!reloaded.active.as_ref().unwrap().has_failures());
}
