//! Saving and loading selections through the questions page.

use batq::catalog::QueryCatalog;
use batq::config::ServerConfig;
use batq::engine::MockAnalysisClient;
use batq::pages::questions::{questions, QuestionsAction};
use batq::pages::{PageContext, PageOutput};
use batq::selection::{io, SelectionAction};
use batq::session::SessionContext;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

const CATALOG: &str = r#"
Batfish:
  - category: Routing
    questions:
      - name: Routes
        fun: routes
        input:
          - name: nodes
          - name: network
  - category: Packet Forwarding
    questions:
      - name: Traceroute
        fun: traceroute
        input:
          - name: startLocation
            optional: false
          - name: headers
            optional: false
            type: HeaderConstraints
          - name: maxTraces
            type: int
"#;

fn edit(ctx: &PageContext<'_>, session: &mut SessionContext, action: SelectionAction) {
    questions(ctx, session, QuestionsAction::Apply(action));
}

#[test]
fn test_export_then_import_restores_selection() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("select_questions.yaml");
    let client = MockAnalysisClient::new();
    let catalog = QueryCatalog::from_yaml(CATALOG).unwrap();
    let server = ServerConfig::default();
    let ctx = PageContext::new(&client, &catalog, &server).without_probe();

    let mut session = SessionContext::default();
    edit(
        &ctx,
        &mut session,
        SelectionAction::SetCategory {
            category: "Packet Forwarding".into(),
            checked: vec!["Traceroute".into()],
        },
    );
    edit(
        &ctx,
        &mut session,
        SelectionAction::SetParam {
            query: "Traceroute".into(),
            param: "headers".into(),
            variant: 0,
            text: r#"{"dstIps": "2.34.201.10", "applications": ["ssh"]}"#.into(),
        },
    );
    edit(
        &ctx,
        &mut session,
        SelectionAction::SetParam {
            query: "Traceroute".into(),
            param: "maxTraces".into(),
            variant: 0,
            text: "2".into(),
        },
    );
    edit(
        &ctx,
        &mut session,
        SelectionAction::CloneVariant {
            query: "Traceroute".into(),
        },
    );

    let page = questions(&ctx, &mut session, QuestionsAction::Export(path.clone()));
    assert_eq!(
        page.outputs,
        vec![PageOutput::info(format!(
            "Saved 1 questions to {}",
            path.display()
        ))]
    );

    let mut fresh = SessionContext::default();
    let page = questions(&ctx, &mut fresh, QuestionsAction::Import(path.clone()));
    assert!(!page.has_errors());
    assert_eq!(fresh.selection.selection, session.selection.selection);
    assert_eq!(
        fresh.selection.checked("Packet Forwarding").to_vec(),
        vec!["Traceroute".to_string()]
    );

    let invocations = fresh.selection.invocations();
    assert_eq!(invocations.len(), 2);
    assert_eq!(invocations[1].name, "Traceroute_1");
    let options = invocations[1].options.as_ref().unwrap();
    assert_eq!(options["maxTraces"], json!(2));
    assert_eq!(options["headers"]["dstIps"], json!("2.34.201.10"));
}

#[test]
fn test_import_warns_about_unknown_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("foreign.yaml");
    std::fs::write(
        &path,
        r#"
questions:
  Routes:
    category: Routing
    fun: routes
    variants:
      - nodes: as1border1
        vrfs: default
  Mystery:
    category: Elsewhere
    fun: mysteryQuestion
"#,
    )
    .unwrap();

    let client = MockAnalysisClient::new();
    let catalog = QueryCatalog::from_yaml(CATALOG).unwrap();
    let server = ServerConfig::default();
    let ctx = PageContext::new(&client, &catalog, &server).without_probe();

    let mut session = SessionContext::default();
    let page = questions(&ctx, &mut session, QuestionsAction::Import(path.clone()));

    assert!(page.outputs.contains(&PageOutput::warning(
        "'Routes' variant 0 sets undeclared parameter 'vrfs'"
    )));
    assert!(page.outputs.contains(&PageOutput::warning(
        "'Mystery' runs unknown question 'mysteryQuestion'"
    )));
    assert!(page.outputs.contains(&PageOutput::info(format!(
        "Loaded 2 questions from {}",
        path.display()
    ))));
    // Imported entries are kept even when the catalog does not know them.
    assert_eq!(session.selection.selection.len(), 2);
}

#[test]
fn test_import_of_missing_file_is_an_inline_error() {
    let dir = tempdir().unwrap();
    let client = MockAnalysisClient::new();
    let catalog = QueryCatalog::from_yaml(CATALOG).unwrap();
    let server = ServerConfig::default();
    let ctx = PageContext::new(&client, &catalog, &server).without_probe();

    let mut session = SessionContext::default();
    let page = questions(
        &ctx,
        &mut session,
        QuestionsAction::Import(dir.path().join("absent.yaml")),
    );
    assert!(page.has_errors());
    assert!(session.selection.is_empty());
}

#[test]
fn test_selection_file_layout() {
    let client = MockAnalysisClient::new();
    let catalog = QueryCatalog::from_yaml(CATALOG).unwrap();
    let server = ServerConfig::default();
    let ctx = PageContext::new(&client, &catalog, &server).without_probe();

    let mut session = SessionContext::default();
    edit(
        &ctx,
        &mut session,
        SelectionAction::SetCategory {
            category: "Routing".into(),
            checked: vec!["Routes".into()],
        },
    );

    let yaml = io::to_yaml(&session.selection.selection).unwrap();
    let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed["questions"]["Routes"]["fun"].as_str(), Some("routes"));
    assert_eq!(
        parsed["questions"]["Routes"]["category"].as_str(),
        Some("Routing")
    );
}
