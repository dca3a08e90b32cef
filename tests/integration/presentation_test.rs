//! Presenting mock engine answers, and rendering the resulting pages.

use batq::engine::{AnalysisClient, Answer, MockAnalysisClient, Target};
use batq::pages::{Page, PageOutput, TableOutput};
use batq::present::{present, STEP_HEADERS};
use batq::render::{render, OutputFormat};
use pretty_assertions::assert_eq;
use serde_json::json;

async fn answer(fun: &str) -> Answer {
    MockAnalysisClient::new()
        .run_query(fun, None, &Target::snapshot("base"))
        .await
        .unwrap()
}

fn table(output: &PageOutput) -> &TableOutput {
    match output {
        PageOutput::Table(table) => table,
        other => panic!("expected a table, got {other:?}"),
    }
}

#[tokio::test]
async fn test_routes_drop_structurally_empty_columns() {
    let outputs = present("routes", &answer("routes").await);

    let routes = table(&outputs[0]);
    assert_eq!(
        routes.headers,
        vec!["Node", "VRF", "Network", "Next_Hop_IP", "Protocol", "Metric"]
    );
    assert_eq!(routes.rows.len(), 3);
    assert_eq!(
        outputs[1],
        PageOutput::info("The query returned these empty columns: Tag.")
    );
}

#[tokio::test]
async fn test_generic_answers_keep_empty_strings() {
    let outputs = present("interfaceProperties", &answer("interfaceProperties").await);
    let interfaces = table(&outputs[0]);
    assert_eq!(interfaces.headers, vec!["Interface", "Active", "Description"]);
    assert_eq!(interfaces.rows[0][0], r#"{"hostname":"as1border1","interface":"GigabitEthernet0/0"}"#);
}

#[tokio::test]
async fn test_layer3_edges_include_topology() {
    let outputs = present("layer3Edges", &answer("layer3Edges").await);

    let PageOutput::Diagram { title, dot } = outputs.last().unwrap() else {
        panic!("expected a diagram");
    };
    assert_eq!(title, "Topology");
    assert!(dot.starts_with("graph {"));
    // Both directions of the as1border1 link collapse into one edge.
    assert_eq!(dot.matches(" -- ").count(), 2);
}

#[tokio::test]
async fn test_traceroute_tabs_per_trace() {
    let outputs = present("traceroute", &answer("traceroute").await);

    let PageOutput::Info(caption) = &outputs[0] else {
        panic!("expected the flow caption first");
    };
    assert!(caption.starts_with("Flow: ingressNode=as2core1 dstIp=2.34.201.10"));

    let PageOutput::Tabs(tabs) = &outputs[1] else {
        panic!("expected trace tabs");
    };
    let titles: Vec<&str> = tabs.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Trace 1", "Trace 2"]);

    let denied = table(&tabs[1].outputs[0]);
    assert_eq!(denied.headers, STEP_HEADERS.to_vec());
    assert_eq!(
        denied.rows[1],
        vec!["DENIED_IN", "as2core1", "Filter", "DENIED", r#"{"filter":"blocktelnet"}"#]
    );
}

#[test]
fn test_malformed_traces_fall_back_to_raw() {
    let row = serde_json::from_value(json!({"Flow": "f", "Traces": "not a list"})).unwrap();
    let answer = Answer::from_rows(vec![row]);

    let outputs = present("traceroute", &answer);
    assert_eq!(outputs.len(), 2);
    assert!(matches!(&outputs[0], PageOutput::Error(msg)
        if msg.starts_with("Could not format the result:")));
    assert!(matches!(&outputs[1], PageOutput::Raw(_)));
}

#[tokio::test]
async fn test_rendered_text_page() {
    let mut page = Page::new("Analysis");
    page.extend(present("fileParseStatus", &answer("fileParseStatus").await));

    let text = render(&page, OutputFormat::Text).unwrap();
    assert!(text.starts_with("# Analysis\n┌"));
    assert!(text.contains("│ configs/as1border1.cfg │ PASSED │"));
    assert!(text.contains("3 rows\n"));
}

#[tokio::test]
async fn test_rendered_json_page() {
    let mut page = Page::new("Analysis");
    page.extend(present("layer3Edges", &answer("layer3Edges").await));

    let json: serde_json::Value =
        serde_json::from_str(&render(&page, OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(json["title"], "Analysis");
    assert_eq!(json["outputs"][0]["kind"], "table");
    assert_eq!(json["outputs"].as_array().unwrap().last().unwrap()["kind"], "diagram");
}
