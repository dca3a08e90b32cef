//! Result presentation.
//!
//! Turns an engine answer into page outputs. Each answer is classified by the
//! question that produced it, its empty columns are filtered, and it is shown
//! as a table, as trace step tables, and for edge listings also as a topology
//! diagram. When an answer does not have the shape its kind expects, the
//! error is shown inline together with the raw answer.

mod filter;
mod topology;
mod traces;

pub use filter::{filter_columns, is_structurally_empty, table_rows, FilteredColumns};
pub use topology::{edge_endpoints, Topology};
pub use traces::{flow_caption, present_traces, trace_steps, STEP_HEADERS, TRACE_COLUMNS};

use serde_json::Value;
use tracing::warn;

use crate::engine::{Answer, TabResult};
use crate::error::{BatqError, Result};
use crate::pages::{PageOutput, Tab};

pub const NO_DATA: &str =
    "No data available! This usually means that the query is not applicable to the network.";

const TRACE_QUERIES: &[&str] = &[
    "traceroute",
    "bidirectionalTraceroute",
    "reachability",
    "bidirectionalReachability",
    "differentialReachability",
];

const EDGE_QUERIES: &[&str] = &[
    "layer1Edges",
    "layer3Edges",
    "ospfEdges",
    "bgpEdges",
    "isisEdges",
    "eigrpEdges",
    "ipsecEdges",
    "vxlanEdges",
];

const ROUTE_QUERIES: &[&str] = &["routes", "bgpRib", "evpnRib"];

const PARSE_QUERIES: &[&str] = &["fileParseStatus", "parseWarning", "initIssues"];

/// How an answer is presented, decided by the question that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Flow traces, flattened into step tables.
    Trace,
    /// Edge listing: filtered table plus topology diagram.
    Edges,
    /// Route listings and parse status: empty lists and strings count as empty.
    Structural,
    /// Everything else: only all-null columns are dropped.
    Generic,
}

pub fn classify(fun: &str) -> QueryKind {
    if TRACE_QUERIES.contains(&fun) {
        QueryKind::Trace
    } else if EDGE_QUERIES.contains(&fun) {
        QueryKind::Edges
    } else if ROUTE_QUERIES.contains(&fun) || PARSE_QUERIES.contains(&fun) {
        QueryKind::Structural
    } else {
        QueryKind::Generic
    }
}

fn present_table(answer: &Answer, kind: QueryKind) -> Vec<PageOutput> {
    let filtered = match kind {
        QueryKind::Generic => filter_columns(answer, Value::is_null),
        _ => filter_columns(answer, is_structurally_empty),
    };

    let mut outputs = if filtered.kept.is_empty() {
        vec![PageOutput::warning(NO_DATA)]
    } else {
        vec![PageOutput::table(
            filtered.kept.clone(),
            table_rows(answer, &filtered.kept),
        )]
    };
    if let Some(msg) = filtered.removed_message() {
        outputs.push(PageOutput::info(msg));
    }
    outputs
}

fn present_edges(answer: &Answer) -> Vec<PageOutput> {
    let mut outputs = present_table(answer, QueryKind::Edges);
    let topology = Topology::from_answer(answer);
    if !topology.is_empty() {
        outputs.push(PageOutput::diagram("Topology", topology.to_dot()));
    }
    outputs
}

fn try_present(fun: &str, answer: &Answer) -> Result<Vec<PageOutput>> {
    if answer.is_empty() {
        return Ok(vec![PageOutput::warning(NO_DATA)]);
    }
    Ok(match classify(fun) {
        QueryKind::Trace => present_traces(answer)?,
        QueryKind::Edges => present_edges(answer),
        kind => present_table(answer, kind),
    })
}

/// Inline error followed by the raw answer.
pub fn fallback(answer: &Answer, err: &BatqError) -> Vec<PageOutput> {
    let raw = serde_json::to_value(answer).unwrap_or(Value::Null);
    vec![
        PageOutput::error(format!("Could not format the result: {err}")),
        PageOutput::Raw(raw),
    ]
}

/// Presents one answer. Never fails: shape errors fall back to raw output.
pub fn present(fun: &str, answer: &Answer) -> Vec<PageOutput> {
    match try_present(fun, answer) {
        Ok(outputs) => outputs,
        Err(e) => {
            warn!("Falling back to raw output for {fun}: {e}");
            fallback(answer, &e)
        }
    }
}

/// One tab per invocation; failed invocations show their error in their tab.
pub fn present_results(results: &[TabResult]) -> PageOutput {
    let tabs = results
        .iter()
        .map(|result| {
            let outputs = match &result.outcome {
                Ok(answer) => present(&result.fun, answer),
                Err(e) => vec![PageOutput::error(e.to_string())],
            };
            Tab::new(result.name.clone(), outputs)
        })
        .collect();
    PageOutput::Tabs(tabs)
}
