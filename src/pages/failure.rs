//! Failure tests page: simulates node and interface failures.
//!
//! Candidates come from the active snapshot's node and interface properties.
//! When failures are selected, the active snapshot is forked with them
//! deactivated and the selection runs against the fork.

use serde_json::Value;
use tracing::warn;

use super::{Page, PageContext, PageOutput, NO_SELECTION, NO_SNAPSHOT};
use crate::engine::{ForkRequest, InterfaceRef, Target};
use crate::error::Result;
use crate::present::present_results;
use crate::session::SessionContext;

const TITLE: &str = "Failure Tests";

pub const NO_FAILURES: &str = "Select failed nodes and/or interfaces.";

/// New failure selections. `None` keeps what the session already holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureRequest {
    pub nodes: Option<Vec<String>>,
    pub interfaces: Option<Vec<String>>,
}

/// Nodes and interfaces that can be failed in a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    pub nodes: Vec<String>,
    pub interfaces: Vec<String>,
}

impl Candidates {
    /// Reads candidates from the active snapshot.
    pub async fn discover(ctx: &PageContext<'_>, snapshot: &str) -> Result<Self> {
        let target = Target::snapshot(snapshot);
        let nodes = ctx
            .client
            .run_query("nodeProperties", None, &target)
            .await?
            .column_values("Node")
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        let interfaces = ctx
            .client
            .run_query("interfaceProperties", None, &target)
            .await?
            .column_values("Interface")
            .filter_map(InterfaceRef::from_value)
            .map(|iface| iface.to_string())
            .collect();
        Ok(Self { nodes, interfaces })
    }
}

/// Keeps the known names, warning about the rest.
fn keep_known(
    kind: &str,
    requested: Vec<String>,
    known: &[String],
    outputs: &mut Vec<PageOutput>,
) -> Vec<String> {
    requested
        .into_iter()
        .filter(|name| {
            let ok = known.contains(name);
            if !ok {
                warn!("Ignoring unknown {kind} '{name}'");
                outputs.push(PageOutput::warning(format!(
                    "Unknown {kind} '{name}' ignored"
                )));
            }
            ok
        })
        .collect()
}

fn marked_table(header: &str, candidates: &[String], failed: &[String]) -> PageOutput {
    let rows = candidates
        .iter()
        .map(|c| {
            let marker = if failed.contains(c) { "failed" } else { "" };
            vec![c.clone(), marker.to_string()]
        })
        .collect();
    PageOutput::table(vec![header.to_string(), "State".to_string()], rows)
}

pub async fn failure(
    ctx: &PageContext<'_>,
    session: &mut SessionContext,
    request: FailureRequest,
) -> Page {
    if let Err(e) = ctx.check_engine().await {
        return Page::blocked(TITLE, e.to_string());
    }

    let mut page = Page::new(TITLE);
    let Some(active) = session.active.clone() else {
        page.push(PageOutput::warning(NO_SNAPSHOT));
        return page;
    };

    let candidates = match Candidates::discover(ctx, &active.name).await {
        Ok(candidates) => candidates,
        Err(e) => {
            page.push(PageOutput::error(e.to_string()));
            return page;
        }
    };

    let mut notes = Vec::new();
    let nodes = match request.nodes {
        Some(nodes) => keep_known("node", nodes, &candidates.nodes, &mut notes),
        None => active.failed_nodes.clone(),
    };
    let interfaces = match request.interfaces {
        Some(ifaces) => keep_known("interface", ifaces, &candidates.interfaces, &mut notes),
        None => active.failed_interfaces.clone(),
    };
    session.set_failures(nodes.clone(), interfaces.clone());
    page.extend(notes);

    page.push(PageOutput::info(format!("Active snapshot: {}", active.name)));
    page.push(marked_table("Node", &candidates.nodes, &nodes));
    page.push(marked_table("Interface", &candidates.interfaces, &interfaces));

    if nodes.is_empty() && interfaces.is_empty() {
        page.push(PageOutput::info(NO_FAILURES));
        return page;
    }
    if session.selection.is_empty() {
        page.push(PageOutput::warning(NO_SELECTION));
        return page;
    }

    let fork = ForkRequest {
        snapshot_base: active.name.clone(),
        snapshot_new: active.fork_name(),
        deactivate_nodes: nodes,
        deactivate_interfaces: interfaces
            .iter()
            .filter_map(|i| InterfaceRef::parse(i))
            .collect(),
        overwrite: true,
    };
    if let Err(e) = ctx.client.fork_snapshot(&fork).await {
        page.push(PageOutput::error(e.to_string()));
        return page;
    }

    page.push(PageOutput::info(format!(
        "Running against {}",
        fork.snapshot_new
    )));
    match ctx
        .run_selection(session, &Target::snapshot(fork.snapshot_new.clone()))
        .await
    {
        Ok(results) => page.push(present_results(&results)),
        Err(e) => page.push(PageOutput::error(e.to_string())),
    }
    page
}
