//! Flattening of flow traces into per-hop step tables.

use serde_json::Value;

use crate::engine::{display_cell, Answer, Row};
use crate::error::{BatqError, Result};
use crate::pages::{PageOutput, Tab};

/// Answer columns that hold lists of traces, in display order.
pub const TRACE_COLUMNS: [&str; 5] = [
    "Traces",
    "Forward_Traces",
    "Reverse_Traces",
    "Snapshot_Traces",
    "Reference_Traces",
];

pub const STEP_HEADERS: [&str; 5] = ["Disposition", "Node", "Type", "Action", "Detail"];

fn field<'a>(value: &'a Value, key: &str, what: &str) -> Result<&'a Value> {
    value
        .get(key)
        .ok_or_else(|| BatqError::presentation(format!("{what} has no '{key}'")))
}

fn text(value: &Value) -> String {
    value.as_str().map(str::to_string).unwrap_or_else(|| display_cell(value))
}

/// One table row per step of every hop of the trace.
pub fn trace_steps(trace: &Value) -> Result<Vec<Vec<String>>> {
    let disposition = text(field(trace, "disposition", "Trace")?);
    let hops = field(trace, "hops", "Trace")?
        .as_array()
        .ok_or_else(|| BatqError::presentation("Trace hops are not a list"))?;

    let mut rows = Vec::new();
    for hop in hops {
        let node = field(hop, "node", "Hop")?;
        let node = match node.get("name") {
            Some(name) => text(name),
            None => text(node),
        };
        let steps = field(hop, "steps", "Hop")?
            .as_array()
            .ok_or_else(|| BatqError::presentation("Hop steps are not a list"))?;

        for step in steps {
            rows.push(vec![
                disposition.clone(),
                node.clone(),
                step.get("type").map(text).unwrap_or_default(),
                step.get("action").map(text).unwrap_or_default(),
                step.get("detail").map(display_cell).unwrap_or_default(),
            ]);
        }
    }
    Ok(rows)
}

/// Short description of a flow for use as a caption.
pub fn flow_caption(flow: &Value) -> String {
    match flow {
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| format!("{k}={}", text(v)))
            .collect::<Vec<_>>()
            .join(" "),
        other => text(other),
    }
}

fn tab_title(column: &str, index: usize) -> String {
    match column.strip_suffix("_Traces") {
        Some(prefix) => format!("{prefix} Trace {index}"),
        None => format!("Trace {index}"),
    }
}

fn headers() -> Vec<String> {
    STEP_HEADERS.iter().map(|h| h.to_string()).collect()
}

fn present_row(row: &Row, row_idx: usize) -> Result<Vec<PageOutput>> {
    let mut traces = Vec::new();
    let mut found = false;
    for column in TRACE_COLUMNS {
        let Some(value) = row.get(column) else {
            continue;
        };
        found = true;
        let list = value.as_array().ok_or_else(|| {
            BatqError::presentation(format!("Row {row_idx}: '{column}' is not a list"))
        })?;
        for (i, trace) in list.iter().enumerate() {
            traces.push((tab_title(column, i + 1), trace_steps(trace)?));
        }
    }
    if !found {
        return Err(BatqError::presentation(format!(
            "Row {row_idx} has no trace column"
        )));
    }

    let caption = row.get("Flow").map(flow_caption);
    let mut outputs = Vec::new();

    match traces.len() {
        0 => {
            if let Some(caption) = caption {
                outputs.push(PageOutput::info(format!("Flow: {caption}")));
            }
            outputs.push(PageOutput::info("No traces."));
        }
        1 => {
            let (_, steps) = traces.remove(0);
            outputs.push(match caption {
                Some(caption) => PageOutput::captioned_table(caption, headers(), steps),
                None => PageOutput::table(headers(), steps),
            });
        }
        _ => {
            if let Some(caption) = caption {
                outputs.push(PageOutput::info(format!("Flow: {caption}")));
            }
            let tabs = traces
                .into_iter()
                .map(|(title, steps)| Tab::new(title, vec![PageOutput::table(headers(), steps)]))
                .collect();
            outputs.push(PageOutput::Tabs(tabs));
        }
    }
    Ok(outputs)
}

/// Renders every row of a trace answer.
///
/// Fails when a row lacks a trace column or a trace is malformed.
pub fn present_traces(answer: &Answer) -> Result<Vec<PageOutput>> {
    let mut outputs = Vec::new();
    for (idx, row) in answer.rows.iter().enumerate() {
        outputs.extend(present_row(row, idx)?);
    }
    Ok(outputs)
}
