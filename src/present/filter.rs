//! Column filtering of tabular answers.

use serde_json::Value;

use crate::engine::{display_cell, Answer};

/// Null, an empty string or an empty list.
pub fn is_structurally_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Columns kept for display and columns dropped as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredColumns {
    pub kept: Vec<String>,
    pub removed: Vec<String>,
}

impl FilteredColumns {
    /// Message listing the dropped columns, if any.
    pub fn removed_message(&self) -> Option<String> {
        if self.removed.is_empty() {
            None
        } else {
            Some(format!(
                "The query returned these empty columns: {}.",
                self.removed.join(", ")
            ))
        }
    }
}

/// Splits the answer's columns into kept and removed ones.
///
/// A column is removed when `is_empty` holds for every row. Answers without
/// rows keep all their columns.
pub fn filter_columns(answer: &Answer, is_empty: impl Fn(&Value) -> bool) -> FilteredColumns {
    let mut filtered = FilteredColumns::default();
    for name in answer.column_names() {
        let empty = !answer.rows.is_empty() && answer.column_values(&name).all(&is_empty);
        if empty {
            filtered.removed.push(name);
        } else {
            filtered.kept.push(name);
        }
    }
    filtered
}

/// Formats the kept columns of every row as display strings.
pub fn table_rows(answer: &Answer, columns: &[String]) -> Vec<Vec<String>> {
    answer
        .rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.get(c).map(display_cell).unwrap_or_default())
                .collect()
        })
        .collect()
}
