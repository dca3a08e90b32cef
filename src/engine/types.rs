//! Answer and request types exchanged with the analysis engine.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of an answer, keyed by column name.
pub type Row = IndexMap<String, Value>;

/// Metadata about a column in an answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,

    /// Engine-side schema name (e.g. `Node`, `List<Trace>`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
        }
    }

    pub fn with_schema(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: Some(schema.into()),
        }
    }
}

/// Tabular answer to a question. Cells may hold nested structures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Answer {
    pub fn new(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Builds an answer whose columns are taken from the first row.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.keys().map(ColumnInfo::new).collect())
            .unwrap_or_default();
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in display order.
    ///
    /// Falls back to the keys of the first row when the engine sent no
    /// column metadata.
    pub fn column_names(&self) -> Vec<String> {
        if !self.columns.is_empty() {
            return self.columns.iter().map(|c| c.name.clone()).collect();
        }
        self.rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Values of one column, with missing cells as null.
    pub fn column_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows
            .iter()
            .map(move |row| row.get(name).unwrap_or(&Value::Null))
    }
}

/// Formats a cell for display. Null is blank; nested values are compact JSON.
pub fn display_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// An interface on a node, written `host[interface]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceRef {
    pub hostname: String,
    pub interface: String,
}

impl InterfaceRef {
    pub fn new(hostname: impl Into<String>, interface: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            interface: interface.into(),
        }
    }

    /// Parses `host[interface]`. Returns `None` for anything else.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (hostname, rest) = text.split_once('[')?;
        let interface = rest.strip_suffix(']')?;
        if hostname.is_empty() || interface.is_empty() {
            return None;
        }
        Some(Self::new(hostname, interface))
    }

    /// Reads an engine `Interface` cell: either an object with `hostname`
    /// and `interface` keys, or the `host[interface]` string form.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Object(map) => {
                let hostname = map.get("hostname")?.as_str()?;
                let interface = map.get("interface")?.as_str()?;
                Some(Self::new(hostname, interface))
            }
            _ => None,
        }
    }
}

impl fmt::Display for InterfaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.hostname, self.interface)
    }
}

/// Request to derive a new snapshot with nodes or interfaces deactivated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkRequest {
    pub snapshot_base: String,
    pub snapshot_new: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deactivate_nodes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deactivate_interfaces: Vec<InterfaceRef>,
    #[serde(default)]
    pub overwrite: bool,
}

/// A question the engine offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl QuestionInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }
}
