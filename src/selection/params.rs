//! Typed query parameters.
//!
//! Parameter values are edited as text. Untyped parameters are kept as plain
//! strings; typed parameters are deserialized into a structured value first.
//! Text that does not parse yields `None`, and callers omit the parameter.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Declared type of a query parameter, as written in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamType {
    Bool,
    Integer,
    HeaderConstraints,
    PathConstraints,
    /// Any other declared type; parsed as a generic structured value.
    Other(String),
}

impl From<String> for ParamType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "bool" | "boolean" => Self::Bool,
            "int" | "integer" => Self::Integer,
            "HeaderConstraints" => Self::HeaderConstraints,
            "PathConstraints" => Self::PathConstraints,
            _ => Self::Other(s),
        }
    }
}

impl From<ParamType> for String {
    fn from(t: ParamType) -> Self {
        t.as_str().to_string()
    }
}

impl ParamType {
    /// Returns the catalog spelling of the type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bool => "bool",
            Self::Integer => "int",
            Self::HeaderConstraints => "HeaderConstraints",
            Self::PathConstraints => "PathConstraints",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A header-space constraint value: a single value, a number or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Constraint {
    Number(i64),
    Text(String),
    List(Vec<Constraint>),
}

/// Packet header constraints for flow-based questions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeaderConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_ips: Option<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst_ips: Option<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_ports: Option<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst_ports: Option<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_protocols: Option<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applications: Option<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmp_codes: Option<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmp_types: Option<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecns: Option<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dscps: Option<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet_lengths: Option<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragment_offsets: Option<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_flags: Option<Value>,
}

/// Path constraints for flow-based questions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PathConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit_locations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forbidden_locations: Option<String>,
}

/// Parses parameter text according to its declared type.
///
/// Returns `None` for blank text or text that does not match the type.
pub fn parse_param(text: &str, declared: Option<&ParamType>) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    match declared {
        None => Some(Value::String(text.to_string())),
        Some(ParamType::Bool) => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(Value::Bool(true)),
            "false" | "no" => Some(Value::Bool(false)),
            _ => None,
        },
        Some(ParamType::Integer) => trimmed.parse::<i64>().ok().map(Value::from),
        Some(ParamType::HeaderConstraints) => typed::<HeaderConstraints>(trimmed),
        Some(ParamType::PathConstraints) => typed::<PathConstraints>(trimmed),
        Some(ParamType::Other(_)) => structured(trimmed),
    }
}

/// Parses structured text. Accepts JSON and YAML flow syntax, so both
/// `{"dstIps": "8.8.8.8"}` and `{dstIps: 8.8.8.8}` are understood.
fn structured(text: &str) -> Option<Value> {
    serde_yaml::from_str::<Value>(text).ok()
}

fn typed<T>(text: &str) -> Option<Value>
where
    T: for<'de> Deserialize<'de> + Serialize,
{
    let value = structured(text)?;
    let parsed: T = serde_json::from_value(value).ok()?;
    serde_json::to_value(parsed).ok()
}

/// Renders a parameter value back into editable text.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
