//! Query selections.
//!
//! A selection maps query display names to the question they run and the
//! parameter variants the user configured. It is edited through a pure
//! reducer, flattened into invocations for execution, and saved to or loaded
//! from YAML files.

pub mod io;
mod params;
pub mod reducer;
pub mod template;

pub use params::{
    parse_param, value_to_text, Constraint, HeaderConstraints, ParamType, PathConstraints,
};
pub use reducer::{reduce, SelectionAction};
pub use template::{convert_template, Invocation};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::ParamDescriptor;

/// One concrete parameterization of a query.
pub type Variant = IndexMap<String, serde_json::Value>;

/// Ordered mapping from query display name to its selection entry.
pub type Selection = IndexMap<String, SelectionEntry>;

/// A query the user chose to include in the analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionEntry {
    #[serde(default)]
    pub category: String,

    /// Engine identifier of the question.
    #[serde(default)]
    pub fun: String,

    /// Declared parameters, copied from the catalog.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input: Vec<ParamDescriptor>,

    /// Zero variants runs the query once without parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<Variant>,
}

impl SelectionEntry {
    /// Looks up a declared parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParamDescriptor> {
        self.input.iter().find(|p| p.name == name)
    }
}

/// Selection plus the per-category record of which queries were checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    #[serde(default)]
    pub selection: Selection,

    /// Checked query names per category, as of the last edit.
    #[serde(default)]
    pub former: IndexMap<String, Vec<String>>,
}

impl SelectionState {
    /// Creates a state from a selection, deriving the per-category record.
    pub fn from_selection(selection: Selection) -> Self {
        let mut former: IndexMap<String, Vec<String>> = IndexMap::new();
        for (name, entry) in &selection {
            former
                .entry(entry.category.clone())
                .or_default()
                .push(name.clone());
        }
        Self { selection, former }
    }

    /// Names checked in the given category.
    pub fn checked(&self, category: &str) -> &[String] {
        self.former
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    /// Flattens the selection into runnable invocations.
    pub fn invocations(&self) -> Vec<Invocation> {
        convert_template(&self.selection)
    }
}
