//! Saving and loading selections as YAML.
//!
//! The file layout is `questions: {<name>: {category, fun, input, variants}}`,
//! the same shape the template converter consumes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::Selection;
use crate::error::{BatqError, Result};

#[derive(Debug, Default, Serialize, Deserialize)]
struct SelectionFile {
    #[serde(default)]
    questions: Option<Selection>,
}

/// Serializes a selection to YAML.
pub fn to_yaml(selection: &Selection) -> Result<String> {
    let file = SelectionFile {
        questions: Some(selection.clone()),
    };
    serde_yaml::to_string(&file)
        .map_err(|e| BatqError::selection(format!("Failed to serialize selection: {e}")))
}

/// Parses a selection from YAML. An empty `questions` key is an empty selection.
pub fn from_yaml(content: &str) -> Result<Selection> {
    let file: SelectionFile = serde_yaml::from_str(content)
        .map_err(|e| BatqError::selection(format!("Not a valid selection file: {e}")))?;
    Ok(file.questions.unwrap_or_default())
}

/// Writes a selection to a YAML file.
pub fn export_to_file(selection: &Selection, path: &Path) -> Result<()> {
    let yaml = to_yaml(selection)?;
    std::fs::write(path, yaml).map_err(|e| {
        BatqError::selection(format!("Failed to write {}: {e}", path.display()))
    })?;
    info!("Saved {} selected questions to {}", selection.len(), path.display());
    Ok(())
}

/// Reads a selection from a YAML file.
pub fn import_from_file(path: &Path) -> Result<Selection> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BatqError::selection(format!("Failed to read {}: {e}", path.display()))
    })?;
    let selection = from_yaml(&content)?;
    info!("Loaded {} selected questions from {}", selection.len(), path.display());
    Ok(selection)
}
