//! Query catalog for Bat-Q.
//!
//! The catalog is a YAML file describing question categories and, for each
//! question, its display name, the engine identifier it runs and its
//! parameters. It is loaded once per process and never mutated.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{BatqError, Result};
use crate::selection::{ParamType, Selection, SelectionEntry};

/// On-disk layout of the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(rename = "Batfish", default)]
    pub categories: Vec<CategoryDef>,
}

/// A category as written in the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDef {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<QueryDef>,
}

/// A question as written in the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDef {
    pub name: String,
    pub fun: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub input: Vec<ParamDescriptor>,
}

/// Describes one parameter of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,

    /// Optional unless the catalog says otherwise.
    #[serde(default = "default_optional")]
    pub optional: bool,

    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub param_type: Option<ParamType>,

    /// Default value shown in the input field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

fn default_optional() -> bool {
    true
}

impl ParamDescriptor {
    /// Creates an optional, untyped parameter descriptor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: true,
            param_type: None,
            value: None,
        }
    }

    /// Label for input prompts; mandatory parameters are starred.
    pub fn label(&self) -> String {
        if self.optional {
            self.name.clone()
        } else {
            format!("{}*", self.name)
        }
    }
}

/// A category with the names of its questions, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub description: Option<String>,
    pub queries: Vec<String>,
}

/// A runnable question known to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    pub category: String,
    pub fun: String,
    pub description: Option<String>,
    pub params: Vec<ParamDescriptor>,
}

impl CatalogEntry {
    /// Looks up a declared parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParamDescriptor> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Builds a fresh selection entry with no variants.
    pub fn to_selection_entry(&self) -> SelectionEntry {
        SelectionEntry {
            category: self.category.clone(),
            fun: self.fun.clone(),
            input: self.params.clone(),
            variants: Vec::new(),
        }
    }
}

/// A mismatch between a selection and the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionIssue {
    /// The selection names a query whose identifier the catalog does not know.
    UnknownQuery { query: String, fun: String },
    /// A variant sets a parameter the query does not declare.
    UnknownParam {
        query: String,
        variant: usize,
        param: String,
    },
}

impl fmt::Display for SelectionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownQuery { query, fun } => {
                write!(f, "'{query}' runs unknown question '{fun}'")
            }
            Self::UnknownParam {
                query,
                variant,
                param,
            } => write!(
                f,
                "'{query}' variant {variant} sets undeclared parameter '{param}'"
            ),
        }
    }
}

/// The loaded, immutable question catalog.
#[derive(Debug, Clone, Default)]
pub struct QueryCatalog {
    categories: Vec<Category>,
    entries: IndexMap<String, CatalogEntry>,
}

impl QueryCatalog {
    /// Loads the catalog from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BatqError::catalog(format!(
                "Failed to read question catalog {}: {e}",
                path.display()
            ))
        })?;
        let catalog = Self::from_yaml(&content)?;
        info!(
            "Loaded {} questions in {} categories from {}",
            catalog.len(),
            catalog.categories.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parses the catalog from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(content)
            .map_err(|e| BatqError::catalog(format!("Invalid question catalog: {e}")))?;
        Self::from_file(file)
    }

    /// Indexes a parsed catalog file. Question names must be unique.
    pub fn from_file(file: CatalogFile) -> Result<Self> {
        let mut categories = Vec::with_capacity(file.categories.len());
        let mut entries = IndexMap::new();

        for def in file.categories {
            let mut names = Vec::with_capacity(def.questions.len());
            for q in def.questions {
                if q.name.is_empty() {
                    debug!("Skipping unnamed question in '{}'", def.category);
                    continue;
                }
                if entries.contains_key(&q.name) {
                    return Err(BatqError::catalog(format!(
                        "Duplicate question name '{}'",
                        q.name
                    )));
                }
                names.push(q.name.clone());
                entries.insert(
                    q.name.clone(),
                    CatalogEntry {
                        name: q.name,
                        category: def.category.clone(),
                        fun: q.fun,
                        description: q.description,
                        params: q.input,
                    },
                );
            }
            categories.push(Category {
                name: def.category,
                description: def.description,
                queries: names,
            });
        }

        Ok(Self {
            categories,
            entries,
        })
    }

    /// Categories in catalog order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Looks up a category by name.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Looks up a question by display name.
    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    /// Looks up the first question running the given engine identifier.
    pub fn entry_by_fun(&self, fun: &str) -> Option<&CatalogEntry> {
        self.entries.values().find(|e| e.fun == fun)
    }

    /// All questions in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks a selection against the catalog.
    ///
    /// Parameters are checked against the entry's own declared inputs when it
    /// carries them, otherwise against the catalog's.
    pub fn validate(&self, selection: &Selection) -> Vec<SelectionIssue> {
        let mut issues = Vec::new();

        for (query, entry) in selection {
            let known = self.entry_by_fun(&entry.fun);
            if known.is_none() {
                issues.push(SelectionIssue::UnknownQuery {
                    query: query.clone(),
                    fun: entry.fun.clone(),
                });
            }

            let declared: &[ParamDescriptor] = if entry.input.is_empty() {
                known.map(|k| k.params.as_slice()).unwrap_or_default()
            } else {
                &entry.input
            };

            for (idx, variant) in entry.variants.iter().enumerate() {
                for param in variant.keys() {
                    if !declared.iter().any(|d| &d.name == param) {
                        issues.push(SelectionIssue::UnknownParam {
                            query: query.clone(),
                            variant: idx,
                            param: param.clone(),
                        });
                    }
                }
            }
        }

        issues
    }
}
