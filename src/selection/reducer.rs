//! Selection editing as a pure reducer.
//!
//! Every user interaction on the selection page is an action applied to the
//! prior state, producing a new state. The reducer never fails: actions that
//! target unknown queries, undeclared parameters or missing variants leave the
//! state unchanged.

use indexmap::IndexSet;
use tracing::debug;

use super::{parse_param, value_to_text, ParamType, Selection, SelectionState, Variant};
use crate::catalog::QueryCatalog;

/// A user interaction on the selection page.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionAction {
    /// The checked queries of one category changed.
    SetCategory {
        category: String,
        checked: Vec<String>,
    },
    /// A parameter field of one variant was edited.
    SetParam {
        query: String,
        param: String,
        variant: usize,
        text: String,
    },
    /// Append a copy of the last variant.
    CloneVariant { query: String },
    /// Drop one variant.
    RemoveVariant { query: String, variant: usize },
    /// Replace everything with a loaded selection.
    Import(Selection),
    /// Drop everything.
    Clear,
}

/// Applies an action to the prior state.
pub fn reduce(
    prior: &SelectionState,
    action: SelectionAction,
    catalog: &QueryCatalog,
) -> SelectionState {
    match action {
        SelectionAction::SetCategory { category, checked } => {
            set_category(prior, &category, &checked, catalog)
        }
        SelectionAction::SetParam {
            query,
            param,
            variant,
            text,
        } => set_param(prior, &query, &param, variant, &text, catalog),
        SelectionAction::CloneVariant { query } => clone_variant(prior, &query, catalog),
        SelectionAction::RemoveVariant { query, variant } => {
            let mut next = prior.clone();
            match next.selection.get_mut(&query) {
                Some(entry) if variant < entry.variants.len() => {
                    entry.variants.remove(variant);
                }
                _ => debug!("No variant {variant} of '{query}' to remove"),
            }
            next
        }
        SelectionAction::Import(selection) => SelectionState::from_selection(selection),
        SelectionAction::Clear => SelectionState::default(),
    }
}

fn set_category(
    prior: &SelectionState,
    category: &str,
    checked: &[String],
    catalog: &QueryCatalog,
) -> SelectionState {
    let Some(edited) = catalog.category(category) else {
        debug!("Ignoring edit of unknown category '{category}'");
        return prior.clone();
    };

    // Widgets only offer the category's own questions.
    let checked: Vec<String> = checked
        .iter()
        .filter(|name| edited.queries.contains(*name))
        .cloned()
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect();

    let mut selection = Selection::new();
    for cat in catalog.categories() {
        if cat.name == category {
            for name in &checked {
                let entry = match prior.selection.get(name) {
                    Some(existing) => existing.clone(),
                    None => match catalog.entry(name) {
                        Some(known) => known.to_selection_entry(),
                        None => continue,
                    },
                };
                selection.insert(name.clone(), entry);
            }
        } else {
            for (name, entry) in &prior.selection {
                if entry.category == cat.name {
                    selection.insert(name.clone(), entry.clone());
                }
            }
        }
    }

    // Entries from categories the catalog does not know stay at the end.
    for (name, entry) in &prior.selection {
        if catalog.category(&entry.category).is_none() {
            selection.insert(name.clone(), entry.clone());
        }
    }

    let mut former = prior.former.clone();
    former.insert(category.to_string(), checked);

    SelectionState { selection, former }
}

/// Declared type of a parameter, if the parameter is declared at all.
fn declared_type(
    state: &SelectionState,
    query: &str,
    param: &str,
    catalog: &QueryCatalog,
) -> Option<Option<ParamType>> {
    let entry = state.selection.get(query)?;
    if let Some(desc) = entry.param(param) {
        return Some(desc.param_type.clone());
    }
    catalog
        .entry(query)
        .and_then(|known| known.param(param))
        .map(|desc| desc.param_type.clone())
}

fn set_param(
    prior: &SelectionState,
    query: &str,
    param: &str,
    variant: usize,
    text: &str,
    catalog: &QueryCatalog,
) -> SelectionState {
    let Some(declared) = declared_type(prior, query, param, catalog) else {
        debug!("Ignoring edit of undeclared parameter '{param}' of '{query}'");
        return prior.clone();
    };

    let mut next = prior.clone();
    let Some(entry) = next.selection.get_mut(query) else {
        return next;
    };

    if variant > entry.variants.len() {
        debug!("Variant {variant} of '{query}' does not exist");
        return prior.clone();
    }

    let parsed = parse_param(text, declared.as_ref());
    if parsed.is_none() && !text.trim().is_empty() {
        debug!(
            "Dropping '{param}' of '{query}' variant {variant}: not a valid {}",
            declared
                .as_ref()
                .map(ParamType::as_str)
                .unwrap_or("value")
        );
    }

    match (parsed, entry.variants.get_mut(variant)) {
        (Some(value), Some(target)) => {
            target.insert(param.to_string(), value);
        }
        (Some(value), None) => {
            // Only a parsed value opens the next variant.
            entry
                .variants
                .push(Variant::from([(param.to_string(), value)]));
        }
        (None, Some(target)) => {
            target.shift_remove(param);
        }
        (None, None) => return prior.clone(),
    }

    next
}

fn clone_variant(prior: &SelectionState, query: &str, catalog: &QueryCatalog) -> SelectionState {
    let mut next = prior.clone();
    let Some(entry) = next.selection.get(query) else {
        debug!("Cannot clone variant of unselected query '{query}'");
        return next;
    };

    // Re-collect the previous variant's text through the declared types.
    let mut seeded = Variant::new();
    if let Some(last) = entry.variants.last() {
        for (param, value) in last {
            let parsed = match declared_type(prior, query, param, catalog) {
                Some(declared) => parse_param(&value_to_text(value), declared.as_ref()),
                None => Some(value.clone()),
            };
            if let Some(parsed) = parsed {
                seeded.insert(param.clone(), parsed);
            }
        }
    }

    if let Some(entry) = next.selection.get_mut(query) {
        entry.variants.push(seeded);
    }
    next
}
