//! Selection-to-invocation conversion.

use serde::{Deserialize, Serialize};

use super::{Selection, Variant};

/// A ready-to-run question: display name, engine identifier and parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub name: String,
    pub fun: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Variant>,
}

/// Tab name of the `idx`-th variant of a query.
pub fn variant_name(query: &str, idx: usize) -> String {
    if idx == 0 {
        query.to_string()
    } else {
        format!("{query}_{idx}")
    }
}

/// Expands a selection into invocations, one per variant.
///
/// Entries without variants yield a single invocation without options.
/// Order follows the selection, then each entry's variants. Nothing is
/// validated here.
pub fn convert_template(selection: &Selection) -> Vec<Invocation> {
    let mut output = Vec::with_capacity(selection.len());

    for (query, entry) in selection {
        if entry.variants.is_empty() {
            output.push(Invocation {
                name: query.clone(),
                fun: entry.fun.clone(),
                options: None,
            });
            continue;
        }

        for (idx, variant) in entry.variants.iter().enumerate() {
            output.push(Invocation {
                name: variant_name(query, idx),
                fun: entry.fun.clone(),
                options: Some(variant.clone()),
            });
        }
    }

    output
}
