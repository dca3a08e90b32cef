//! Questions page: browsing the catalog and editing the selection.

use std::path::{Path, PathBuf};

use super::{Page, PageContext, PageOutput};
use crate::selection::{io, value_to_text, SelectionAction, Variant};
use crate::session::SessionContext;

const TITLE: &str = "Questions";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum QuestionsAction {
    /// List the catalog with the current selection marked.
    #[default]
    List,
    /// Show the selection and the invocations it expands to.
    Show,
    /// Edit the selection.
    Apply(SelectionAction),
    Export(PathBuf),
    Import(PathBuf),
}

fn catalog_outputs(ctx: &PageContext<'_>, session: &SessionContext) -> Vec<PageOutput> {
    let mut outputs = Vec::new();
    if ctx.catalog.is_empty() {
        outputs.push(PageOutput::warning("The question catalog is empty."));
        return outputs;
    }

    for category in ctx.catalog.categories() {
        outputs.push(PageOutput::header(category.name.clone()));
        if let Some(description) = &category.description {
            outputs.push(PageOutput::info(description.trim().to_string()));
        }

        let checked = session.selection.checked(&category.name);
        let rows = category
            .queries
            .iter()
            .filter_map(|name| ctx.catalog.entry(name))
            .map(|entry| {
                let marker = if checked.contains(&entry.name) { "x" } else { "" };
                let params = entry
                    .params
                    .iter()
                    .map(|p| p.label())
                    .collect::<Vec<_>>()
                    .join(", ");
                vec![
                    marker.to_string(),
                    entry.name.clone(),
                    entry.fun.clone(),
                    params,
                ]
            })
            .collect();
        outputs.push(PageOutput::table(
            vec![
                "Selected".to_string(),
                "Question".to_string(),
                "Function".to_string(),
                "Parameters".to_string(),
            ],
            rows,
        ));
    }
    outputs
}

fn variant_text(variant: &Variant) -> String {
    variant
        .iter()
        .map(|(k, v)| format!("{k}={}", value_to_text(v)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn selection_outputs(session: &SessionContext) -> Vec<PageOutput> {
    if session.selection.is_empty() {
        return vec![PageOutput::info("No questions selected.")];
    }

    let mut rows = Vec::new();
    for (name, entry) in &session.selection.selection {
        if entry.variants.is_empty() {
            rows.push(vec![
                name.clone(),
                entry.category.clone(),
                entry.fun.clone(),
                String::new(),
                String::new(),
            ]);
        }
        for (idx, variant) in entry.variants.iter().enumerate() {
            rows.push(vec![
                name.clone(),
                entry.category.clone(),
                entry.fun.clone(),
                idx.to_string(),
                variant_text(variant),
            ]);
        }
    }

    let invocations = session
        .selection
        .invocations()
        .into_iter()
        .map(|inv| {
            let options = inv
                .options
                .as_ref()
                .and_then(|o| serde_json::to_string(o).ok())
                .unwrap_or_default();
            vec![inv.name, inv.fun, options]
        })
        .collect();

    vec![
        PageOutput::header("Selected questions"),
        PageOutput::table(
            vec![
                "Question".to_string(),
                "Category".to_string(),
                "Function".to_string(),
                "Variant".to_string(),
                "Parameters".to_string(),
            ],
            rows,
        ),
        PageOutput::header("Invocations"),
        PageOutput::table(
            vec!["Tab".to_string(), "Function".to_string(), "Options".to_string()],
            invocations,
        ),
    ]
}

fn import(ctx: &PageContext<'_>, session: &mut SessionContext, path: &Path) -> Vec<PageOutput> {
    let selection = match io::import_from_file(path) {
        Ok(selection) => selection,
        Err(e) => return vec![PageOutput::error(e.to_string())],
    };

    let mut outputs: Vec<PageOutput> = ctx
        .catalog
        .validate(&selection)
        .into_iter()
        .map(|issue| PageOutput::warning(issue.to_string()))
        .collect();
    let count = selection.len();
    session.apply(SelectionAction::Import(selection), ctx.catalog);
    outputs.push(PageOutput::info(format!(
        "Loaded {count} questions from {}",
        path.display()
    )));
    outputs
}

/// Renders the questions page after applying `action`.
pub fn questions(ctx: &PageContext<'_>, session: &mut SessionContext, action: QuestionsAction) -> Page {
    let mut page = Page::new(TITLE);

    match action {
        QuestionsAction::List => {
            page.extend(catalog_outputs(ctx, session));
        }
        QuestionsAction::Show => {
            page.extend(selection_outputs(session));
        }
        QuestionsAction::Apply(action) => {
            let before = session.selection.clone();
            session.apply(action, ctx.catalog);
            if session.selection == before {
                page.push(PageOutput::warning("Nothing changed."));
            }
            page.extend(selection_outputs(session));
        }
        QuestionsAction::Export(path) => {
            match io::export_to_file(&session.selection.selection, &path) {
                Ok(()) => page.push(PageOutput::info(format!(
                    "Saved {} questions to {}",
                    session.selection.selection.len(),
                    path.display()
                ))),
                Err(e) => page.push(PageOutput::error(e.to_string())),
            }
        }
        QuestionsAction::Import(path) => {
            page.extend(import(ctx, session, &path));
            page.extend(selection_outputs(session));
        }
    }

    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::SAMPLE;
    use crate::catalog::QueryCatalog;
    use crate::config::ServerConfig;
    use crate::engine::MockAnalysisClient;
    use pretty_assertions::assert_eq;

    fn check(category: &str, names: &[&str]) -> QuestionsAction {
        QuestionsAction::Apply(SelectionAction::SetCategory {
            category: category.to_string(),
            checked: names.iter().map(|n| n.to_string()).collect(),
        })
    }

    #[test]
    fn test_list_marks_selected_questions() {
        let client = MockAnalysisClient::new();
        let catalog = QueryCatalog::from_yaml(SAMPLE).unwrap();
        let server = ServerConfig::default();
        let ctx = PageContext::new(&client, &catalog, &server);
        let mut session = SessionContext::default();

        questions(&ctx, &mut session, check("Routing and Forwarding Tables", &["Routes"]));
        let page = questions(&ctx, &mut session, QuestionsAction::List);

        let routing = page
            .outputs
            .iter()
            .find_map(|o| match o {
                PageOutput::Table(t) if t.rows.iter().any(|r| r[1] == "Routes") => Some(t),
                _ => None,
            })
            .unwrap();
        assert_eq!(routing.rows[0][0], "x");
        assert_eq!(routing.rows[0][3], "nodes, network, rib*");
    }

    #[test]
    fn test_apply_without_effect_warns() {
        let client = MockAnalysisClient::new();
        let catalog = QueryCatalog::from_yaml(SAMPLE).unwrap();
        let server = ServerConfig::default();
        let ctx = PageContext::new(&client, &catalog, &server);
        let mut session = SessionContext::default();

        let page = questions(
            &ctx,
            &mut session,
            QuestionsAction::Apply(SelectionAction::CloneVariant {
                query: "Unknown".into(),
            }),
        );
        assert_eq!(page.outputs[0], PageOutput::warning("Nothing changed."));
    }

    #[test]
    fn test_export_then_import() {
        let client = MockAnalysisClient::new();
        let catalog = QueryCatalog::from_yaml(SAMPLE).unwrap();
        let server = ServerConfig::default();
        let ctx = PageContext::new(&client, &catalog, &server);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selection.yaml");

        let mut session = SessionContext::default();
        questions(&ctx, &mut session, check("Packet Forwarding", &["Traceroute"]));
        questions(
            &ctx,
            &mut session,
            QuestionsAction::Apply(SelectionAction::SetParam {
                query: "Traceroute".into(),
                param: "startLocation".into(),
                variant: 0,
                text: "as2core1".into(),
            }),
        );
        let page = questions(&ctx, &mut session, QuestionsAction::Export(path.clone()));
        assert!(!page.has_errors());

        let mut restored = SessionContext::default();
        let page = questions(&ctx, &mut restored, QuestionsAction::Import(path));
        assert!(!page.has_errors());
        assert_eq!(restored.selection, session.selection);
    }
}
