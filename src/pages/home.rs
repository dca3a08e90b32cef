//! Home page: engine status and snapshot management.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{Page, PageContext, PageOutput};
use crate::session::SessionContext;

const TITLE: &str = "Home";

/// What the user asked the home page to do before listing snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HomeAction {
    #[default]
    Show,
    /// Upload a zipped snapshot and make it active.
    Upload(PathBuf),
    /// Make a loaded snapshot the active one.
    Select(String),
    /// Make a loaded snapshot the alternate one, used for comparisons.
    Alternate(String),
    Delete(String),
}

/// Snapshot name for an uploaded file: the file name up to its first dot.
pub fn snapshot_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_string_lossy();
    let name = file_name.split('.').next().unwrap_or_default();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn upload(ctx: &PageContext<'_>, session: &mut SessionContext, path: &Path) -> PageOutput {
    let file = display_file_name(path);
    let not_recognized = || PageOutput::error(format!("File {file} is not recognized!"));

    let Some(name) = snapshot_name(path) else {
        return not_recognized();
    };
    let archive = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            return PageOutput::error(format!("Failed to read {}: {e}", path.display()));
        }
    };

    match ctx.client.init_snapshot(archive, &name).await {
        Ok(()) => {
            info!("Uploaded snapshot '{name}' from {}", path.display());
            session.replace_active(&name);
            PageOutput::info(format!("Snapshot {name} loaded"))
        }
        Err(e) => {
            debug!("Upload of {} failed: {e}", path.display());
            not_recognized()
        }
    }
}

fn contains(snapshots: &[String], name: &str) -> bool {
    snapshots.iter().any(|s| s == name)
}

async fn apply(
    ctx: &PageContext<'_>,
    session: &mut SessionContext,
    action: &HomeAction,
    snapshots: &mut Vec<String>,
) -> Option<PageOutput> {
    match action {
        HomeAction::Show | HomeAction::Upload(_) => None,
        HomeAction::Select(name) if contains(snapshots, name) => session
            .select_active(name)
            .then(|| PageOutput::info(format!("Snapshot {name} selected"))),
        HomeAction::Alternate(name) if contains(snapshots, name) => {
            session.select_alternate(name);
            Some(PageOutput::info(format!("Alternate snapshot {name} selected")))
        }
        HomeAction::Delete(name) if contains(snapshots, name) => {
            match ctx.client.delete_snapshot(name).await {
                Ok(()) => {
                    session.forget_snapshot(name);
                    snapshots.retain(|s| s != name);
                    Some(PageOutput::info(format!("Snapshot {name} deleted")))
                }
                Err(e) => Some(PageOutput::error(e.to_string())),
            }
        }
        HomeAction::Select(name) | HomeAction::Alternate(name) | HomeAction::Delete(name) => {
            Some(PageOutput::error(format!("Snapshot '{name}' not found")))
        }
    }
}

/// Drops stale references and selects the first snapshot when none is active.
fn reconcile(session: &mut SessionContext, snapshots: &[String]) {
    let listed = |name: Option<&str>| name.is_some_and(|n| contains(snapshots, n));

    if !listed(session.alternate_name()) {
        session.alternate = None;
    }
    if !listed(session.active_name()) {
        session.active = None;
        if let Some(first) = snapshots.first() {
            session.select_active(first);
        }
    }
}

fn snapshot_table(session: &SessionContext, snapshots: &[String]) -> PageOutput {
    let rows = snapshots
        .iter()
        .map(|name| {
            let mut roles = Vec::new();
            if session.active_name() == Some(name.as_str()) {
                roles.push("active");
            }
            if session.alternate_name() == Some(name.as_str()) {
                roles.push("alternate");
            }
            vec![name.clone(), roles.join(", ")]
        })
        .collect();
    PageOutput::table(vec!["Snapshot".to_string(), "Role".to_string()], rows)
}

/// Renders the home page after applying `action`.
pub async fn home(ctx: &PageContext<'_>, session: &mut SessionContext, action: HomeAction) -> Page {
    if let Err(e) = ctx.check_engine().await {
        return Page::blocked(TITLE, e.to_string());
    }

    let mut page = Page::new(TITLE);
    page.push(PageOutput::info(format!(
        "Batfish host: {}",
        ctx.server.display_string()
    )));

    if let HomeAction::Upload(path) = &action {
        page.push(upload(ctx, session, path).await);
    }

    let mut snapshots = match ctx.client.list_snapshots().await {
        Ok(snapshots) => snapshots,
        Err(e) => {
            page.push(PageOutput::error(e.to_string()));
            return page;
        }
    };

    if let Some(output) = apply(ctx, session, &action, &mut snapshots).await {
        page.push(output);
    }

    reconcile(session, &snapshots);

    if snapshots.is_empty() {
        page.push(PageOutput::info(
            "No snapshots loaded. Upload a zipped snapshot to start.",
        ));
        return page;
    }

    page.push(PageOutput::header("Snapshots"));
    page.push(snapshot_table(session, &snapshots));
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QueryCatalog;
    use crate::config::ServerConfig;
    use crate::engine::MockAnalysisClient;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snapshot_name() {
        assert_eq!(
            snapshot_name(Path::new("/tmp/net1.zip")).as_deref(),
            Some("net1")
        );
        assert_eq!(
            snapshot_name(Path::new("lab.v2.zip")).as_deref(),
            Some("lab")
        );
        assert_eq!(snapshot_name(Path::new(".zip")), None);
    }

    #[test]
    fn test_reconcile_selects_first_snapshot() {
        let mut session = SessionContext::default();
        session.select_active("gone");
        session.select_alternate("gone");

        reconcile(&mut session, &["base".to_string(), "changed".to_string()]);
        assert_eq!(session.active_name(), Some("base"));
        assert!(session.alternate.is_none());
    }

    #[tokio::test]
    async fn test_delete_active_snapshot_moves_to_next() {
        let client = MockAnalysisClient::new();
        let catalog = QueryCatalog::default();
        let server = ServerConfig::default();
        let ctx = PageContext::new(&client, &catalog, &server).without_probe();
        let mut session = SessionContext::default();
        session.select_active("base");

        let page = home(&ctx, &mut session, HomeAction::Delete("base".into())).await;
        assert!(page
            .outputs
            .contains(&PageOutput::info("Snapshot base deleted")));
        assert_eq!(session.active_name(), Some("changed"));
    }

    #[tokio::test]
    async fn test_reupload_of_active_snapshot_drops_failures() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("base.zip");
        std::fs::write(&archive, b"PK\x03\x04rest-of-archive").unwrap();

        let client = MockAnalysisClient::new();
        let catalog = QueryCatalog::default();
        let server = ServerConfig::default();
        let ctx = PageContext::new(&client, &catalog, &server).without_probe();
        let mut session = SessionContext::default();
        session.select_active("base");
        session.set_failures(vec!["as2core1".into()], vec![]);

        let page = home(&ctx, &mut session, HomeAction::Upload(archive)).await;
        assert!(page
            .outputs
            .contains(&PageOutput::info("Snapshot base loaded")));
        assert_eq!(session.active_name(), Some("base"));
        assert!(!session.active.as_ref().unwrap().has_failures());
    }

    #[tokio::test]
    async fn test_select_unknown_snapshot() {
        let client = MockAnalysisClient::new();
        let catalog = QueryCatalog::default();
        let server = ServerConfig::default();
        let ctx = PageContext::new(&client, &catalog, &server).without_probe();
        let mut session = SessionContext::default();

        let page = home(&ctx, &mut session, HomeAction::Select("nope".into())).await;
        assert!(page
            .outputs
            .contains(&PageOutput::error("Snapshot 'nope' not found")));
        assert_eq!(session.active_name(), Some("base"));
    }
}
