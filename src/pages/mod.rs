//! Page handlers.
//!
//! Each page of the dashboard is an async function that receives the page
//! context and the session explicitly and returns a [`Page`]. Handlers never
//! fail: errors become inline outputs, or a blocked page when the engine
//! cannot be reached.

pub mod analysis;
pub mod differential;
pub mod failure;
pub mod home;
mod output;
pub mod questions;

pub use output::{Page, PageOutput, TableOutput, Tab};

use tracing::debug;

use crate::catalog::QueryCatalog;
use crate::config::ServerConfig;
use crate::engine::{
    run_invocations, AnalysisClient, QueryRegistry, TabResult, Target,
};
use crate::error::Result;
use crate::probe::{probe, ProbeOutcome};
use crate::session::SessionContext;

pub const NO_SNAPSHOT: &str = "Please select a snapshot to continue.";
pub const NO_SELECTION: &str = "Select some questions to proceed.";

/// Everything a page needs besides the session.
pub struct PageContext<'a> {
    pub client: &'a dyn AnalysisClient,
    pub catalog: &'a QueryCatalog,
    pub server: &'a ServerConfig,

    /// Skips the reachability probe, for engines that are not on the network.
    pub skip_probe: bool,
}

impl<'a> PageContext<'a> {
    pub fn new(
        client: &'a dyn AnalysisClient,
        catalog: &'a QueryCatalog,
        server: &'a ServerConfig,
    ) -> Self {
        Self {
            client,
            catalog,
            server,
            skip_probe: false,
        }
    }

    pub fn without_probe(mut self) -> Self {
        self.skip_probe = true;
        self
    }

    /// Probes the engine host.
    pub async fn probe(&self) -> ProbeOutcome {
        probe(
            self.server.host(),
            self.server.probe_port,
            self.server.probe_timeout(),
        )
        .await
    }

    /// Fails with a connection error if the engine cannot be reached.
    pub async fn check_engine(&self) -> Result<()> {
        if self.skip_probe {
            debug!("Skipping reachability probe");
            return Ok(());
        }
        self.probe().await.into_result()
    }

    /// Runs the session's selection against `target`.
    pub async fn run_selection(
        &self,
        session: &SessionContext,
        target: &Target,
    ) -> Result<Vec<TabResult>> {
        let registry = QueryRegistry::discover(self.client).await?;
        let invocations = session.selection.invocations();
        Ok(run_invocations(self.client, &registry, &invocations, target).await)
    }
}

/// Page reporting only the reachability of the engine.
pub async fn engine_status(ctx: &PageContext<'_>) -> Page {
    let title = "Engine";
    let host = format!("Batfish host: {}", ctx.server.display_string());
    if ctx.skip_probe {
        let mut page = Page::new(title);
        page.push(PageOutput::info(host));
        page.push(PageOutput::info("Using the in-memory mock engine"));
        return page;
    }

    let outcome = ctx.probe().await;
    if outcome.is_reachable() {
        let mut page = Page::new(title);
        page.push(PageOutput::info(host));
        page.push(PageOutput::info(outcome.message));
        page
    } else {
        let mut page = Page::blocked(title, outcome.message);
        page.outputs.insert(0, PageOutput::info(host));
        page
    }
}
