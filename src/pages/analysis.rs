//! Analysis page: runs the selection against the active snapshot.

use super::{Page, PageContext, PageOutput, NO_SELECTION, NO_SNAPSHOT};
use crate::engine::Target;
use crate::present::present_results;
use crate::session::SessionContext;

const TITLE: &str = "Analysis";

pub async fn analysis(ctx: &PageContext<'_>, session: &SessionContext) -> Page {
    if let Err(e) = ctx.check_engine().await {
        return Page::blocked(TITLE, e.to_string());
    }

    let mut page = Page::new(TITLE);
    let Some(active) = session.active_name() else {
        page.push(PageOutput::warning(NO_SNAPSHOT));
        return page;
    };
    if session.selection.is_empty() {
        page.push(PageOutput::warning(NO_SELECTION));
        return page;
    }

    page.push(PageOutput::info(format!("Active snapshot: {active}")));
    match ctx.run_selection(session, &Target::snapshot(active)).await {
        Ok(results) => page.push(present_results(&results)),
        Err(e) => page.push(PageOutput::error(e.to_string())),
    }
    page
}
