//! Differential page: compares the alternate snapshot against the active one.

use super::{Page, PageContext, PageOutput, NO_SELECTION};
use crate::engine::Target;
use crate::present::present_results;
use crate::session::SessionContext;

const TITLE: &str = "Differential";

pub const NO_PAIR: &str =
    "Select two different snapshots: the active one as reference and an alternate one.";

pub async fn differential(ctx: &PageContext<'_>, session: &SessionContext) -> Page {
    if let Err(e) = ctx.check_engine().await {
        return Page::blocked(TITLE, e.to_string());
    }

    let mut page = Page::new(TITLE);
    let Some((reference, snapshot)) = session.comparison_pair() else {
        page.push(PageOutput::warning(NO_PAIR));
        return page;
    };
    if session.selection.is_empty() {
        page.push(PageOutput::warning(NO_SELECTION));
        return page;
    }

    page.push(PageOutput::info(format!(
        "Comparing {snapshot} against reference {reference}"
    )));
    let target = Target::compare(snapshot, reference);
    match ctx.run_selection(session, &target).await {
        Ok(results) => page.push(present_results(&results)),
        Err(e) => page.push(PageOutput::error(e.to_string())),
    }
    page
}
