//! Sequential execution of invocations.
//!
//! Runs each invocation in converter order and keeps its outcome, so one
//! failing query only affects its own tab.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::{AnalysisClient, Answer, QueryRegistry, Target};
use crate::error::Result;
use crate::selection::Invocation;

/// Outcome of one invocation, shown as one results tab.
#[derive(Debug)]
pub struct TabResult {
    pub name: String,
    pub fun: String,
    pub outcome: Result<Answer>,
    pub execution_time: Duration,
}

impl TabResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Runs the invocations one after another against `target`.
pub async fn run_invocations(
    client: &dyn AnalysisClient,
    registry: &QueryRegistry,
    invocations: &[Invocation],
    target: &Target,
) -> Vec<TabResult> {
    let mut results = Vec::with_capacity(invocations.len());

    for invocation in invocations {
        let start = Instant::now();
        let outcome = match registry.resolve(&invocation.fun) {
            Ok(query) => {
                query
                    .invoke(client, invocation.options.as_ref(), target)
                    .await
            }
            Err(e) => Err(e),
        };
        let execution_time = start.elapsed();

        match &outcome {
            Ok(answer) => info!(
                "{} returned {} rows in {:?}",
                invocation.name,
                answer.rows.len(),
                execution_time
            ),
            Err(e) => warn!("{} failed: {e}", invocation.name),
        }

        results.push(TabResult {
            name: invocation.name.clone(),
            fun: invocation.fun.clone(),
            outcome,
            execution_time,
        });
    }

    results
}
