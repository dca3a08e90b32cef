//! Registry of the questions the engine offers.
//!
//! Built once from `AnalysisClient::list_questions` and consulted before every
//! invocation, so a catalog entry naming a question the engine lacks fails
//! with a clear error instead of an opaque engine response.

use indexmap::IndexMap;
use tracing::debug;

use super::{AnalysisClient, Answer, QuestionInfo, Target};
use crate::error::{BatqError, Result};
use crate::selection::Variant;

/// A question known to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredQuery {
    pub name: String,
    pub description: String,
}

impl RegisteredQuery {
    /// Runs this question through the given client.
    pub async fn invoke(
        &self,
        client: &dyn AnalysisClient,
        params: Option<&Variant>,
        target: &Target,
    ) -> Result<Answer> {
        client.run_query(&self.name, params, target).await
    }
}

/// Questions offered by the engine, keyed by callable identifier.
#[derive(Debug, Clone, Default)]
pub struct QueryRegistry {
    queries: IndexMap<String, RegisteredQuery>,
}

impl QueryRegistry {
    pub fn new(questions: Vec<QuestionInfo>) -> Self {
        let queries = questions
            .into_iter()
            .map(|q| {
                (
                    q.name.clone(),
                    RegisteredQuery {
                        name: q.name,
                        description: q.description,
                    },
                )
            })
            .collect();
        Self { queries }
    }

    /// Builds the registry from the engine's question list.
    pub async fn discover(client: &dyn AnalysisClient) -> Result<Self> {
        let questions = client.list_questions().await?;
        debug!("Engine offers {} questions", questions.len());
        Ok(Self::new(questions))
    }

    pub fn resolve(&self, fun: &str) -> Result<&RegisteredQuery> {
        self.queries
            .get(fun)
            .ok_or_else(|| BatqError::query(format!("Unknown question '{fun}'")))
    }

    pub fn contains(&self, fun: &str) -> bool {
        self.queries.contains_key(fun)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}
