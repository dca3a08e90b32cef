//! Analysis engine abstraction layer for Bat-Q.
//!
//! Provides a trait-based interface to the network analysis service, allowing
//! the HTTP client and the in-memory mock to be used interchangeably.

mod batfish;
mod mock;
mod registry;
pub mod runner;
mod types;

pub use batfish::BatfishClient;
pub use mock::{FailingAnalysisClient, MockAnalysisClient};
pub use registry::{QueryRegistry, RegisteredQuery};
pub use runner::{run_invocations, TabResult};
pub use types::{
    display_cell, Answer, ColumnInfo, ForkRequest, InterfaceRef, QuestionInfo, Row,
};

use std::fmt;

use async_trait::async_trait;

use crate::config::ServerConfig;
use crate::error::Result;
use crate::selection::Variant;

/// What a query runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Snapshot(String),
    /// `snapshot` is compared against `reference`.
    Compare { snapshot: String, reference: String },
}

impl Target {
    pub fn snapshot(name: impl Into<String>) -> Self {
        Self::Snapshot(name.into())
    }

    pub fn compare(snapshot: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::Compare {
            snapshot: snapshot.into(),
            reference: reference.into(),
        }
    }

    pub fn snapshot_name(&self) -> &str {
        match self {
            Self::Snapshot(name) => name,
            Self::Compare { snapshot, .. } => snapshot,
        }
    }

    pub fn reference_name(&self) -> Option<&str> {
        match self {
            Self::Snapshot(_) => None,
            Self::Compare { reference, .. } => Some(reference),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Snapshot(name) => write!(f, "{name}"),
            Self::Compare {
                snapshot,
                reference,
            } => write!(f, "{snapshot} vs {reference}"),
        }
    }
}

/// Creates the HTTP client for the configured engine.
pub fn connect(config: &ServerConfig) -> Result<Box<dyn AnalysisClient>> {
    let client = BatfishClient::new(config)?;
    Ok(Box::new(client))
}

/// Trait defining the interface for analysis engine clients.
///
/// All operations are async and return Results with BatqError.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Lists the snapshots loaded in the network.
    async fn list_snapshots(&self) -> Result<Vec<String>>;

    /// Uploads a zipped snapshot under the given name.
    async fn init_snapshot(&self, archive: Vec<u8>, name: &str) -> Result<()>;

    /// Derives a snapshot with nodes or interfaces deactivated.
    async fn fork_snapshot(&self, request: &ForkRequest) -> Result<()>;

    /// Removes a snapshot.
    async fn delete_snapshot(&self, name: &str) -> Result<()>;

    /// Lists the questions the engine can answer.
    async fn list_questions(&self) -> Result<Vec<QuestionInfo>>;

    /// Runs a question with optional parameters.
    async fn run_query(
        &self,
        fun: &str,
        params: Option<&Variant>,
        target: &Target,
    ) -> Result<Answer>;
}
