//! HTTP client for the Batfish analysis service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use super::{AnalysisClient, Answer, ForkRequest, QuestionInfo, Target};
use crate::config::ServerConfig;
use crate::error::{BatqError, Result};
use crate::selection::Variant;

/// Analysis client speaking the engine's v2 HTTP API.
#[derive(Debug, Clone)]
pub struct BatfishClient {
    base_url: Url,
    network: String,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerRequest<'a> {
    question: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<&'a Variant>,
    snapshot: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_snapshot: Option<&'a str>,
}

/// Which error kind an unsuccessful response maps to.
#[derive(Debug, Clone, Copy)]
enum Scope {
    Snapshot,
    Query,
}

impl Scope {
    fn error(self, msg: String) -> BatqError {
        match self {
            Self::Snapshot => BatqError::snapshot(msg),
            Self::Query => BatqError::query(msg),
        }
    }
}

impl BatfishClient {
    /// Creates a client for the configured host, port and network.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        Self::with_base_url(config.base_url()?, &config.network, config.timeout())
    }

    pub fn with_base_url(base_url: Url, network: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BatqError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            network: network.to_string(),
            client,
        })
    }

    /// Builds `{base}/v2/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BatqError::config(format!("Invalid engine URL: {}", self.base_url)))?
            .pop_if_empty()
            .push("v2")
            .extend(segments);
        Ok(url)
    }

    fn network_endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut full = vec!["networks", self.network.as_str()];
        full.extend_from_slice(segments);
        self.endpoint(&full)
    }

    fn send_error(e: reqwest::Error) -> BatqError {
        if e.is_timeout() {
            BatqError::connection("Request to the analysis engine timed out")
        } else if e.is_connect() {
            BatqError::connection(format!("Failed to connect to the analysis engine: {e}"))
        } else {
            BatqError::connection(format!("Request failed: {e}"))
        }
    }

    /// Fails with the response body when the status is not a success.
    async fn check(response: Response, scope: Scope) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(scope.error(Self::describe_failure(status, &body)))
    }

    fn describe_failure(status: StatusCode, body: &str) -> String {
        let body = body.trim();
        if body.is_empty() {
            format!("Engine returned {status}")
        } else {
            format!("Engine returned {status}: {body}")
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response, scope: Scope) -> Result<T> {
        let body = response
            .text()
            .await
            .map_err(|e| scope.error(format!("Failed to read response: {e}")))?;
        serde_json::from_str(&body)
            .map_err(|e| scope.error(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl AnalysisClient for BatfishClient {
    async fn list_snapshots(&self) -> Result<Vec<String>> {
        let url = self.network_endpoint(&["snapshots"])?;
        debug!("GET {url}");
        let response = self.client.get(url).send().await.map_err(Self::send_error)?;
        let response = Self::check(response, Scope::Snapshot).await?;
        Self::read_json(response, Scope::Snapshot).await
    }

    async fn init_snapshot(&self, archive: Vec<u8>, name: &str) -> Result<()> {
        let url = self.network_endpoint(&["snapshots", name])?;
        info!("Uploading snapshot '{name}' ({} bytes)", archive.len());
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/zip")
            .body(archive)
            .send()
            .await
            .map_err(Self::send_error)?;
        Self::check(response, Scope::Snapshot).await?;
        Ok(())
    }

    async fn fork_snapshot(&self, request: &ForkRequest) -> Result<()> {
        let url = self.network_endpoint(&["snapshots:fork"])?;
        info!(
            "Forking snapshot '{}' into '{}'",
            request.snapshot_base, request.snapshot_new
        );
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(Self::send_error)?;
        Self::check(response, Scope::Snapshot).await?;
        Ok(())
    }

    async fn delete_snapshot(&self, name: &str) -> Result<()> {
        let url = self.network_endpoint(&["snapshots", name])?;
        info!("Deleting snapshot '{name}'");
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(Self::send_error)?;
        Self::check(response, Scope::Snapshot).await?;
        Ok(())
    }

    async fn list_questions(&self) -> Result<Vec<QuestionInfo>> {
        let url = self.endpoint(&["questions"])?;
        debug!("GET {url}");
        let response = self.client.get(url).send().await.map_err(Self::send_error)?;
        let response = Self::check(response, Scope::Query).await?;
        Self::read_json(response, Scope::Query).await
    }

    async fn run_query(
        &self,
        fun: &str,
        params: Option<&Variant>,
        target: &Target,
    ) -> Result<Answer> {
        let url = self.network_endpoint(&["answer"])?;
        let request = AnswerRequest {
            question: fun,
            parameters: params,
            snapshot: target.snapshot_name(),
            reference_snapshot: target.reference_name(),
        };
        debug!("Running '{fun}' against {target}");
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(Self::send_error)?;
        let response = Self::check(response, Scope::Query).await?;
        Self::read_json(response, Scope::Query).await
    }
}
