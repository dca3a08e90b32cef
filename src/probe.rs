//! TCP reachability probe for the analysis engine.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;
use tracing::debug;

use crate::error::BatqError;

/// Categorized result of a reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Reachable,
    Unresolved,
    TimedOut,
    Refused,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub status: ProbeStatus,
    pub message: String,
}

impl ProbeOutcome {
    fn new(status: ProbeStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.status == ProbeStatus::Reachable
    }

    /// Converts an unsuccessful probe into a blocking connection error.
    pub fn into_result(self) -> crate::error::Result<()> {
        if self.is_reachable() {
            Ok(())
        } else {
            Err(BatqError::connection(self.message))
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Tries to open a TCP connection to `(host, port)` within `limit`.
///
/// Name resolution failures and connection timeouts are reported separately
/// from hosts that resolve but refuse or drop the connection.
pub async fn probe(host: &str, port: u16, limit: Duration) -> ProbeOutcome {
    let addrs: Vec<_> = match timeout(limit, lookup_host((host, port))).await {
        Ok(Ok(addrs)) => addrs.collect(),
        Ok(Err(e)) => {
            debug!("Resolving {host} failed: {e}");
            return ProbeOutcome::new(ProbeStatus::Unresolved, "Hostname could not be resolved");
        }
        Err(_) => {
            return ProbeOutcome::new(ProbeStatus::TimedOut, "Connection attempt timed out");
        }
    };

    if addrs.is_empty() {
        return ProbeOutcome::new(ProbeStatus::Unresolved, "Hostname could not be resolved");
    }

    match timeout(limit, TcpStream::connect(&addrs[..])).await {
        Ok(Ok(_stream)) => {
            debug!("{host}:{port} is reachable");
            ProbeOutcome::new(ProbeStatus::Reachable, format!("{host} is reachable"))
        }
        Ok(Err(e)) => {
            debug!("Connecting to {host}:{port} failed: {e}");
            ProbeOutcome::new(ProbeStatus::Refused, format!("{host} is not reachable"))
        }
        Err(_) => ProbeOutcome::new(ProbeStatus::TimedOut, "Connection attempt timed out"),
    }
}
