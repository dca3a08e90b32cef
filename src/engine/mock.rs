//! Mock analysis clients for testing.
//!
//! Provides an in-memory engine with canned snapshots and answers for
//! headless testing, and a client whose engine is never reachable.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{json, Value};

use super::{AnalysisClient, Answer, ColumnInfo, ForkRequest, QuestionInfo, Row, Target};
use crate::error::{BatqError, Result};
use crate::selection::Variant;

/// First bytes of every zip archive.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

#[derive(Debug, Default)]
struct MockState {
    snapshots: Vec<String>,
    calls: Vec<String>,
}

/// An in-memory engine that answers from canned results.
///
/// Starts with the snapshots `base` and `changed`. Uploads must look like
/// zip archives. Queries without a canned answer return an empty result.
#[derive(Debug)]
pub struct MockAnalysisClient {
    state: Mutex<MockState>,
    answers: IndexMap<String, Answer>,
    failures: IndexMap<String, String>,
}

impl MockAnalysisClient {
    /// Creates a mock engine with the default snapshots and answers.
    pub fn new() -> Self {
        Self::with_snapshots(&["base", "changed"])
    }

    /// Creates a mock engine with the given snapshots and default answers.
    pub fn with_snapshots(snapshots: &[&str]) -> Self {
        Self {
            state: Mutex::new(MockState {
                snapshots: snapshots.iter().map(|s| s.to_string()).collect(),
                calls: Vec::new(),
            }),
            answers: default_answers(),
            failures: IndexMap::new(),
        }
    }

    /// Replaces the canned answer for a question.
    pub fn with_answer(mut self, fun: impl Into<String>, answer: Answer) -> Self {
        self.answers.insert(fun.into(), answer);
        self
    }

    /// Makes a question fail with the given engine message.
    pub fn with_failure(mut self, fun: impl Into<String>, msg: impl Into<String>) -> Self {
        self.failures.insert(fun.into(), msg.into());
        self
    }

    /// Snapshots currently loaded.
    pub fn snapshots(&self) -> Vec<String> {
        self.lock().snapshots.clone()
    }

    /// Every call made so far, as `operation target`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: String) {
        self.lock().calls.push(call);
    }

    fn require_snapshot(&self, name: &str) -> Result<()> {
        if self.lock().snapshots.iter().any(|s| s == name) {
            Ok(())
        } else {
            Err(BatqError::query(format!("Snapshot '{name}' not found")))
        }
    }
}

impl Default for MockAnalysisClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps rows whose `Node` cell contains the `nodes` parameter, when both exist.
fn filter_by_nodes(answer: &Answer, params: Option<&Variant>) -> Answer {
    let Some(pattern) = params
        .and_then(|p| p.get("nodes"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    else {
        return answer.clone();
    };

    let rows = answer
        .rows
        .iter()
        .filter(|row| match row.get("Node").and_then(Value::as_str) {
            Some(node) => node.contains(pattern),
            None => true,
        })
        .cloned()
        .collect();
    Answer::new(answer.columns.clone(), rows)
}

#[async_trait]
impl AnalysisClient for MockAnalysisClient {
    async fn list_snapshots(&self) -> Result<Vec<String>> {
        self.record("list_snapshots".to_string());
        Ok(self.snapshots())
    }

    async fn init_snapshot(&self, archive: Vec<u8>, name: &str) -> Result<()> {
        self.record(format!("init_snapshot {name}"));
        if !archive.starts_with(ZIP_MAGIC) {
            return Err(BatqError::snapshot(format!(
                "Snapshot '{name}' is not a zip archive"
            )));
        }
        let mut state = self.lock();
        if !state.snapshots.iter().any(|s| s == name) {
            state.snapshots.push(name.to_string());
        }
        Ok(())
    }

    async fn fork_snapshot(&self, request: &ForkRequest) -> Result<()> {
        self.record(format!(
            "fork_snapshot {} -> {}",
            request.snapshot_base, request.snapshot_new
        ));
        let mut state = self.lock();
        if !state.snapshots.iter().any(|s| *s == request.snapshot_base) {
            return Err(BatqError::snapshot(format!(
                "Snapshot '{}' not found",
                request.snapshot_base
            )));
        }
        let exists = state.snapshots.iter().any(|s| *s == request.snapshot_new);
        if exists && !request.overwrite {
            return Err(BatqError::snapshot(format!(
                "Snapshot '{}' already exists",
                request.snapshot_new
            )));
        }
        if !exists {
            state.snapshots.push(request.snapshot_new.clone());
        }
        Ok(())
    }

    async fn delete_snapshot(&self, name: &str) -> Result<()> {
        self.record(format!("delete_snapshot {name}"));
        let mut state = self.lock();
        let before = state.snapshots.len();
        state.snapshots.retain(|s| s != name);
        if state.snapshots.len() == before {
            return Err(BatqError::snapshot(format!("Snapshot '{name}' not found")));
        }
        Ok(())
    }

    async fn list_questions(&self) -> Result<Vec<QuestionInfo>> {
        self.record("list_questions".to_string());
        let mut questions: Vec<QuestionInfo> =
            self.answers.keys().map(QuestionInfo::new).collect();
        for extra in [
            "bgpRib",
            "evpnRib",
            "parseWarning",
            "initIssues",
            "ospfEdges",
            "bidirectionalTraceroute",
        ] {
            if !self.answers.contains_key(extra) {
                questions.push(QuestionInfo::new(extra));
            }
        }
        for fun in self.failures.keys() {
            if !questions.iter().any(|q| q.name == *fun) {
                questions.push(QuestionInfo::new(fun.clone()));
            }
        }
        Ok(questions)
    }

    async fn run_query(
        &self,
        fun: &str,
        params: Option<&Variant>,
        target: &Target,
    ) -> Result<Answer> {
        self.record(format!("run_query {fun} {target}"));
        self.require_snapshot(target.snapshot_name())?;
        if let Some(reference) = target.reference_name() {
            self.require_snapshot(reference)?;
        }
        if let Some(msg) = self.failures.get(fun) {
            return Err(BatqError::query(msg.clone()));
        }
        Ok(self
            .answers
            .get(fun)
            .map(|answer| filter_by_nodes(answer, params))
            .unwrap_or_default())
    }
}

/// An analysis client whose engine can never be reached.
#[derive(Debug, Default)]
pub struct FailingAnalysisClient;

impl FailingAnalysisClient {
    pub fn new() -> Self {
        Self
    }

    fn unreachable<T>() -> Result<T> {
        Err(BatqError::connection("Mock engine is not reachable"))
    }
}

#[async_trait]
impl AnalysisClient for FailingAnalysisClient {
    async fn list_snapshots(&self) -> Result<Vec<String>> {
        Self::unreachable()
    }

    async fn init_snapshot(&self, _archive: Vec<u8>, _name: &str) -> Result<()> {
        Self::unreachable()
    }

    async fn fork_snapshot(&self, _request: &ForkRequest) -> Result<()> {
        Self::unreachable()
    }

    async fn delete_snapshot(&self, _name: &str) -> Result<()> {
        Self::unreachable()
    }

    async fn list_questions(&self) -> Result<Vec<QuestionInfo>> {
        Self::unreachable()
    }

    async fn run_query(
        &self,
        _fun: &str,
        _params: Option<&Variant>,
        _target: &Target,
    ) -> Result<Answer> {
        Self::unreachable()
    }
}

fn rows(values: Vec<Value>) -> Vec<Row> {
    values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect()
}

fn columns(names: &[&str]) -> Vec<ColumnInfo> {
    names.iter().map(|n| ColumnInfo::new(*n)).collect()
}

fn interface(host: &str, iface: &str) -> Value {
    json!({"hostname": host, "interface": iface})
}

fn default_answers() -> IndexMap<String, Answer> {
    let mut answers = IndexMap::new();

    answers.insert(
        "fileParseStatus".to_string(),
        Answer::new(
            columns(&["File_Name", "Status", "File_Format", "Nodes"]),
            rows(vec![
                json!({"File_Name": "configs/as1border1.cfg", "Status": "PASSED",
                       "File_Format": "CISCO_IOS", "Nodes": ["as1border1"]}),
                json!({"File_Name": "configs/as2core1.cfg", "Status": "PASSED",
                       "File_Format": "CISCO_IOS", "Nodes": ["as2core1"]}),
                json!({"File_Name": "hosts/host1.json", "Status": "PASSED",
                       "File_Format": "HOST", "Nodes": []}),
            ]),
        ),
    );

    answers.insert(
        "nodeProperties".to_string(),
        Answer::new(
            columns(&["Node", "Configuration_Format", "Hostname", "Domain_Name"]),
            rows(vec![
                json!({"Node": "as1border1", "Configuration_Format": "CISCO_IOS",
                       "Hostname": "as1border1", "Domain_Name": null}),
                json!({"Node": "as2border1", "Configuration_Format": "CISCO_IOS",
                       "Hostname": "as2border1", "Domain_Name": null}),
                json!({"Node": "as2core1", "Configuration_Format": "CISCO_IOS",
                       "Hostname": "as2core1", "Domain_Name": null}),
            ]),
        ),
    );

    answers.insert(
        "interfaceProperties".to_string(),
        Answer::new(
            columns(&["Interface", "Active", "Description"]),
            rows(vec![
                json!({"Interface": interface("as1border1", "GigabitEthernet0/0"),
                       "Active": true, "Description": "to as2border1"}),
                json!({"Interface": interface("as2border1", "GigabitEthernet0/0"),
                       "Active": true, "Description": ""}),
                json!({"Interface": interface("as2border1", "GigabitEthernet1/0"),
                       "Active": true, "Description": ""}),
                json!({"Interface": interface("as2core1", "GigabitEthernet0/0"),
                       "Active": true, "Description": ""}),
            ]),
        ),
    );

    answers.insert(
        "layer3Edges".to_string(),
        Answer::new(
            columns(&["Interface", "IPs", "Remote_Interface", "Remote_IPs"]),
            rows(vec![
                json!({"Interface": interface("as1border1", "GigabitEthernet0/0"),
                       "IPs": ["10.12.11.1"],
                       "Remote_Interface": interface("as2border1", "GigabitEthernet0/0"),
                       "Remote_IPs": ["10.12.11.2"]}),
                json!({"Interface": interface("as2border1", "GigabitEthernet0/0"),
                       "IPs": ["10.12.11.2"],
                       "Remote_Interface": interface("as1border1", "GigabitEthernet0/0"),
                       "Remote_IPs": ["10.12.11.1"]}),
                json!({"Interface": interface("as2border1", "GigabitEthernet1/0"),
                       "IPs": ["2.12.11.1"],
                       "Remote_Interface": interface("as2core1", "GigabitEthernet0/0"),
                       "Remote_IPs": ["2.12.11.2"]}),
            ]),
        ),
    );

    answers.insert(
        "routes".to_string(),
        Answer::new(
            columns(&[
                "Node",
                "VRF",
                "Network",
                "Next_Hop_IP",
                "Protocol",
                "Tag",
                "Metric",
            ]),
            rows(vec![
                json!({"Node": "as1border1", "VRF": "default", "Network": "1.0.1.0/24",
                       "Next_Hop_IP": "AUTO/NONE(-1l)", "Protocol": "connected",
                       "Tag": null, "Metric": 0}),
                json!({"Node": "as2border1", "VRF": "default", "Network": "2.0.0.0/8",
                       "Next_Hop_IP": "", "Protocol": "aggregate",
                       "Tag": null, "Metric": 0}),
                json!({"Node": "as2core1", "VRF": "default", "Network": "2.128.0.0/16",
                       "Next_Hop_IP": "2.12.11.1", "Protocol": "ospf",
                       "Tag": null, "Metric": 2}),
            ]),
        ),
    );

    let accepted = json!({
        "disposition": "ACCEPTED",
        "hops": [
            {"node": {"name": "as2core1"}, "steps": [
                {"type": "Originate", "action": "ORIGINATED", "detail": {"originatingVrf": "default"}},
                {"type": "Routing", "action": "FORWARDED", "detail": {"routes": [{"network": "2.0.0.0/8"}]}}
            ]},
            {"node": {"name": "as2border1"}, "steps": [
                {"type": "EnterInputInterface", "action": "RECEIVED", "detail": {"inputInterface": "GigabitEthernet1/0"}},
                {"type": "Inbound", "action": "ACCEPTED", "detail": {"interface": "Loopback0"}}
            ]}
        ]
    });
    let denied = json!({
        "disposition": "DENIED_IN",
        "hops": [
            {"node": {"name": "as2core1"}, "steps": [
                {"type": "EnterInputInterface", "action": "RECEIVED", "detail": {"inputInterface": "GigabitEthernet0/0"}},
                {"type": "Filter", "action": "DENIED", "detail": {"filter": "blocktelnet"}}
            ]}
        ]
    });
    answers.insert(
        "traceroute".to_string(),
        Answer::new(
            columns(&["Flow", "Traces", "TraceCount"]),
            rows(vec![json!({
                "Flow": {"ingressNode": "as2core1", "dstIp": "2.34.201.10",
                         "ipProtocol": "TCP", "dstPort": 23},
                "Traces": [accepted, denied],
                "TraceCount": 2
            })]),
        ),
    );

    answers
}
