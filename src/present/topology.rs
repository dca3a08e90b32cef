//! Topology graphs built from edge-listing answers.

use std::collections::HashMap;

use petgraph::dot::{Config, Dot};
use petgraph::graph::{NodeIndex, UnGraph};
use serde_json::Value;

use crate::engine::{Answer, InterfaceRef, Row};

fn hostname(value: &Value) -> Option<String> {
    if let Some(iface) = InterfaceRef::from_value(value) {
        return Some(iface.hostname);
    }
    match value {
        Value::Object(map) => map.get("hostname")?.as_str().map(str::to_string),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Endpoints of one edge row, from interface columns or node columns.
pub fn edge_endpoints(row: &Row) -> Option<(String, String)> {
    if let (Some(local), Some(remote)) = (row.get("Interface"), row.get("Remote_Interface")) {
        if let (Some(a), Some(b)) = (hostname(local), hostname(remote)) {
            return Some((a, b));
        }
    }
    let local = row.get("Node")?.as_str()?;
    let remote = row.get("Remote_Node")?.as_str()?;
    Some((local.to_string(), remote.to_string()))
}

/// Undirected node graph with one edge per connected pair.
#[derive(Debug, Default)]
pub struct Topology {
    graph: UnGraph<String, &'static str>,
    index: HashMap<String, NodeIndex>,
}

impl Topology {
    pub fn from_answer(answer: &Answer) -> Self {
        let mut topology = Self::default();
        for (a, b) in answer.rows.iter().filter_map(edge_endpoints) {
            topology.add_edge(&a, &b);
        }
        topology
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(idx) = self.index.get(name) {
            return *idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Adds an edge unless the pair is already connected in either direction.
    pub fn add_edge(&mut self, a: &str, b: &str) {
        let a = self.node(a);
        let b = self.node(b);
        self.graph.update_edge(a, b, "");
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Node names in insertion order.
    pub fn nodes(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .map(|i| self.graph[i].as_str())
            .collect()
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(a), Some(b)) => self.graph.find_edge(*a, *b).is_some(),
            _ => false,
        }
    }

    pub fn to_dot(&self) -> String {
        Dot::with_config(&self.graph, &[Config::EdgeNoLabel]).to_string()
    }
}
