//! Session context for Bat-Q.
//!
//! Holds the state that survives page navigation: the active and alternate
//! snapshots, the failure selections made against the active snapshot, and
//! the query selection. Page handlers receive it explicitly.

mod store;

pub use store::SessionStore;

use serde::{Deserialize, Serialize};

use crate::catalog::QueryCatalog;
use crate::selection::{reduce, SelectionAction, SelectionState};

/// A snapshot chosen in this session, with its simulated failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRef {
    pub name: String,
    #[serde(default)]
    pub failed_nodes: Vec<String>,
    #[serde(default)]
    pub failed_interfaces: Vec<String>,
}

impl SnapshotRef {
    /// Creates a reference with no failures selected.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Name of the snapshot forked to simulate the selected failures.
    pub fn fork_name(&self) -> String {
        format!("{}_Fail", self.name)
    }

    /// Returns true if any node or interface is marked as failed.
    pub fn has_failures(&self) -> bool {
        !self.failed_nodes.is_empty() || !self.failed_interfaces.is_empty()
    }
}

/// Typed session state shared by all pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    #[serde(default)]
    pub active: Option<SnapshotRef>,
    #[serde(default)]
    pub alternate: Option<SnapshotRef>,
    #[serde(default)]
    pub selection: SelectionState,
}

impl SessionContext {
    pub fn has_active_snapshot(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_ref().map(|s| s.name.as_str())
    }

    pub fn alternate_name(&self) -> Option<&str> {
        self.alternate.as_ref().map(|s| s.name.as_str())
    }

    /// Makes `name` the active snapshot.
    ///
    /// Selecting a different snapshot starts with no failures; re-selecting
    /// the current one keeps them. Returns true if the snapshot changed.
    pub fn select_active(&mut self, name: &str) -> bool {
        if self.active_name() == Some(name) {
            return false;
        }
        self.active = Some(SnapshotRef::new(name));
        true
    }

    /// Makes a freshly uploaded snapshot active.
    ///
    /// An upload replaces any snapshot of the same name, so failures recorded
    /// for it are dropped even when it was already active.
    pub fn replace_active(&mut self, name: &str) {
        self.active = Some(SnapshotRef::new(name));
    }

    /// Makes `name` the alternate snapshot used for comparisons.
    pub fn select_alternate(&mut self, name: &str) {
        if self.alternate_name() != Some(name) {
            self.alternate = Some(SnapshotRef::new(name));
        }
    }

    /// Drops every reference to a deleted snapshot.
    pub fn forget_snapshot(&mut self, name: &str) {
        if self.active_name() == Some(name) {
            self.active = None;
        }
        if self.alternate_name() == Some(name) {
            self.alternate = None;
        }
    }

    /// Records the failure selections for the active snapshot.
    ///
    /// Returns false if there is no active snapshot.
    pub fn set_failures(&mut self, nodes: Vec<String>, interfaces: Vec<String>) -> bool {
        match self.active.as_mut() {
            Some(active) => {
                active.failed_nodes = nodes;
                active.failed_interfaces = interfaces;
                true
            }
            None => false,
        }
    }

    /// Returns `(reference, snapshot)` when two distinct snapshots are chosen.
    pub fn comparison_pair(&self) -> Option<(&str, &str)> {
        match (self.active_name(), self.alternate_name()) {
            (Some(reference), Some(alternate)) if reference != alternate => {
                Some((reference, alternate))
            }
            _ => None,
        }
    }

    /// Applies a selection-page action.
    pub fn apply(&mut self, action: SelectionAction, catalog: &QueryCatalog) {
        self.selection = reduce(&self.selection, action, catalog);
    }
}
