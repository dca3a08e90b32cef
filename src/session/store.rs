//! JSON-file persistence of the session context between commands.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::SessionContext;
use crate::error::{BatqError, Result};

/// Loads and saves the session context at a fixed path.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored session, or a fresh one if none exists.
    ///
    /// An unreadable session file is discarded with a warning rather than
    /// blocking every page.
    pub fn load(&self) -> SessionContext {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No session at {}: {e}", self.path.display());
                return SessionContext::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                warn!(
                    "Discarding unreadable session file {}: {e}",
                    self.path.display()
                );
                SessionContext::default()
            }
        }
    }

    /// Writes the session, creating parent directories as needed.
    pub fn save(&self, session: &SessionContext) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                BatqError::internal(format!(
                    "Failed to create session directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| BatqError::internal(format!("Failed to serialize session: {e}")))?;
        fs::write(&self.path, json).map_err(|e| {
            BatqError::internal(format!(
                "Failed to write session file {}: {e}",
                self.path.display()
            ))
        })?;
        debug!("Saved session to {}", self.path.display());
        Ok(())
    }
}
