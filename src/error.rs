//! Error types for Bat-Q.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for Bat-Q operations.
#[derive(Error, Debug)]
pub enum BatqError {
    /// Analysis engine connectivity errors (unresolvable host, timeout, refused, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Snapshot errors (unrecognized upload, unknown snapshot, failed fork, etc.)
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Query execution errors (bad parameters, inapplicable query, engine-side exception)
    #[error("Query error: {0}")]
    Query(String),

    /// Result-shape errors raised while formatting an answer for display.
    #[error("Presentation error: {0}")]
    Presentation(String),

    /// Query catalog errors (missing or malformed catalog file).
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Selection file errors (export/import of saved selections).
    #[error("Selection error: {0}")]
    Selection(String),

    /// Configuration errors (invalid config file, bad host, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BatqError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a snapshot error with the given message.
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a presentation error with the given message.
    pub fn presentation(msg: impl Into<String>) -> Self {
        Self::Presentation(msg.into())
    }

    /// Creates a catalog error with the given message.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Creates a selection error with the given message.
    pub fn selection(msg: impl Into<String>) -> Self {
        Self::Selection(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Snapshot(_) => "Snapshot Error",
            Self::Query(_) => "Query Error",
            Self::Presentation(_) => "Presentation Error",
            Self::Catalog(_) => "Catalog Error",
            Self::Selection(_) => "Selection Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns true for errors that block every engine-backed page.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Result type alias using BatqError.
pub type Result<T> = std::result::Result<T, BatqError>;
