//! Command-line argument parsing for Bat-Q.
//!
//! Every subcommand renders one page of the dashboard. The session file
//! carries the state from one command to the next.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::pages::failure::FailureRequest;
use crate::pages::home::HomeAction;
use crate::pages::questions::QuestionsAction;
use crate::render::OutputFormat;
use crate::selection::SelectionAction;

/// Query a Batfish network analysis service from the command line.
#[derive(Parser, Debug)]
#[command(name = "batq")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Batfish host (overrides the config file and BATFISH_SERVER)
    #[arg(short = 'H', long, value_name = "HOST", global = true)]
    pub host: Option<String>,

    /// Question catalog (YAML)
    #[arg(long, value_name = "PATH", global = true)]
    pub catalog: Option<PathBuf>,

    /// Session file carrying state between commands
    #[arg(long, value_name = "PATH", env = "BATQ_SESSION", global = true)]
    pub session: Option<PathBuf>,

    /// Output format: text or json
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    pub output: String,

    /// Use the in-memory mock engine (for testing)
    #[arg(long, global = true)]
    pub mock_engine: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Check that the Batfish host is reachable
    Probe,

    /// List, upload, select and delete snapshots
    Snapshots(SnapshotsArgs),

    /// Browse the question catalog and edit the selection
    #[command(subcommand)]
    Questions(QuestionsCommand),

    /// Run the selected questions against the active snapshot
    Analyze,

    /// Simulate node and interface failures on the active snapshot
    Fail(FailArgs),

    /// Compare the alternate snapshot against the active one
    Compare,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SnapshotsArgs {
    /// Upload a zipped snapshot; its name is the file name up to the first dot
    #[arg(long, value_name = "ZIP", group = "op")]
    pub upload: Option<PathBuf>,

    /// Make a snapshot the active one
    #[arg(long, value_name = "NAME", group = "op")]
    pub select: Option<String>,

    /// Make a snapshot the alternate one, used by `compare`
    #[arg(long, value_name = "NAME", group = "op")]
    pub alternate: Option<String>,

    /// Delete a snapshot
    #[arg(long, value_name = "NAME", group = "op")]
    pub delete: Option<String>,
}

impl SnapshotsArgs {
    pub fn to_action(&self) -> HomeAction {
        if let Some(path) = &self.upload {
            HomeAction::Upload(path.clone())
        } else if let Some(name) = &self.select {
            HomeAction::Select(name.clone())
        } else if let Some(name) = &self.alternate {
            HomeAction::Alternate(name.clone())
        } else if let Some(name) = &self.delete {
            HomeAction::Delete(name.clone())
        } else {
            HomeAction::Show
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum QuestionsCommand {
    /// List the catalog by category
    List,

    /// Show the selection and its invocations
    Show,

    /// Set the checked questions of a category (none clears it)
    Select {
        #[arg(long, value_name = "CATEGORY")]
        category: String,
        names: Vec<String>,
    },

    /// Set a parameter of one variant (empty text removes it)
    Set {
        query: String,
        param: String,
        text: String,
        #[arg(long, default_value_t = 0)]
        variant: usize,
    },

    /// Append a copy of the last variant
    Clone { query: String },

    /// Remove one variant
    Remove {
        query: String,
        #[arg(long)]
        variant: usize,
    },

    /// Drop the whole selection
    Clear,

    /// Save the selection to a YAML file
    Export { path: PathBuf },

    /// Load the selection from a YAML file
    Import { path: PathBuf },
}

impl QuestionsCommand {
    pub fn to_action(&self) -> QuestionsAction {
        match self.clone() {
            Self::List => QuestionsAction::List,
            Self::Show => QuestionsAction::Show,
            Self::Select { category, names } => {
                QuestionsAction::Apply(SelectionAction::SetCategory {
                    category,
                    checked: names,
                })
            }
            Self::Set {
                query,
                param,
                text,
                variant,
            } => QuestionsAction::Apply(SelectionAction::SetParam {
                query,
                param,
                variant,
                text,
            }),
            Self::Clone { query } => QuestionsAction::Apply(SelectionAction::CloneVariant { query }),
            Self::Remove { query, variant } => {
                QuestionsAction::Apply(SelectionAction::RemoveVariant { query, variant })
            }
            Self::Clear => QuestionsAction::Apply(SelectionAction::Clear),
            Self::Export { path } => QuestionsAction::Export(path),
            Self::Import { path } => QuestionsAction::Import(path),
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct FailArgs {
    /// Node to fail (repeatable)
    #[arg(long = "node", value_name = "NODE")]
    pub nodes: Vec<String>,

    /// Interface to fail, as host[interface] (repeatable)
    #[arg(long = "interface", value_name = "IFACE")]
    pub interfaces: Vec<String>,

    /// Forget the stored failure selections
    #[arg(long, conflicts_with_all = ["nodes", "interfaces"])]
    pub clear: bool,
}

impl FailArgs {
    /// Lists left empty keep the failures already stored in the session.
    pub fn to_request(&self) -> FailureRequest {
        if self.clear {
            return FailureRequest {
                nodes: Some(Vec::new()),
                interfaces: Some(Vec::new()),
            };
        }
        let given = |v: &Vec<String>| (!v.is_empty()).then(|| v.clone());
        FailureRequest {
            nodes: given(&self.nodes),
            interfaces: given(&self.interfaces),
        }
    }
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Parses the output format from the --output argument.
    pub fn parse_output_format(&self) -> std::result::Result<OutputFormat, String> {
        self.output.parse()
    }

    /// Applies command-line overrides on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = Some(host.clone());
        }
        if let Some(catalog) = &self.catalog {
            config.catalog.path = catalog.clone();
        }
        if let Some(session) = &self.session {
            config.session.path = Some(session.clone());
        }
    }
}
