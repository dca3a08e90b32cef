//! Transport-agnostic page output types.
//!
//! These types represent what a page shows in a way that is independent of
//! the rendering layer. The text and JSON renderers convert them to their
//! respective formats.

use serde::Serialize;

/// One element of a rendered page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum PageOutput {
    /// Section heading.
    Header(String),

    /// Informational message.
    Info(String),

    /// Something the user should look at, but not a failure.
    Warning(String),

    /// Error message shown inline.
    Error(String),

    /// Structured table data for display.
    Table(TableOutput),

    /// Tabbed group, one tab per query variant or trace.
    Tabs(Vec<Tab>),

    /// Graph in Graphviz DOT format.
    Diagram { title: String, dot: String },

    /// Unformatted result, shown as pretty JSON.
    Raw(serde_json::Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tab {
    pub title: String,
    pub outputs: Vec<PageOutput>,
}

impl Tab {
    pub fn new(title: impl Into<String>, outputs: Vec<PageOutput>) -> Self {
        Self {
            title: title.into(),
            outputs,
        }
    }
}

impl PageOutput {
    pub fn header(msg: impl Into<String>) -> Self {
        Self::Header(msg.into())
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self::Info(msg.into())
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self::Warning(msg.into())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    /// Creates a table output without a caption.
    pub fn table(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self::Table(TableOutput {
            caption: None,
            headers,
            rows,
        })
    }

    pub fn captioned_table(
        caption: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Self {
        Self::Table(TableOutput {
            caption: Some(caption.into()),
            headers,
            rows,
        })
    }

    pub fn diagram(title: impl Into<String>, dot: impl Into<String>) -> Self {
        Self::Diagram {
            title: title.into(),
            dot: dot.into(),
        }
    }
}

/// A fully built page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub title: String,
    pub outputs: Vec<PageOutput>,

    /// Set when a page-level error prevented the page from doing its work.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub blocked: bool,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Creates a page that shows only a blocking error.
    pub fn blocked(title: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            outputs: vec![PageOutput::error(msg)],
            blocked: true,
        }
    }

    pub fn push(&mut self, output: PageOutput) {
        self.outputs.push(output);
    }

    pub fn extend(&mut self, outputs: impl IntoIterator<Item = PageOutput>) {
        self.outputs.extend(outputs);
    }

    /// Returns true if any output, including inside tabs, is an error.
    pub fn has_errors(&self) -> bool {
        fn any_error(outputs: &[PageOutput]) -> bool {
            outputs.iter().any(|o| match o {
                PageOutput::Error(_) => true,
                PageOutput::Tabs(tabs) => tabs.iter().any(|t| any_error(&t.outputs)),
                _ => false,
            })
        }
        any_error(&self.outputs)
    }
}
