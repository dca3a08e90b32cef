//! Output rendering for pages.
//!
//! Provides two output formats: aligned text for terminals and JSON for
//! scripting.

mod table;

pub use table::TextTable;

use crate::error::{BatqError, Result};
use crate::pages::{Page, PageOutput};

/// Output format for rendered pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text with box-drawn tables.
    #[default]
    Text,
    /// The page structure as pretty-printed JSON.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}. Expected: text or json")),
        }
    }
}

fn indent(lines: Vec<String>, depth: usize) -> Vec<String> {
    if depth == 0 {
        return lines;
    }
    let prefix = "  ".repeat(depth);
    lines
        .into_iter()
        .map(|l| {
            if l.is_empty() {
                l
            } else {
                format!("{prefix}{l}")
            }
        })
        .collect()
}

fn output_lines(output: &PageOutput, depth: usize) -> Vec<String> {
    let lines = match output {
        PageOutput::Header(text) => vec![String::new(), format!("## {text}")],
        PageOutput::Info(text) => text.lines().map(str::to_string).collect(),
        PageOutput::Warning(text) => vec![format!("Warning: {text}")],
        PageOutput::Error(text) => vec![format!("Error: {text}")],
        PageOutput::Table(table) => TextTable::new(table).render_lines(),
        PageOutput::Tabs(tabs) => {
            let mut lines = Vec::new();
            for tab in tabs {
                lines.push(String::new());
                lines.push(format!("[{}]", tab.title));
                for inner in &tab.outputs {
                    lines.extend(output_lines(inner, 1));
                }
            }
            return indent(lines, depth);
        }
        PageOutput::Diagram { title, dot } => {
            let mut lines = vec![format!("{title} (Graphviz DOT):")];
            lines.extend(dot.lines().map(str::to_string));
            lines
        }
        PageOutput::Raw(value) => serde_json::to_string_pretty(value)
            .unwrap_or_else(|_| value.to_string())
            .lines()
            .map(str::to_string)
            .collect(),
    };
    indent(lines, depth)
}

/// Renders a page as text.
pub fn render_text(page: &Page) -> String {
    let mut lines = vec![format!("# {}", page.title)];
    for output in &page.outputs {
        lines.extend(output_lines(output, 0));
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Renders a page as pretty-printed JSON.
pub fn render_json(page: &Page) -> Result<String> {
    serde_json::to_string_pretty(page)
        .map_err(|e| BatqError::internal(format!("Failed to serialize page: {e}")))
}

pub fn render(page: &Page, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(page)),
        OutputFormat::Json => render_json(page).map(|mut s| {
            s.push('\n');
            s
        }),
    }
}
