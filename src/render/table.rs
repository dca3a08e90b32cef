//! Plain-text table rendering.
//!
//! Renders table outputs with column headers, auto-sized columns and
//! box-drawing borders.

use crate::pages::TableOutput;

/// Maximum width for any column.
const MAX_COLUMN_WIDTH: usize = 40;

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Renders a table output as text lines.
pub struct TextTable<'a> {
    table: &'a TableOutput,
}

impl<'a> TextTable<'a> {
    pub fn new(table: &'a TableOutput) -> Self {
        Self { table }
    }

    fn width_of(s: &str) -> usize {
        s.chars().count()
    }

    /// Calculates the width of each column.
    fn calculate_column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .table
            .headers
            .iter()
            .map(|h| Self::width_of(h).max(MIN_COLUMN_WIDTH))
            .collect();

        for row in &self.table.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(Self::width_of(cell));
                }
            }
        }

        widths.iter().map(|&w| w.min(MAX_COLUMN_WIDTH)).collect()
    }

    /// Truncates a string to fit within the given width, adding ellipsis if needed.
    fn truncate(s: &str, max_width: usize) -> String {
        if Self::width_of(s) <= max_width {
            s.to_string()
        } else if max_width <= 3 {
            s.chars().take(max_width).collect()
        } else {
            let head: String = s.chars().take(max_width - 3).collect();
            format!("{head}...")
        }
    }

    /// Cell text with newlines flattened and padded to `width`.
    fn cell(s: &str, width: usize) -> String {
        let flat = s.replace(['\n', '\r'], " ");
        let truncated = Self::truncate(&flat, width);
        let pad = width.saturating_sub(Self::width_of(&truncated));
        format!(" {truncated}{} ", " ".repeat(pad))
    }

    fn render_border(widths: &[usize], left: char, mid: char, right: char) -> String {
        let mut border = String::new();
        border.push(left);
        for (i, &width) in widths.iter().enumerate() {
            border.push_str(&"─".repeat(width + 2));
            if i < widths.len() - 1 {
                border.push(mid);
            }
        }
        border.push(right);
        border
    }

    fn render_row(cells: &[String], widths: &[usize]) -> String {
        let mut line = String::from("│");
        for (i, &width) in widths.iter().enumerate() {
            let value = cells.get(i).map(String::as_str).unwrap_or("");
            line.push_str(&Self::cell(value, width));
            line.push('│');
        }
        line
    }

    /// Renders the table, with its caption and a row-count footer.
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(caption) = &self.table.caption {
            lines.push(caption.clone());
        }

        if self.table.headers.is_empty() {
            lines.push("(empty result)".to_string());
            return lines;
        }

        let widths = self.calculate_column_widths();
        lines.push(Self::render_border(&widths, '┌', '┬', '┐'));
        lines.push(Self::render_row(&self.table.headers, &widths));
        lines.push(Self::render_border(&widths, '├', '┼', '┤'));
        for row in &self.table.rows {
            lines.push(Self::render_row(row, &widths));
        }
        lines.push(Self::render_border(&widths, '└', '┴', '┘'));

        let count = self.table.rows.len();
        lines.push(format!("{count} row{}", if count == 1 { "" } else { "s" }));
        lines
    }
}
