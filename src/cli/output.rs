//! Output rendering shared by the CLI commands
//!
//! Commands render text themselves through the table and report helpers
//! here; JSON and YAML go through serde.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::validation::ValidationReport;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => anyhow::bail!("Unsupported output format: '{}'. Use 'text', 'json', or 'yaml'.", s),
        }
    }

    pub fn is_structured(&self) -> bool {
        !matches!(self, OutputFormat::Text)
    }
}

/// Render `data` as JSON or YAML.
pub fn render_structured<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(data).context("Failed to serialize to JSON"),
        OutputFormat::Yaml => serde_yaml::to_string(data).context("Failed to serialize to YAML"),
        OutputFormat::Text => anyhow::bail!("Text output is rendered by each command"),
    }
}

pub fn print_structured<T: Serialize>(data: &T, format: OutputFormat) -> Result<()> {
    println!("{}", render_structured(data, format)?.trim_end());
    Ok(())
}

/// Shorten to `max_len` characters, ending in `...` when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let mut kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    kept.push_str("...");
    kept
}

/// Left-aligned text table. Column widths fit the widest cell, capped at
/// `max_width` characters.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    max_width: usize,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { headers: headers.into_iter().map(Into::into).collect(), rows: Vec::new(), max_width: 40 }
    }

    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width.max(4);
        self
    }

    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(column, header)| {
                self.rows
                    .iter()
                    .map(|row| row[column].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
                    .min(self.max_width)
            })
            .collect()
    }

    fn render_line(cells: &[String], widths: &[usize]) -> String {
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", truncate(cell, *width), width = width))
            .collect();
        line.join(" ").trim_end().to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let rule_width = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);

        let mut lines = vec![Self::render_line(&self.headers, &widths), "-".repeat(rule_width)];
        lines.extend(self.rows.iter().map(|row| Self::render_line(row, &widths)));
        lines.join("\n")
    }
}

/// One line per finding followed by a summary line.
pub fn render_report(file: &Path, report: &ValidationReport) -> String {
    let mut lines: Vec<String> = report
        .iter()
        .map(|violation| {
            format!(
                "{}: [{}] {}: {}",
                report.effective_severity(violation),
                violation.kind.code(),
                violation.path,
                violation.kind
            )
        })
        .collect();
    lines.push(format!(
        "{}: {} error(s), {} warning(s)",
        file.display(),
        report.error_count(),
        report.warning_count()
    ));
    lines.join("\n")
}
