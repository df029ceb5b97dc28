// 🖍️ Report Writer - Annotated CSV, highlighted HTML, JSON run summary
//
// Presentation rule:
//   matched rows   → light green background
//   unmatched rows → light red background
//   annotation column in bold

use crate::config::{CheckConfig, Labels};
use crate::matcher::{MatchMode, MatchStats, Presence, TextRecord};
use crate::table::Table;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const MATCHED_BACKGROUND: &str = "#90EE90";
pub const UNMATCHED_BACKGROUND: &str = "#FF9999";

// ============================================================================
// CELL STYLE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStyle {
    /// CSS color, e.g. "#90EE90"
    pub background: Option<String>,
    pub bold: bool,
}

impl CellStyle {
    pub fn background(color: &str) -> Self {
        CellStyle {
            background: Some(color.to_string()),
            bold: false,
        }
    }

    pub fn to_css(&self) -> String {
        let mut parts = Vec::new();
        if let Some(color) = &self.background {
            parts.push(format!("background-color: {}", color));
        }
        if self.bold {
            parts.push("font-weight: bold".to_string());
        }
        parts.join("; ")
    }
}

// ============================================================================
// REPORT ROWS
// ============================================================================

/// One output row: original cells plus the annotation label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub cells: Vec<String>,
    pub presence: Presence,

    /// Where the annotation label sits in `cells`
    pub presence_column: usize,
}

/// Maps a row to one style per cell
pub type StyleFn<'a> = &'a dyn Fn(&ReportRow) -> Vec<CellStyle>;

/// Default presentation rule
pub fn highlight_matched_rows(row: &ReportRow) -> Vec<CellStyle> {
    let color = match row.presence {
        Presence::Matched => MATCHED_BACKGROUND,
        Presence::Unmatched => UNMATCHED_BACKGROUND,
    };

    let mut styles = vec![CellStyle::background(color); row.cells.len()];
    if let Some(style) = styles.get_mut(row.presence_column) {
        style.bold = true;
    }
    styles
}

/// The records table with the annotation column filled in.
/// An existing column named like the annotation column is overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedTable {
    pub headers: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl AnnotatedTable {
    pub fn build(table: &Table, records: &[TextRecord], presence_column: &str, labels: &Labels) -> Self {
        let mut headers = table.headers().to_vec();
        let presence_idx = match headers.iter().position(|h| h == presence_column) {
            Some(i) => i,
            None => {
                headers.push(presence_column.to_string());
                headers.len() - 1
            }
        };

        let mut presence_by_row = vec![Presence::Unmatched; table.len()];
        for record in records {
            if let Some(slot) = presence_by_row.get_mut(record.row) {
                *slot = record.presence();
            }
        }

        let rows = table
            .rows()
            .iter()
            .zip(presence_by_row)
            .map(|(cells, presence)| {
                let mut cells: Vec<String> = cells
                    .iter()
                    .map(|c| c.clone().unwrap_or_default())
                    .collect();
                let label = labels.for_presence(presence).to_string();
                if presence_idx < cells.len() {
                    cells[presence_idx] = label;
                } else {
                    cells.push(label);
                }

                ReportRow {
                    cells,
                    presence,
                    presence_column: presence_idx,
                }
            })
            .collect();

        AnnotatedTable { headers, rows }
    }

    /// Display width per column: (longest text + 2) * 1.2
    pub fn column_widths(&self) -> Vec<f64> {
        (0..self.headers.len())
            .map(|col| {
                let longest = std::iter::once(&self.headers[col])
                    .chain(self.rows.iter().filter_map(|r| r.cells.get(col)))
                    .map(|text| text.chars().count())
                    .max()
                    .unwrap_or(0);
                (longest as f64 + 2.0) * 1.2
            })
            .collect()
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;

        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(&row.cells)?;
        }
        writer.flush()?;

        info!(file = %path.display(), rows = self.rows.len(), "wrote annotated CSV");
        Ok(())
    }

    /// Render as a standalone HTML page, styled by `style` (or the default rule)
    pub fn to_html(&self, style: Option<StyleFn<'_>>) -> String {
        let style: StyleFn<'_> = style.unwrap_or(&highlight_matched_rows);
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Presence check</title></head>\n<body>\n");
        html.push_str("<table style=\"border-collapse: collapse; table-layout: fixed\">\n<colgroup>\n");
        for width in self.column_widths() {
            let _ = writeln!(html, "<col style=\"width: {:.1}ch\">", width);
        }
        html.push_str("</colgroup>\n<thead><tr>");
        for header in &self.headers {
            let _ = write!(html, "<th>{}</th>", escape_html(header));
        }
        html.push_str("</tr></thead>\n<tbody>\n");

        for row in &self.rows {
            let styles = style(row);
            html.push_str("<tr>");
            for (i, cell) in row.cells.iter().enumerate() {
                let css = styles.get(i).map(CellStyle::to_css).unwrap_or_default();
                if css.is_empty() {
                    let _ = write!(html, "<td>{}</td>", escape_html(cell));
                } else {
                    let _ = write!(html, "<td style=\"{}\">{}</td>", css, escape_html(cell));
                }
            }
            html.push_str("</tr>\n");
        }

        html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
        html
    }

    pub fn write_html(&self, path: &Path, style: Option<StyleFn<'_>>) -> Result<()> {
        fs::write(path, self.to_html(style))
            .with_context(|| format!("Failed to write HTML report: {}", path.display()))?;

        info!(file = %path.display(), "wrote HTML report");
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// RUN SUMMARY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub mode: MatchMode,
    pub records_path: Option<PathBuf>,
    pub roster_path: Option<PathBuf>,
    pub identities: usize,
    pub stats: MatchStats,
}

impl RunSummary {
    pub fn new(config: &CheckConfig, identities: usize, stats: MatchStats) -> Self {
        RunSummary {
            generated_at: Utc::now(),
            mode: config.mode,
            records_path: config.records_path.clone(),
            roster_path: config.roster_path.clone(),
            identities,
            stats,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write run summary: {}", path.display()))?;

        info!(file = %path.display(), "wrote run summary");
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
