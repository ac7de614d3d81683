// crates/schematic-cli/src/output.rs
//
// Output formatting utilities for the schematic CLI.
// Supports plain text, table, and JSON output.

use serde::Serialize;
use tabled::{Table, Tabled};

use schematic_core::ScanMatch;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text and tables (default).
    Text,
    /// JSON output for machine consumption.
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

fn percent(value: f32) -> String {
    format!("{:.2}%", value * 100.0)
}

/// A row in the scan results table.
#[derive(Tabled)]
pub struct ScanRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Creator")]
    creator: String,
    #[tabled(rename = "Geometric")]
    geometric: String,
    #[tabled(rename = "Watermark")]
    watermark: String,
    #[tabled(rename = "Overall")]
    overall: String,
    #[tabled(rename = "Warning")]
    warning: String,
}

impl From<&ScanMatch> for ScanRow {
    fn from(m: &ScanMatch) -> Self {
        Self {
            id: m.id.clone(),
            title: m.title.clone(),
            creator: m.creator_name.clone(),
            geometric: percent(m.report.geometric),
            watermark: percent(m.report.watermark),
            overall: percent(m.report.overall),
            warning: if m.report.possible_plagiarism() {
                "different creator".to_string()
            } else {
                String::new()
            },
        }
    }
}
