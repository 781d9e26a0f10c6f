//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use tonal_domain::AnalysisRecord;

/// Widest the text column gets before truncation.
const TEXT_COLUMN_WIDTH: usize = 40;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format one completed analysis.
    pub fn format_analysis(&self, record: &AnalysisRecord, summary: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_records_json(std::slice::from_ref(record)),
            OutputFormat::Table => Ok(summary.to_string()),
            OutputFormat::Quiet => Ok(record.predicted.label().to_string()),
        }
    }

    /// Format history records.
    pub fn format_records(&self, records: &[AnalysisRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_records_json(records),
            OutputFormat::Table => self.format_records_table(records),
            OutputFormat::Quiet => self.format_records_quiet(records),
        }
    }

    /// Format records as JSON.
    fn format_records_json(&self, records: &[AnalysisRecord]) -> Result<String> {
        let json_records: Vec<serde_json::Value> = records
            .iter()
            .map(|r| {
                serde_json::json!({
                    "timestamp": r.timestamp(),
                    "text": r.text,
                    "scores": {
                        "positive": r.scores.positive,
                        "negative": r.scores.negative,
                        "neutral": r.scores.neutral,
                    },
                    "predicted_label": r.predicted.label(),
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json_records)?)
    }

    /// Format records as a table.
    fn format_records_table(&self, records: &[AnalysisRecord]) -> Result<String> {
        if records.is_empty() {
            return Ok(self.colorize("История пуста.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record([
            "Дата",
            "Текст",
            "Позитивный",
            "Негативный",
            "Нейтральный",
            "Метка",
        ]);

        for record in records {
            let timestamp = record.timestamp();
            let text = truncate(&record.text, TEXT_COLUMN_WIDTH);
            let positive = format!("{:.2}", record.scores.positive);
            let negative = format!("{:.2}", record.scores.negative);
            let neutral = format!("{:.2}", record.scores.neutral);
            builder.push_record([
                timestamp.as_str(),
                text.as_str(),
                positive.as_str(),
                negative.as_str(),
                neutral.as_str(),
                record.predicted.label(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format records in quiet mode: one "timestamp: label" line each.
    fn format_records_quiet(&self, records: &[AnalysisRecord]) -> Result<String> {
        let lines: Vec<String> = records.iter().map(|r| r.history_line()).collect();
        Ok(lines.join("\n"))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Truncate to at most `max` characters, appending an ellipsis when cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}
