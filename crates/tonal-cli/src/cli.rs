//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tonal CLI - zero-shot tonality analysis for Russian-language text.
#[derive(Debug, Parser)]
#[command(name = "tonal")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// History database path (overrides config)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Inference endpoint URL (overrides config)
    #[arg(short, long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (one line per record)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a text and save the result to history
    Analyze(AnalyzeArgs),

    /// Show recent analyses
    History(HistoryArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Text to analyze (mutually exclusive with --file)
    pub text: Option<String>,

    /// Read the text from a UTF-8 file
    #[arg(short = 'F', long, conflicts_with = "text")]
    pub file: Option<PathBuf>,
}

/// Arguments for the history command.
#[derive(Debug, Parser)]
pub struct HistoryArgs {
    /// Maximum number of entries to show
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_inline_text() {
        let cli = Cli::parse_from(["tonal", "analyze", "Сегодня отличная погода"]);
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.text.as_deref(), Some("Сегодня отличная погода"));
                assert!(args.file.is_none());
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_analyze_from_file() {
        let cli = Cli::parse_from(["tonal", "analyze", "--file", "input.txt"]);
        match cli.command {
            Command::Analyze(args) => {
                assert!(args.text.is_none());
                assert_eq!(args.file.unwrap().to_str(), Some("input.txt"));
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_analyze_rejects_text_and_file_together() {
        let result = Cli::try_parse_from(["tonal", "analyze", "текст", "--file", "input.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_history_limit() {
        let cli = Cli::parse_from(["tonal", "history", "--limit", "10"]);
        match cli.command {
            Command::History(args) => assert_eq!(args.limit, Some(10)),
            _ => panic!("Expected History command"),
        }
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::parse_from([
            "tonal",
            "--endpoint",
            "http://inference:8085",
            "--db",
            "/tmp/t.db",
            "history",
        ]);
        assert_eq!(cli.endpoint.as_deref(), Some("http://inference:8085"));
        assert_eq!(cli.db.unwrap().to_str(), Some("/tmp/t.db"));
    }
}
