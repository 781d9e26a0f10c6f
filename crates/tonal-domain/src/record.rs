//! Analysis records - one immutable row of history per completed analysis

use crate::classification::ScoreSet;
use crate::sentiment::Sentiment;
use chrono::NaiveDateTime;
use std::fmt::Write as _;

/// Timestamp format used everywhere a record is persisted or displayed.
///
/// Second precision, lexicographically sortable.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One completed classification.
///
/// Records are immutable once created and correspond to exactly one
/// successful model call; failed calls never become records. The predicted
/// sentiment is derived from the scores at construction and never stored
/// inconsistently with them.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    /// When the analysis completed, second precision
    pub completed_at: NaiveDateTime,

    /// The analyzed input text, non-empty
    pub text: String,

    /// Per-sentiment probabilities from the model
    pub scores: ScoreSet,

    /// The highest-scoring sentiment (candidate order breaks ties)
    pub predicted: Sentiment,
}

impl AnalysisRecord {
    /// Create a record for an analysis that completed at `completed_at`.
    ///
    /// The predicted sentiment is computed here rather than taken from the
    /// caller, so a record can never disagree with its own scores.
    ///
    /// # Examples
    ///
    /// ```
    /// use tonal_domain::{AnalysisRecord, ScoreSet, Sentiment};
    /// use chrono::NaiveDate;
    ///
    /// let completed_at = NaiveDate::from_ymd_opt(2024, 5, 17)
    ///     .unwrap()
    ///     .and_hms_opt(12, 30, 0)
    ///     .unwrap();
    /// let record = AnalysisRecord::new(completed_at, "Сегодня отличная погода", ScoreSet::new(0.82, 0.05, 0.13));
    /// assert_eq!(record.predicted, Sentiment::Positive);
    /// ```
    pub fn new(completed_at: NaiveDateTime, text: impl Into<String>, scores: ScoreSet) -> Self {
        Self {
            completed_at,
            text: text.into(),
            scores,
            predicted: scores.predicted(),
        }
    }

    /// The record timestamp rendered in [`TIMESTAMP_FORMAT`].
    pub fn timestamp(&self) -> String {
        self.completed_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Multi-line result text shown to the user after an analysis.
    ///
    /// # Examples
    ///
    /// ```
    /// use tonal_domain::{AnalysisRecord, ScoreSet};
    /// use chrono::NaiveDate;
    ///
    /// let completed_at = NaiveDate::from_ymd_opt(2024, 5, 17)
    ///     .unwrap()
    ///     .and_hms_opt(12, 30, 0)
    ///     .unwrap();
    /// let record = AnalysisRecord::new(completed_at, "текст", ScoreSet::new(0.82, 0.05, 0.13));
    /// assert!(record.summary().contains("Позитивный: 0.82"));
    /// assert!(record.summary().contains("Основной тон: Позитивный"));
    /// ```
    pub fn summary(&self) -> String {
        let mut out = String::from("Результаты анализа:\n");
        for sentiment in crate::sentiment::CANDIDATE_LABELS {
            let _ = writeln!(out, "{}: {:.2}", sentiment.label(), self.scores.get(sentiment));
        }
        let _ = write!(out, "Основной тон: {}", self.predicted.label());
        out
    }

    /// One-line history entry: "timestamp: predicted label".
    pub fn history_line(&self) -> String {
        format!("{}: {}", self.timestamp(), self.predicted.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_predicted_derived_from_scores() {
        let record = AnalysisRecord::new(noon(), "плохо", ScoreSet::new(0.1, 0.8, 0.1));
        assert_eq!(record.predicted, Sentiment::Negative);
    }

    #[test]
    fn test_timestamp_format() {
        let record = AnalysisRecord::new(noon(), "текст", ScoreSet::new(0.5, 0.3, 0.2));
        assert_eq!(record.timestamp(), "2024-05-17 12:00:00");
    }

    #[test]
    fn test_summary_layout() {
        let record = AnalysisRecord::new(noon(), "текст", ScoreSet::new(0.82, 0.05, 0.13));
        let summary = record.summary();

        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Результаты анализа:",
                "Позитивный: 0.82",
                "Негативный: 0.05",
                "Нейтральный: 0.13",
                "Основной тон: Позитивный",
            ]
        );
    }

    #[test]
    fn test_history_line() {
        let record = AnalysisRecord::new(noon(), "текст", ScoreSet::new(0.1, 0.2, 0.7));
        assert_eq!(record.history_line(), "2024-05-17 12:00:00: Нейтральный");
    }
}
