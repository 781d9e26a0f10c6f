//! Sentiment module - the fixed candidate label set

use std::fmt;

/// One of the three tonality classes the model scores every text against.
///
/// The variant order is the candidate-label declaration order sent to the
/// model with every request. Ties between equal scores resolve to the
/// earliest variant in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    /// Positive tonality ("Позитивный")
    Positive,
    /// Negative tonality ("Негативный")
    Negative,
    /// Neutral tonality ("Нейтральный")
    Neutral,
}

/// The fixed candidate label set, in declaration order.
///
/// Supplied verbatim with every classification request; the model has never
/// seen these labels during training (zero-shot).
pub const CANDIDATE_LABELS: [Sentiment; 3] =
    [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

impl Sentiment {
    /// The Russian candidate label sent to the model and persisted in history.
    ///
    /// # Examples
    ///
    /// ```
    /// use tonal_domain::Sentiment;
    ///
    /// assert_eq!(Sentiment::Positive.label(), "Позитивный");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Позитивный",
            Sentiment::Negative => "Негативный",
            Sentiment::Neutral => "Нейтральный",
        }
    }

    /// Parse a candidate label back into a sentiment.
    ///
    /// This is primarily for the storage layer and for mapping model output;
    /// returns `None` for anything outside the fixed label set.
    ///
    /// # Examples
    ///
    /// ```
    /// use tonal_domain::Sentiment;
    ///
    /// assert_eq!(Sentiment::from_label("Нейтральный"), Some(Sentiment::Neutral));
    /// assert_eq!(Sentiment::from_label("Sarcastic"), None);
    /// ```
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Позитивный" => Some(Sentiment::Positive),
            "Негативный" => Some(Sentiment::Negative),
            "Нейтральный" => Some(Sentiment::Neutral),
            _ => None,
        }
    }

    /// All candidate labels as strings, in declaration order.
    pub fn candidate_labels() -> Vec<&'static str> {
        CANDIDATE_LABELS.iter().map(|s| s.label()).collect()
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_roundtrip() {
        for sentiment in CANDIDATE_LABELS {
            assert_eq!(Sentiment::from_label(sentiment.label()), Some(sentiment));
        }
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(Sentiment::from_label(""), None);
        assert_eq!(Sentiment::from_label("positive"), None);
        assert_eq!(Sentiment::from_label("Позитивный "), None);
    }

    #[test]
    fn test_candidate_order() {
        // Declaration order is a contract: it decides argmax tie-breaks
        // and the order labels are sent to the model.
        assert_eq!(
            Sentiment::candidate_labels(),
            vec!["Позитивный", "Негативный", "Нейтральный"]
        );
    }

    #[test]
    fn test_display_matches_label() {
        assert_eq!(Sentiment::Negative.to_string(), Sentiment::Negative.label());
    }
}
