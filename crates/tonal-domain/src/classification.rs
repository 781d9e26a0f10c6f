//! Classification output - raw model responses and per-sentiment score sets

use crate::sentiment::{Sentiment, CANDIDATE_LABELS};
use std::fmt;

/// Raw output of one zero-shot classification call.
///
/// `labels[i]` and `scores[i]` correspond positionally, and the model
/// returns `labels` sorted by descending score. The model is a black box:
/// this type only captures its wire contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Candidate labels, sorted by descending score
    pub labels: Vec<String>,
    /// Probability per label, same order as `labels`
    pub scores: Vec<f64>,
}

/// Error converting a raw [`Classification`] into a [`ScoreSet`].
///
/// Raised when the model response is malformed: a label outside the fixed
/// candidate set, a missing label, or mismatched label/score lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedClassification(pub String);

impl fmt::Display for MalformedClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed classification: {}", self.0)
    }
}

impl std::error::Error for MalformedClassification {}

/// One probability per sentiment, as produced by a completed classification.
///
/// The three probabilities lie in [0,1] and sum to ~1 by the model contract;
/// this type does not enforce the sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSet {
    /// Score for the positive label
    pub positive: f64,
    /// Score for the negative label
    pub negative: f64,
    /// Score for the neutral label
    pub neutral: f64,
}

impl ScoreSet {
    /// Create a score set from explicit per-sentiment values.
    pub fn new(positive: f64, negative: f64, neutral: f64) -> Self {
        Self {
            positive,
            negative,
            neutral,
        }
    }

    /// Score for a given sentiment.
    pub fn get(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    /// The sentiment with the highest score.
    ///
    /// Ties resolve to the earliest label in candidate declaration order,
    /// matching the ordering the zero-shot model applies to its own output.
    ///
    /// # Examples
    ///
    /// ```
    /// use tonal_domain::{ScoreSet, Sentiment};
    ///
    /// let scores = ScoreSet::new(0.82, 0.05, 0.13);
    /// assert_eq!(scores.predicted(), Sentiment::Positive);
    /// ```
    pub fn predicted(&self) -> Sentiment {
        let mut best = CANDIDATE_LABELS[0];
        for &candidate in &CANDIDATE_LABELS[1..] {
            // Strict comparison keeps the earlier candidate on a tie.
            if self.get(candidate) > self.get(best) {
                best = candidate;
            }
        }
        best
    }
}

impl TryFrom<&Classification> for ScoreSet {
    type Error = MalformedClassification;

    fn try_from(classification: &Classification) -> Result<Self, Self::Error> {
        if classification.labels.len() != classification.scores.len() {
            return Err(MalformedClassification(format!(
                "{} labels but {} scores",
                classification.labels.len(),
                classification.scores.len()
            )));
        }

        let mut by_label = [None; 3];
        for (label, &score) in classification.labels.iter().zip(&classification.scores) {
            let sentiment = Sentiment::from_label(label).ok_or_else(|| {
                MalformedClassification(format!("unknown label: {}", label))
            })?;
            let slot = &mut by_label[sentiment as usize];
            if slot.is_some() {
                return Err(MalformedClassification(format!(
                    "duplicate label: {}",
                    label
                )));
            }
            *slot = Some(score);
        }

        match by_label {
            [Some(positive), Some(negative), Some(neutral)] => Ok(ScoreSet {
                positive,
                negative,
                neutral,
            }),
            _ => Err(MalformedClassification(
                "response does not cover all three candidate labels".to_string(),
            )),
        }
    }
}
