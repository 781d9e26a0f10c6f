//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Implementations live in other crates: the SQLite history
//! in `tonal-store`, the model gateway in `tonal-classifier`.

use crate::classification::Classification;
use crate::record::AnalysisRecord;

/// Trait for the external zero-shot classification model
///
/// The model is an opaque collaborator: it receives the text plus the
/// ordered candidate labels and returns label/score pairs sorted by
/// descending score. Implementations must not retry on failure; a single
/// failed attempt is reported to the caller.
pub trait ClassifierGateway {
    /// Error type for classification operations
    type Error;

    /// Classify `text` against the ordered candidate `labels`.
    ///
    /// May block for seconds; callers run it off the control thread.
    fn classify(&self, text: &str, labels: &[&str]) -> Result<Classification, Self::Error>;

    /// Whether the model finished loading and can accept classify calls.
    ///
    /// A gateway whose model failed to load stays not-ready forever and
    /// every submission fails fast instead of reaching the model.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Trait for the append-only analysis history
///
/// Records are immutable and never updated or deleted within this system;
/// the only read is by recency.
pub trait HistoryStore {
    /// Error type for store operations
    type Error;

    /// Append one completed analysis to the history.
    fn append(&mut self, record: &AnalysisRecord) -> Result<(), Self::Error>;

    /// The most recent analyses, newest first, at most `limit` of them.
    fn recent(&self, limit: usize) -> Result<Vec<AnalysisRecord>, Self::Error>;
}
