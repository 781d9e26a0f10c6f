//! Events published by the workflow to the presentation layer

use tonal_domain::AnalysisRecord;

/// Failure taxonomy surfaced to the user.
///
/// Every failure is terminal for the single request that raised it; nothing
/// is retried automatically and the session returns to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The model never loaded; no submission can proceed
    NotReady,
    /// Blank text was submitted
    EmptyInput,
    /// A request was already running when another was submitted
    Busy,
    /// The model call raised or timed out
    Classification,
    /// Persistence I/O failed on append or query
    Storage,
    /// Anything unexpected, caught at the process boundary
    Internal,
}

impl FailureKind {
    /// Stable lowercase name, used in logs and quiet output.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NotReady => "not_ready",
            FailureKind::EmptyInput => "empty_input",
            FailureKind::Busy => "busy",
            FailureKind::Classification => "classification",
            FailureKind::Storage => "storage",
            FailureKind::Internal => "internal",
        }
    }
}

/// Outcome of one dispatched analysis, delivered over the session channel.
#[derive(Debug, Clone)]
pub enum AnalysisEvent {
    /// Classification succeeded; the record may or may not have been
    /// persisted (a storage fault arrives as a separate `Failed` event)
    Completed {
        /// The completed, immutable analysis
        record: AnalysisRecord,
        /// Pre-rendered result text for display
        summary: String,
    },

    /// Something went wrong after dispatch
    Failed {
        /// Which part of the workflow failed
        kind: FailureKind,
        /// User-visible cause message
        message: String,
    },
}
