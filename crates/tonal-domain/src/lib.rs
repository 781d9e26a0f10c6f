//! Tonal Domain Layer
//!
//! This crate contains the core domain model for Tonal, a Russian-language
//! text tonality analyzer. It defines the fundamental value objects and the
//! trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Sentiment**: one of the three fixed candidate labels
//!   (positive / negative / neutral) the zero-shot model scores against
//! - **ScoreSet**: one probability per sentiment, with argmax selection
//! - **Classification**: the raw label/score pairs returned by the model
//! - **AnalysisRecord**: one completed analysis, immutable once created
//!
//! ## Architecture
//!
//! Infrastructure implementations (SQLite history, HTTP classifier) live in
//! other crates and plug in through the traits defined in [`traits`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classification;
pub mod record;
pub mod sentiment;
pub mod traits;

// Re-exports for convenience
pub use classification::{Classification, ScoreSet};
pub use record::{AnalysisRecord, TIMESTAMP_FORMAT};
pub use sentiment::{Sentiment, CANDIDATE_LABELS};
