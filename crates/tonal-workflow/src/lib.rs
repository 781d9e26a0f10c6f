//! Tonal Analysis Workflow
//!
//! Coordinates one classification request end to end: validate, dispatch to
//! the model off the control thread, persist the completed analysis, and
//! publish the outcome to observers.
//!
//! # Architecture
//!
//! - At most one request is in flight per session; a second submission is
//!   rejected as busy rather than queued
//! - The classification call is the only slow operation and runs on a
//!   blocking task; store appends and queries stay on the control side
//! - A failed append never suppresses the computed result: the completion
//!   event is published regardless, with a separate storage-failure event
//! - Shutdown is cooperative: a cancellation flag keeps an abandoned task
//!   from ever writing to the store, and the session joins the task with a
//!   timeout before releasing the store handle
//!
//! # Examples
//!
//! ```no_run
//! use tonal_workflow::{AnalysisSession, AnalysisEvent};
//! use tonal_classifier::MockClassifier;
//! use tonal_store::SqliteStore;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = MockClassifier::scoring(0.82, 0.05, 0.13);
//! let store = SqliteStore::open(":memory:")?;
//! let (mut session, mut events) = AnalysisSession::new(gateway, store);
//!
//! session.submit("Сегодня отличная погода")?;
//! if let Some(AnalysisEvent::Completed { summary, .. }) = events.recv().await {
//!     println!("{}", summary);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod event;
pub mod session;

pub use event::{AnalysisEvent, FailureKind};
pub use session::{AnalysisSession, WorkflowError, DEFAULT_SHUTDOWN_GRACE};
