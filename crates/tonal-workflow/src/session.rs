//! Analysis session - the context object coordinating one request at a time

use crate::event::{AnalysisEvent, FailureKind};
use chrono::{Local, NaiveDateTime, Timelike};
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tonal_domain::traits::{ClassifierGateway, HistoryStore};
use tonal_domain::{AnalysisRecord, ScoreSet, Sentiment};

/// How long `shutdown` waits for an in-flight analysis before aborting it.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Errors returned synchronously by session operations
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Blank text submitted
    #[error("empty input: nothing to analyze")]
    EmptyInput,

    /// The model is not loaded
    #[error("model is not loaded")]
    NotReady,

    /// Another request is already running
    #[error("an analysis is already running")]
    Busy,

    /// History query failed
    #[error("history unavailable: {0}")]
    Storage(String),
}

impl WorkflowError {
    /// The failure taxonomy bucket for this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            WorkflowError::EmptyInput => FailureKind::EmptyInput,
            WorkflowError::NotReady => FailureKind::NotReady,
            WorkflowError::Busy => FailureKind::Busy,
            WorkflowError::Storage(_) => FailureKind::Storage,
        }
    }
}

/// Session context owning the classifier gateway and the history store.
///
/// Replaces ambient handles with one explicit object: the gateway and the
/// store are opened once per session and released when the session shuts
/// down. At most one analysis is in flight at any time, which keeps store
/// appends serialized by construction.
pub struct AnalysisSession<G, S> {
    gateway: Arc<G>,
    store: Arc<Mutex<S>>,
    events: mpsc::UnboundedSender<AnalysisEvent>,
    busy: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
    in_flight: Option<JoinHandle<()>>,
}

impl<G, S> AnalysisSession<G, S>
where
    G: ClassifierGateway + Send + Sync + 'static,
    G::Error: Display + Send + 'static,
    S: HistoryStore + Send + 'static,
    S::Error: Display,
{
    /// Create a session and the receiver its events are delivered on.
    pub fn new(gateway: G, store: S) -> (Self, mpsc::UnboundedReceiver<AnalysisEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let session = Self {
            gateway: Arc::new(gateway),
            store: Arc::new(Mutex::new(store)),
            events,
            busy: Arc::new(AtomicBool::new(false)),
            cancelled: Arc::new(AtomicBool::new(false)),
            in_flight: None,
        };
        (session, receiver)
    }

    /// Whether the model is loaded and submissions can proceed.
    pub fn is_ready(&self) -> bool {
        self.gateway.is_ready()
    }

    /// Submit one text for analysis.
    ///
    /// Validates and dispatches without blocking the caller; the outcome
    /// arrives later as an [`AnalysisEvent`]. Returns an error immediately
    /// when the text is blank, the model is not loaded, or another request
    /// is still running — none of these dispatch anything or write to the
    /// store.
    pub fn submit(&mut self, text: &str) -> Result<(), WorkflowError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(WorkflowError::EmptyInput);
        }
        if !self.gateway.is_ready() {
            return Err(WorkflowError::NotReady);
        }
        // Compare-and-swap keeps this the only in-flight request; the flag
        // is cleared by the task itself on every completion path.
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(WorkflowError::Busy);
        }

        tracing::debug!(chars = trimmed.len(), "analysis dispatched");

        let text = trimmed.to_string();
        let gateway = Arc::clone(&self.gateway);
        let store = Arc::clone(&self.store);
        let events = self.events.clone();
        let busy = Arc::clone(&self.busy);
        let cancelled = Arc::clone(&self.cancelled);

        self.in_flight = Some(tokio::spawn(async move {
            let outcome = run_analysis(gateway, store, cancelled, text).await;
            // Back to idle before observers hear the outcome, so a handler
            // reacting to the event can submit again immediately.
            busy.store(false, Ordering::SeqCst);
            for event in outcome {
                let _ = events.send(event);
            }
        }));

        Ok(())
    }

    /// The most recent analyses, newest first.
    ///
    /// A storage fault degrades to an error the caller can display; it never
    /// touches any in-flight analysis.
    pub async fn recent_history(&self, limit: usize) -> Result<Vec<AnalysisRecord>, WorkflowError> {
        let store = self.store.lock().await;
        store
            .recent(limit)
            .map_err(|e| WorkflowError::Storage(e.to_string()))
    }

    /// Shut the session down, waiting up to `grace` for an in-flight task.
    ///
    /// Cooperative: the cancellation flag keeps an abandoned task from
    /// writing to the store, the join-with-timeout gives it a chance to
    /// finish cleanly, and only after the grace expires is the task aborted.
    /// The store handle is released exactly once when the last reference
    /// drops, on every exit path.
    pub async fn shutdown(mut self, grace: Duration) {
        self.cancelled.store(true, Ordering::SeqCst);

        if let Some(mut handle) = self.in_flight.take() {
            if tokio::time::timeout(grace, &mut handle).await.is_err() {
                tracing::warn!("in-flight analysis exceeded shutdown grace, aborting");
                handle.abort();
            }
        }

        tracing::info!("analysis session closed");
    }
}

/// One analysis from dispatch to outcome.
///
/// Returns the events to publish, in order. An abandoned analysis returns
/// nothing at all: no store write, no events.
async fn run_analysis<G, S>(
    gateway: Arc<G>,
    store: Arc<Mutex<S>>,
    cancelled: Arc<AtomicBool>,
    text: String,
) -> Vec<AnalysisEvent>
where
    G: ClassifierGateway + Send + Sync + 'static,
    G::Error: Display + Send + 'static,
    S: HistoryStore + Send + 'static,
    S::Error: Display,
{
    let failed = |kind: FailureKind, message: String| vec![AnalysisEvent::Failed { kind, message }];

    // The model call is the only slow step; run it off the async threads.
    let input = text.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let labels = Sentiment::candidate_labels();
        gateway.classify(&input, &labels)
    })
    .await;

    let classification = match outcome {
        Ok(Ok(classification)) => classification,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "classification failed");
            return failed(FailureKind::Classification, e.to_string());
        }
        Err(e) => {
            tracing::error!(error = %e, "classification task panicked");
            return failed(FailureKind::Internal, e.to_string());
        }
    };

    let scores = match ScoreSet::try_from(&classification) {
        Ok(scores) => scores,
        Err(e) => return failed(FailureKind::Classification, e.to_string()),
    };

    // Shutdown began while we were classifying: an abandoned task must not
    // reach the store.
    if cancelled.load(Ordering::SeqCst) {
        tracing::debug!("analysis abandoned during shutdown, result discarded");
        return Vec::new();
    }

    let record = AnalysisRecord::new(completion_timestamp(), text, scores);
    let summary = record.summary();

    let append_result = {
        let mut store = store.lock().await;
        store.append(&record)
    };

    // The computed result is never lost to a storage fault: completion is
    // published first, the fault arrives as its own event.
    let mut out = vec![AnalysisEvent::Completed { record, summary }];
    if let Err(e) = append_result {
        tracing::error!(error = %e, "failed to persist analysis");
        out.push(AnalysisEvent::Failed {
            kind: FailureKind::Storage,
            message: format!("result was not saved: {}", e),
        });
    }
    out
}

/// Wall-clock completion time, truncated to second precision.
fn completion_timestamp() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonal_classifier::MockClassifier;
    use tonal_domain::Classification;

    /// In-memory store for exercising the workflow without SQLite.
    struct VecStore {
        records: Vec<AnalysisRecord>,
    }

    impl VecStore {
        fn new() -> Self {
            Self {
                records: Vec::new(),
            }
        }
    }

    impl HistoryStore for VecStore {
        type Error = String;

        fn append(&mut self, record: &AnalysisRecord) -> Result<(), Self::Error> {
            self.records.push(record.clone());
            Ok(())
        }

        fn recent(&self, limit: usize) -> Result<Vec<AnalysisRecord>, Self::Error> {
            let mut out = self.records.clone();
            out.reverse();
            out.truncate(limit);
            Ok(out)
        }
    }

    /// Store that fails every append but still answers queries.
    struct BrokenAppendStore;

    impl HistoryStore for BrokenAppendStore {
        type Error = String;

        fn append(&mut self, _record: &AnalysisRecord) -> Result<(), Self::Error> {
            Err("disk full".to_string())
        }

        fn recent(&self, _limit: usize) -> Result<Vec<AnalysisRecord>, Self::Error> {
            Ok(Vec::new())
        }
    }

    fn positive_gateway() -> MockClassifier {
        MockClassifier::scoring(0.82, 0.05, 0.13)
    }

    #[tokio::test]
    async fn test_empty_submission_rejected_without_dispatch() {
        let gateway = positive_gateway();
        let (mut session, mut events) = AnalysisSession::new(gateway.clone(), VecStore::new());

        assert!(matches!(session.submit(""), Err(WorkflowError::EmptyInput)));
        assert!(matches!(
            session.submit("   "),
            Err(WorkflowError::EmptyInput)
        ));

        // Nothing dispatched, nothing written, no events.
        assert_eq!(gateway.call_count(), 0);
        assert!(session.recent_history(10).await.unwrap().is_empty());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_not_ready_submission_rejected() {
        let gateway = positive_gateway();
        gateway.set_ready(false);
        let (mut session, _events) = AnalysisSession::new(gateway.clone(), VecStore::new());

        assert!(!session.is_ready());
        assert!(matches!(
            session.submit("текст"),
            Err(WorkflowError::NotReady)
        ));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_analysis_persists_and_publishes() {
        let (mut session, mut events) =
            AnalysisSession::new(positive_gateway(), VecStore::new());

        session.submit("Сегодня отличная погода").unwrap();

        match events.recv().await.unwrap() {
            AnalysisEvent::Completed { record, summary } => {
                assert_eq!(record.text, "Сегодня отличная погода");
                assert_eq!(record.scores, ScoreSet::new(0.82, 0.05, 0.13));
                assert_eq!(record.predicted, Sentiment::Positive);
                assert!(summary.contains("Основной тон: Позитивный"));
            }
            other => panic!("expected Completed, got {:?}", other),
        }

        let history = session.recent_history(1).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text, "Сегодня отличная погода");
    }

    #[tokio::test]
    async fn test_submitted_text_is_trimmed() {
        let (mut session, mut events) =
            AnalysisSession::new(positive_gateway(), VecStore::new());

        session.submit("  хорошо  \n").unwrap();

        match events.recv().await.unwrap() {
            AnalysisEvent::Completed { record, .. } => assert_eq!(record.text, "хорошо"),
            other => panic!("expected Completed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_classification_failure_writes_nothing() {
        let gateway = positive_gateway();
        gateway.add_error("сломайся", "model exploded");
        let (mut session, mut events) = AnalysisSession::new(gateway, VecStore::new());

        session.submit("сломайся").unwrap();

        match events.recv().await.unwrap() {
            AnalysisEvent::Failed { kind, message } => {
                assert_eq!(kind, FailureKind::Classification);
                assert!(message.contains("model exploded"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }

        assert!(session.recent_history(10).await.unwrap().is_empty());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_malformed_response_is_classification_failure() {
        let gateway = MockClassifier::new(Classification {
            labels: vec!["Sarcastic".into()],
            scores: vec![1.0],
        });
        let (mut session, mut events) = AnalysisSession::new(gateway, VecStore::new());

        session.submit("текст").unwrap();

        match events.recv().await.unwrap() {
            AnalysisEvent::Failed { kind, .. } => assert_eq!(kind, FailureKind::Classification),
            other => panic!("expected Failed, got {:?}", other),
        }
        assert!(session.recent_history(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_result_visible() {
        let (mut session, mut events) =
            AnalysisSession::new(positive_gateway(), BrokenAppendStore);

        session.submit("текст").unwrap();

        // Completion first, with the correct scores.
        match events.recv().await.unwrap() {
            AnalysisEvent::Completed { record, .. } => {
                assert_eq!(record.scores, ScoreSet::new(0.82, 0.05, 0.13));
            }
            other => panic!("expected Completed, got {:?}", other),
        }

        // The storage fault arrives separately and names persistence.
        match events.recv().await.unwrap() {
            AnalysisEvent::Failed { kind, message } => {
                assert_eq!(kind, FailureKind::Storage);
                assert!(message.contains("was not saved"));
                assert!(message.contains("disk full"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_second_submission_rejected_while_running() {
        let gateway = positive_gateway().with_delay(Duration::from_millis(100));
        let (mut session, mut events) = AnalysisSession::new(gateway.clone(), VecStore::new());

        session.submit("первый").unwrap();
        assert!(matches!(
            session.submit("второй"),
            Err(WorkflowError::Busy)
        ));

        // The first request completes unaffected, exactly once.
        match events.recv().await.unwrap() {
            AnalysisEvent::Completed { record, .. } => assert_eq!(record.text, "первый"),
            other => panic!("expected Completed, got {:?}", other),
        }
        assert!(events.try_recv().is_err());
        assert_eq!(gateway.call_count(), 1);

        let history = session.recent_history(10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text, "первый");
    }

    #[tokio::test]
    async fn test_session_idle_again_after_completion() {
        let (mut session, mut events) =
            AnalysisSession::new(positive_gateway(), VecStore::new());

        session.submit("раз").unwrap();
        assert!(matches!(events.recv().await, Some(AnalysisEvent::Completed { .. })));

        // Busy flag cleared: a new submission goes through.
        session.submit("два").unwrap();
        assert!(matches!(events.recv().await, Some(AnalysisEvent::Completed { .. })));
        assert_eq!(session.recent_history(10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_session_idle_again_after_failure() {
        let gateway = positive_gateway();
        gateway.add_error("сломайся", "boom");
        let (mut session, mut events) = AnalysisSession::new(gateway, VecStore::new());

        session.submit("сломайся").unwrap();
        assert!(matches!(events.recv().await, Some(AnalysisEvent::Failed { .. })));

        session.submit("хорошо").unwrap();
        assert!(matches!(events.recv().await, Some(AnalysisEvent::Completed { .. })));
    }

    #[tokio::test]
    async fn test_error_kind_mapping() {
        assert_eq!(WorkflowError::EmptyInput.kind(), FailureKind::EmptyInput);
        assert_eq!(WorkflowError::NotReady.kind(), FailureKind::NotReady);
        assert_eq!(WorkflowError::Busy.kind(), FailureKind::Busy);
        assert_eq!(
            WorkflowError::Storage("x".into()).kind(),
            FailureKind::Storage
        );
    }
}
