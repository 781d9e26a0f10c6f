//! Tonal Classifier Gateway Layer
//!
//! Pluggable implementations of the `ClassifierGateway` trait from
//! `tonal-domain`.
//!
//! # Gateways
//!
//! - `MockClassifier`: deterministic mock for testing
//! - `HttpClassifier`: zero-shot inference over a local HTTP endpoint
//!
//! # Examples
//!
//! ```
//! use tonal_classifier::MockClassifier;
//! use tonal_domain::traits::ClassifierGateway;
//! use tonal_domain::Sentiment;
//!
//! let gateway = MockClassifier::scoring(0.82, 0.05, 0.13);
//! let labels = Sentiment::candidate_labels();
//! let result = gateway.classify("Сегодня отличная погода", &labels).unwrap();
//! assert_eq!(result.labels[0], "Позитивный");
//! ```

#![warn(missing_docs)]

pub mod http;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tonal_domain::traits::ClassifierGateway;
use tonal_domain::Classification;

pub use http::HttpClassifier;

/// Errors that can occur during classification
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// The model never finished loading; no classify call can succeed
    #[error("Model is not loaded")]
    NotReady,

    /// The model endpoint is unreachable or errored internally
    #[error("Classification failed: {0}")]
    Unavailable(String),

    /// The requested model does not exist at the endpoint
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The model answered with something other than label/score pairs
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Scripted outcome for a specific input text
#[derive(Debug, Clone)]
enum Scripted {
    Respond(Classification),
    Fail(String),
}

/// Mock classifier for deterministic testing
///
/// Returns pre-configured classifications without touching any model.
/// Shares its call counter and script across clones, so a test can keep a
/// handle while the workflow owns another.
///
/// # Examples
///
/// ```
/// use tonal_classifier::MockClassifier;
/// use tonal_domain::traits::ClassifierGateway;
///
/// let gateway = MockClassifier::scoring(0.1, 0.7, 0.2);
/// let labels = tonal_domain::Sentiment::candidate_labels();
/// gateway.classify("всё плохо", &labels).unwrap();
/// assert_eq!(gateway.call_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockClassifier {
    default_response: Classification,
    script: Arc<Mutex<HashMap<String, Scripted>>>,
    call_count: Arc<AtomicUsize>,
    ready: Arc<AtomicBool>,
    delay: Option<Duration>,
}

impl MockClassifier {
    /// Create a mock that answers every text with the given classification.
    pub fn new(default_response: Classification) -> Self {
        Self {
            default_response,
            script: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
            ready: Arc::new(AtomicBool::new(true)),
            delay: None,
        }
    }

    /// Create a mock answering with the given per-sentiment scores,
    /// returned sorted by descending score like the real model.
    pub fn scoring(positive: f64, negative: f64, neutral: f64) -> Self {
        let mut pairs = vec![
            ("Позитивный", positive),
            ("Негативный", negative),
            ("Нейтральный", neutral),
        ];
        pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Self::new(Classification {
            labels: pairs.iter().map(|(l, _)| l.to_string()).collect(),
            scores: pairs.iter().map(|(_, s)| *s).collect(),
        })
    }

    /// Script a specific classification for a specific input text.
    pub fn add_response(&self, text: impl Into<String>, response: Classification) {
        self.script
            .lock()
            .unwrap()
            .insert(text.into(), Scripted::Respond(response));
    }

    /// Script a failure for a specific input text.
    pub fn add_error(&self, text: impl Into<String>, message: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .insert(text.into(), Scripted::Fail(message.into()));
    }

    /// Toggle readiness, simulating a model that failed to load.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Sleep this long inside every classify call, simulating slow inference.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of classify calls made so far, across all clones.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl ClassifierGateway for MockClassifier {
    type Error = ClassifierError;

    fn classify(&self, text: &str, _labels: &[&str]) -> Result<Classification, Self::Error> {
        if !self.is_ready() {
            return Err(ClassifierError::NotReady);
        }

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        self.call_count.fetch_add(1, Ordering::SeqCst);

        let script = self.script.lock().unwrap();
        match script.get(text) {
            Some(Scripted::Respond(response)) => Ok(response.clone()),
            Some(Scripted::Fail(message)) => Err(ClassifierError::Unavailable(message.clone())),
            None => Ok(self.default_response.clone()),
        }
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}
