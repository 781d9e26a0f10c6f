//! HTTP gateway to a zero-shot classification endpoint
//!
//! Speaks the zero-shot pipeline wire contract: the endpoint receives the
//! text plus the ordered candidate labels and answers with label/score
//! pairs sorted by descending score. The model behind the endpoint is a
//! black box; only this contract matters.
//!
//! # Examples
//!
//! ```no_run
//! use tonal_classifier::HttpClassifier;
//!
//! let gateway = HttpClassifier::new(
//!     "http://localhost:8085",
//!     "DeepPavlov/rubert-base-cased-conversational",
//! ).unwrap();
//! // gateway.warm_up() loads the model; classify calls fail fast until then
//! ```

use crate::ClassifierError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tonal_domain::traits::ClassifierGateway;
use tonal_domain::Classification;

/// Default inference endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8085";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "DeepPavlov/rubert-base-cased-conversational";

/// Default timeout for classification requests (inference takes seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Probe text used by [`HttpClassifier::warm_up`]
const WARM_UP_TEXT: &str = "ок";

/// Request body for the zero-shot classification API
#[derive(Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [&'a str],
}

/// Response from the zero-shot classification API
#[derive(Deserialize)]
struct ZeroShotResponse {
    labels: Vec<String>,
    scores: Vec<f64>,
}

/// Gateway to a zero-shot classification model served over HTTP
///
/// The model loads once per session: [`HttpClassifier::warm_up`] sends a
/// probe request and flips the gateway ready on success. A failed warm-up
/// is surfaced immediately and every later classify call fails fast with
/// [`ClassifierError::NotReady`] instead of reaching the endpoint.
///
/// No retry on failure: a single failed attempt is reported to the caller.
pub struct HttpClassifier {
    endpoint: String,
    model: String,
    client: reqwest::blocking::Client,
    ready: AtomicBool,
}

impl HttpClassifier {
    /// Create a gateway for the given endpoint and model.
    ///
    /// The gateway starts not-ready; call [`HttpClassifier::warm_up`] once
    /// at session start.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ClassifierError> {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a gateway with an explicit per-request timeout.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClassifierError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassifierError::Unavailable(format!("client setup failed: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client,
            ready: AtomicBool::new(false),
        })
    }

    /// Load the model by sending a probe classification.
    ///
    /// Blocks until the endpoint answers (the first request typically pulls
    /// the model into memory). On success the gateway becomes ready; on
    /// failure it stays not-ready and the error carries the cause.
    pub fn warm_up(&self) -> Result<(), ClassifierError> {
        let labels = tonal_domain::Sentiment::candidate_labels();
        self.request(WARM_UP_TEXT, &labels)?;
        self.ready.store(true, Ordering::SeqCst);
        tracing::info!(model = %self.model, "classification model loaded");
        Ok(())
    }

    /// One classification request, no readiness gate and no retry.
    fn request(&self, text: &str, labels: &[&str]) -> Result<Classification, ClassifierError> {
        let url = format!("{}/models/{}", self.endpoint, self.model);
        let body = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels: labels,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| ClassifierError::Unavailable(format!("request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ClassifierError::ModelNotAvailable(self.model.clone()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClassifierError::Unavailable(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: ZeroShotResponse = response
            .json()
            .map_err(|e| ClassifierError::InvalidResponse(format!("failed to parse: {}", e)))?;

        if parsed.labels.len() != parsed.scores.len() {
            return Err(ClassifierError::InvalidResponse(format!(
                "{} labels but {} scores",
                parsed.labels.len(),
                parsed.scores.len()
            )));
        }

        Ok(Classification {
            labels: parsed.labels,
            scores: parsed.scores,
        })
    }
}

impl ClassifierGateway for HttpClassifier {
    type Error = ClassifierError;

    fn classify(&self, text: &str, labels: &[&str]) -> Result<Classification, Self::Error> {
        if !self.is_ready() {
            return Err(ClassifierError::NotReady);
        }
        self.request(text, labels)
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}
