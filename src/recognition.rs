//! Pluggable image classification.
//!
//! The recognition workflow only needs a label and a confidence for a blob of
//! image bytes. [`Classifier`] captures that contract; which implementation
//! runs is a deployment choice made in [`crate::config`]:
//!
//! - [`SimulatedClassifier`] picks a catalogue monument at random with a
//!   confidence between 80% and 99%.
//! - [`HttpClassifier`] posts the bytes to an external prediction service and
//!   relays its answer. The call is bounded by a request timeout.
//!
//! Labels are turned back into monuments by [`resolve_label`].

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::error::ClassifyError;
use crate::model::Monument;
use crate::store::MonumentStore;

/// What a classifier saw in an image.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    /// Percentage in `0.0..=100.0`.
    pub confidence: f64,
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> Result<Classification, ClassifyError>;
}

/// Labels emitted by the external model, mapped to catalogue names.
/// Labels for landmarks outside the catalogue have no entry.
const LABEL_ALIASES: [(&str, &str); 4] = [
    ("el_jem", "El Djem Amphitheater"),
    ("okba_mosque", "Great Mosque of Kairouan"),
    ("amphitheatre_carthage", "Ruins of Carthage"),
    ("zaytouna_mosque", "Zaytuna Mosque"),
];

/// Finds the monument a label refers to: first by display name, then through
/// the model alias table.
pub fn resolve_label(store: &MonumentStore, label: &str) -> Option<Monument> {
    if let Some(monument) = store.find_monument_by_name(label) {
        return Some(monument);
    }
    let key = label.trim().to_lowercase();
    LABEL_ALIASES
    .iter()
    .find(|(alias, _)| *alias == key)
    .and_then(|(_, name)| store.find_monument_by_name(name))
}

// --- SIMULATED ---

pub struct SimulatedClassifier {
    labels: Vec<String>,
    rng: Mutex<StdRng>,
}

impl SimulatedClassifier {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels, rng: Mutex::new(StdRng::from_entropy()) }
    }

    /// Deterministic variant for tests.
    pub fn with_seed(labels: Vec<String>, seed: u64) -> Self {
        Self { labels, rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }

    /// Uses the names of every monument currently in `store` as labels.
    pub fn from_store(store: &MonumentStore) -> Self {
        Self::new(store.get_monuments().into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl Classifier for SimulatedClassifier {
    async fn classify(&self, _image: &[u8]) -> Result<Classification, ClassifyError> {
        if self.labels.is_empty() {
            return Err(ClassifyError::NoLabels);
        }
        let mut rng = self.rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let label = self.labels[rng.gen_range(0..self.labels.len())].clone();
        let confidence = f64::from(rng.gen_range(80u32..100));
        Ok(Classification { label, confidence })
    }
}

// --- HTTP ---

pub const DEFAULT_CLASSIFIER_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct PredictResponse {
    predicted_class: String,
    /// Fraction in `0.0..=1.0`.
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct PredictError {
    error: String,
}

/// Forwards images to `POST {base_url}/predict` as multipart field `file`.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: Client,
    predict_url: String,
    timeout: Duration,
}

impl HttpClassifier {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()?;
        Ok(Self {
            client,
            predict_url: format!("{}/predict", base_url.trim_end_matches('/')),
            timeout,
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    fn transport_error(&self, err: reqwest::Error) -> ClassifyError {
        if err.is_timeout() {
            ClassifyError::Timeout {
                url: self.predict_url.clone(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            ClassifyError::Network { url: self.predict_url.clone(), message: err.to_string() }
        }
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, image: &[u8]) -> Result<Classification, ClassifyError> {
        let part = Part::bytes(image.to_vec()).file_name("upload");
        let form = Form::new().part("file", part);

        let resp = self
        .client
        .post(&self.predict_url)
        .multipart(form)
        .send()
        .await
        .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<PredictError>(&body)
            .map(|e| e.error)
            .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(ClassifyError::Status {
                url: self.predict_url.clone(),
                status: status.as_u16(),
                message,
            });
        }

        let prediction: PredictResponse = serde_json::from_slice(&body).map_err(|e| {
            ClassifyError::InvalidResponse { url: self.predict_url.clone(), message: e.to_string() }
        })?;

        if !(0.0..=1.0).contains(&prediction.confidence) {
            return Err(ClassifyError::InvalidResponse {
                url: self.predict_url.clone(),
                message: format!("confidence {} is outside 0..=1", prediction.confidence),
            });
        }

        Ok(Classification {
            label: prediction.predicted_class,
            confidence: prediction.confidence * 100.0,
        })
    }
}
