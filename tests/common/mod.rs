#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tunitales::error::ClassifyError;
use tunitales::recognition::{Classification, Classifier};
use tunitales::uploads::UploadDir;
use tunitales::{AppState, MonumentStore};

pub const BOUNDARY: &str = "tunitales-test-boundary";

/// Always answers with the same label and confidence.
pub struct FixedClassifier {
    pub label: String,
    pub confidence: f64,
}

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(&self, _image: &[u8]) -> Result<Classification, ClassifyError> {
        Ok(Classification { label: self.label.clone(), confidence: self.confidence })
    }
}

pub fn fixed(label: &str, confidence: f64) -> Arc<dyn Classifier> {
    Arc::new(FixedClassifier { label: label.to_string(), confidence })
}

/// Seeded state writing uploads into a fresh temp dir. Keep the dir alive for the test.
pub fn state_with(classifier: Arc<dyn Classifier>) -> (Arc<AppState>, TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    let uploads = UploadDir::new(dir.path());
    let state = AppState::new(MonumentStore::new(), uploads, classifier);
    (Arc::new(state), dir)
}

pub struct FilePart<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub bytes: &'a [u8],
}

pub fn image_part(bytes: &[u8]) -> FilePart<'_> {
    FilePart {
        name: "image",
        filename: Some("el_djem.jpg"),
        content_type: Some("image/jpeg"),
        bytes,
    }
}

/// Hand-built `multipart/form-data` body using [`BOUNDARY`].
pub fn multipart_body(parts: &[FilePart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(filename) = part.filename {
            disposition.push_str(&format!("; filename=\"{}\"", filename));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(ct) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", ct).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// A few bytes that look like the start of a JPEG.
pub const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
