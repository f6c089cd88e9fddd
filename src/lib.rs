//! TuniTales monument service.
//!
//! An in-memory monument catalogue served over a small REST JSON API, plus a
//! photo-upload recognition workflow backed by a pluggable classifier.

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod recognition;
pub mod seed;
pub mod server;
pub mod store;
pub mod uploads;

pub use error::{ApiError, ClassifyError, UploadError, ValidationError};
pub use model::{Monument, NewMonument, RecognitionOutcome, RecognitionResult, UserImage};
pub use server::{routes, AppState, TuniServer};
pub use store::MonumentStore;
