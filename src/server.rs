use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Buf;
use futures_util::{TryFutureExt, TryStreamExt};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};
use warp::http::header::{HeaderValue, CONTENT_TYPE};
use warp::http::StatusCode;
use warp::multipart::FormData;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::config::parse_origin;
use crate::error::ApiError;
use crate::model::{
    format_confidence, timestamp_now, NewRecognitionResult, NewUserImage, RecognitionOutcome,
    ALL_MONUMENTS,
};
use crate::recognition::{resolve_label, Classifier};
use crate::store::MonumentStore;
use crate::uploads::{UploadDir, DEFAULT_MAX_UPLOAD_BYTES};

/// Multipart field carrying the photo on `POST /recognize`.
pub const IMAGE_FIELD: &str = "image";

/// Everything a request handler needs. Built once at startup.
pub struct AppState {
    pub store: MonumentStore,
    pub uploads: UploadDir,
    pub classifier: Arc<dyn Classifier>,
    pub max_upload_bytes: u64,
}

impl AppState {
    pub fn new(store: MonumentStore, uploads: UploadDir, classifier: Arc<dyn Classifier>) -> Self {
        Self { store, uploads, classifier, max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

pub struct TuniServer {
    state: Arc<AppState>,
    cors_origins: Vec<String>,
}

impl TuniServer {
    pub fn new(state: Arc<AppState>, cors_origins: Vec<String>) -> Self {
        Self { state, cors_origins }
    }

    /// Serves the API on `addr` until `shutdown` resolves.
    pub async fn run(
        &self,
        addr: SocketAddr,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), warp::Error> {
        let routes = routes(self.state.clone())
        .with(self.cors())
        .with(warp::trace::request());

        let (bound, server) = warp::serve(routes).try_bind_with_graceful_shutdown(addr, shutdown)?;
        info!("TuniTales API listening on {}", bound);
        server.await;
        info!("Server stopped");
        Ok(())
    }

    fn cors(&self) -> warp::cors::Builder {
        let origins: Vec<String> = self
        .cors_origins
        .iter()
        .filter_map(|origin| match parse_origin(origin) {
            Ok(origin) => Some(origin),
            Err(e) => {
                warn!("Ignoring CORS origin: {}", e);
                None
            }
        })
        .collect();

        warp::cors()
        .allow_origins(origins.iter().map(String::as_str))
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["content-type"])
        .max_age(Duration::from_secs(60 * 60))
    }
}

/// The full API with JSON error replies for every rejection.
///
/// Paths are matched before methods so an unknown path stays a 404.
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    // 1. GET /monuments
    let list_monuments = warp::path!("monuments")
    .and(warp::get())
    .and(with_state(state.clone()))
    .map(|state: Arc<AppState>| reply_json(StatusCode::OK, &state.store.get_monuments()));

    // 2. GET /monuments/:id
    let get_monument = warp::path!("monuments" / String)
    .and(warp::get())
    .and(with_state(state.clone()))
    .map(|raw_id: String, state: Arc<AppState>| {
        let result = parse_id(&raw_id, "Invalid monument ID").and_then(|id| {
            u64::try_from(id)
            .ok()
            .and_then(|id| state.store.get_monument_by_id(id))
            .ok_or_else(|| ApiError::NotFound("Monument not found".to_string()))
        });
        respond(result, "Error getting monument")
    });

    // 3. GET /monuments/category/:category
    let by_category = warp::path!("monuments" / "category" / String)
    .and(warp::get())
    .and(with_state(state.clone()))
    .map(|raw: String, state: Arc<AppState>| {
        let result = decode_segment(&raw).map(|category| {
            if category == ALL_MONUMENTS {
                state.store.get_monuments()
            } else {
                state.store.get_monuments_by_category(&category)
            }
        });
        respond(result, "Error getting monuments by category")
    });

    // 4. POST /recognize
    let max_upload_bytes = state.max_upload_bytes;
    let recognize = warp::path!("recognize")
    .and(warp::post())
    .and(warp::multipart::form().max_length(max_upload_bytes))
    .and(with_state(state.clone()))
    .and_then(|form: FormData, state: Arc<AppState>| async move {
        let result = recognize_upload(form, &state).await;
        Ok::<_, Infallible>(respond(result, "Error processing image recognition"))
    });

    // 5. GET /recognition-results
    let list_results = warp::path!("recognition-results")
    .and(warp::get())
    .and(with_state(state.clone()))
    .map(|state: Arc<AppState>| {
        reply_json(StatusCode::OK, &state.store.get_recognition_results())
    });

    // 6. GET /recognition-results/:id
    let get_result = warp::path!("recognition-results" / String)
    .and(warp::get())
    .and(with_state(state.clone()))
    .map(|raw_id: String, state: Arc<AppState>| {
        let result = parse_id(&raw_id, "Invalid recognition result ID").and_then(|id| {
            u64::try_from(id)
            .ok()
            .and_then(|id| state.store.get_recognition_result_by_id(id))
            .ok_or_else(|| ApiError::NotFound("Recognition result not found".to_string()))
        });
        respond(result, "Error getting recognition result")
    });

    // 7. GET /health
    let health = warp::path!("health")
    .and(warp::get())
    .map(|| reply_json(StatusCode::OK, &json!({ "status": "ok" })));

    // 8. GET /uploads/*
    let uploads = warp::path("uploads")
    .and(warp::get())
    .and(warp::fs::dir(state.uploads.root().to_path_buf()));

    list_monuments
    .or(get_monument)
    .unify()
    .or(by_category)
    .unify()
    .or(recognize)
    .unify()
    .or(list_results)
    .unify()
    .or(get_result)
    .unify()
    .or(health)
    .unify()
    .or(uploads.map(|file: warp::fs::File| file.into_response()))
    .unify()
    .recover(handle_rejection)
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

// --- RECOGNITION WORKFLOW ---

struct ImageUpload {
    filename: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// Returns the first non-empty `image` part of the form, if any.
async fn read_image(form: FormData) -> Result<Option<ImageUpload>, ApiError> {
    let mut form = Box::pin(form);
    let malformed = |e: warp::Error| ApiError::BadRequest(format!("Malformed multipart body: {}", e));

    while let Some(part) = form.try_next().await.map_err(malformed)? {
        if part.name() != IMAGE_FIELD {
            continue;
        }
        let filename = part.filename().map(str::to_owned);
        let content_type = part.content_type().map(str::to_owned);
        let bytes = part
        .stream()
        .try_fold(Vec::new(), |mut acc, chunk| async move {
            acc.extend_from_slice(chunk.chunk());
            Ok(acc)
        })
        .map_err(malformed)
        .await?;

        if !bytes.is_empty() {
            return Ok(Some(ImageUpload { filename, content_type, bytes }));
        }
    }
    Ok(None)
}

/// Upload, register, classify, record, mark processed. The three store
/// mutations are sequential and not transactional.
pub async fn recognize_upload(form: FormData, state: &AppState) -> Result<RecognitionOutcome, ApiError> {
    let upload = read_image(form)
    .await?
    .ok_or_else(|| ApiError::BadRequest("No image file provided".to_string()))?;

    let is_image = upload
    .content_type
    .as_deref()
    .map_or(false, |ct| ct.trim().to_ascii_lowercase().starts_with("image/"));
    if !is_image {
        return Err(ApiError::BadRequest("Only image files are allowed".to_string()));
    }

    let stored = state.uploads.save(upload.filename.as_deref(), &upload.bytes).await?;
    let image_url = stored.public_url();

    let new_image = NewUserImage {
        image_url: image_url.clone(),
        processed: false,
        timestamp: timestamp_now(),
    };
    new_image.validate()?;
    let user_image = state.store.save_user_image(new_image);

    let classification = state.classifier.classify(&upload.bytes).await?;
    let monument = resolve_label(&state.store, &classification.label).ok_or_else(|| {
        ApiError::NotFound(format!(
            "Recognized landmark \"{}\" is not in the catalogue",
            classification.label
        ))
    })?;

    let new_result = NewRecognitionResult {
        monument_id: monument.id,
        image_url,
        confidence: format_confidence(classification.confidence),
        timestamp: timestamp_now(),
    };
    new_result.validate()?;
    let recognition = state.store.save_recognition_result(new_result);
    state.store.update_user_image(user_image.id, true);

    info!(
        "Recognized {} as {:?} ({})",
        stored.filename, monument.name, recognition.confidence
    );
    Ok(RecognitionOutcome { recognition, monument })
}

// --- REPLIES ---

/// Any integer is a well-formed id. Negative ids parse but match no record.
fn parse_id(raw: &str, message: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::BadRequest(message.to_string()))
}

fn decode_segment(raw: &str) -> Result<String, ApiError> {
    percent_decode_str(raw)
    .decode_utf8()
    .map(|s| s.into_owned())
    .map_err(|_| ApiError::BadRequest("Invalid category".to_string()))
}

fn respond<T: Serialize>(result: Result<T, ApiError>, context: &str) -> Response {
    match result {
        Ok(value) => reply_json(StatusCode::OK, &value),
        Err(err) => {
            let status = err.status();
            if status.is_server_error() {
                error!("{}: {}", context, err);
            }
            message_reply(status, &err.public_message())
        }
    }
}

fn reply_json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => {
            let mut response = Response::new(body.into());
            *response.status_mut() = status;
            response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            message_reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

fn message_reply(status: StatusCode, message: &str) -> Response {
    warp::reply::with_status(warp::reply::json(&json!({ "message": message })), status)
    .into_response()
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Image exceeds the upload size limit")
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length header is required")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else if err.find::<warp::reject::MissingHeader>().is_some()
    || err.find::<warp::reject::InvalidHeader>().is_some()
    || err.find::<warp::reject::UnsupportedMediaType>().is_some()
    {
        (StatusCode::BAD_REQUEST, "No image file provided")
    } else {
        error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    };
    Ok(message_reply(status, message))
}
