use std::path::PathBuf;

use thiserror::Error;
use warp::http::StatusCode;

/// An insertable payload failed schema validation at the route boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Validation error: {0} must not be empty")]
    EmptyField(&'static str),

    #[error("Validation error: category \"{0}\" is not one of the known categories")]
    UnknownCategory(String),

    #[error("Validation error: coordinates ({lat}, {lng}) are out of range")]
    CoordinatesOutOfRange { lat: f64, lng: f64 },

    #[error("Validation error: confidence must be a percentage like \"87%\", got \"{0}\"")]
    InvalidConfidence(String),

    #[error("Validation error: timestamp \"{0}\" is not an ISO-8601 date-time")]
    InvalidTimestamp(String),

    #[error("Validation error: monumentId must be a positive integer")]
    InvalidMonumentId,
}

/// Writing an uploaded file to the uploads directory failed.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("failed to create uploads directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write upload {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The recognition collaborator could not produce a usable answer.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("classifier at {url} did not answer within {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("classifier at {url} is unreachable: {message}")]
    Network { url: String, message: String },

    #[error("classifier at {url} replied with HTTP {status}: {message}")]
    Status { url: String, status: u16, message: String },

    #[error("classifier at {url} sent an unreadable reply: {message}")]
    InvalidResponse { url: String, message: String },

    #[error("classifier has no labels to choose from")]
    NoLabels,
}

/// Everything a route handler can fail with, mapped onto HTTP statuses.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Classifier(#[from] ClassifyError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Classifier(ClassifyError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Classifier(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Client-facing message. Internal failures never leak their cause.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Upload(_) => "Failed to process image recognition".to_string(),
            ApiError::Classifier(ClassifyError::Timeout { .. }) => {
                "Recognition service timed out".to_string()
            }
            ApiError::Classifier(_) => "Recognition service is unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ApiError::BadRequest("Invalid monument ID".into()), StatusCode::BAD_REQUEST)]
    #[case(ApiError::NotFound("Monument not found".into()), StatusCode::NOT_FOUND)]
    #[case(ApiError::Validation(ValidationError::InvalidMonumentId), StatusCode::BAD_REQUEST)]
    #[case(
        ApiError::Classifier(ClassifyError::Timeout { url: "http://ml/predict".into(), timeout_secs: 5 }),
        StatusCode::GATEWAY_TIMEOUT
    )]
    #[case(
        ApiError::Classifier(ClassifyError::Network { url: "http://ml/predict".into(), message: "refused".into() }),
        StatusCode::BAD_GATEWAY
    )]
    fn errors_map_to_statuses(#[case] error: ApiError, #[case] status: StatusCode) {
        assert_eq!(error.status(), status);
    }

    #[test]
    fn upload_failures_hide_their_cause() {
        let error = ApiError::Upload(UploadError::Write {
            path: PathBuf::from("/srv/uploads/secret.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!error.public_message().contains("secret"));
    }

    #[test]
    fn validation_message_is_passed_through() {
        let error = ApiError::from(ValidationError::EmptyField("imageUrl"));
        assert_eq!(error.public_message(), "Validation error: imageUrl must not be empty");
    }
}
