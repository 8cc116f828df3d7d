//! # Error Handling
//!
//! This module defines the service's error taxonomy and how each variant is
//! converted into an HTTP response.
//!
//! ## Error Categories:
//! - **UnsupportedFileType**: the client uploaded a file with an extension
//!   outside the allow-list (400, client-recoverable)
//! - **BadRequest**: malformed multipart payload or missing `file` part (400)
//! - **Io**: failure writing or reading the temporary artifact (500)
//! - **Transcription**: failure inside the transcription backend (500, with
//!   the underlying message embedded)
//! - **ModelUnavailable**: a request arrived while no model is ready (503)
//!
//! Every per-request failure is caught at the handler boundary and mapped to
//! exactly one JSON error response of the shape `{"detail": <message>}`.
//! Temp-file cleanup failures are deliberately *not* part of this taxonomy:
//! they are logged where they happen and never surfaced to the client.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

use crate::upload;

#[derive(Debug)]
pub enum AppError {
    /// Uploaded filename has an extension outside the allow-list.
    /// Carries the offending suffix (with leading dot, possibly empty).
    UnsupportedFileType { extension: String },

    /// Client sent a malformed or incomplete multipart payload.
    BadRequest(String),

    /// Failure persisting or reading the temporary artifact.
    Io(String),

    /// The transcription backend failed; carries the underlying message.
    Transcription(String),

    /// No ready model to serve the request. Startup aborts on load failure,
    /// so outside of tests this state is unreachable.
    ModelUnavailable,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::UnsupportedFileType { extension } => write!(
                f,
                "Unsupported file type: {}. Supported types: {}",
                extension,
                upload::allowed_extensions_list()
            ),
            AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::Io(msg) => write!(f, "{}", msg),
            AppError::Transcription(msg) => write!(f, "Transcription failed: {}", msg),
            AppError::ModelUnavailable => write!(f, "Transcription model is not ready"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnsupportedFileType { .. } | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Io(_) | AppError::Transcription(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "detail": self.to_string(),
        }))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

/// Multipart parse failures are the client's fault, not ours.
impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Invalid multipart payload: {}", err))
    }
}

/// Shorthand for `Result<T, AppError>`.
pub type AppResult<T> = Result<T, AppError>;
