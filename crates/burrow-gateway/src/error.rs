use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use burrow_core::ShortenerError;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

pub enum AppError {
    InvalidJson(String),
    Shortener(ShortenerError),
    NotFound,
}

impl From<ShortenerError> for AppError {
    fn from(value: ShortenerError) -> Self {
        Self::Shortener(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::InvalidJson(value.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidJson(message) => {
                (StatusCode::BAD_REQUEST, format!("invalid json: {message}"))
            }
            AppError::Shortener(e @ ShortenerError::InvalidUrl(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Shortener(e) => {
                error!(error = %e, "failed to shorten url");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "short url not found".to_string()),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
