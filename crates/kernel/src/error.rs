//! Application error types.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::format::FormatError;
use crate::jsonapi::MEDIA_TYPE;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("not found")]
    NotFound,

    #[error("menu formatting failed")]
    Format(#[from] FormatError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) | AppError::Format(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // In responses stay vague; details go to the log only.
        let title = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                "internal server error"
            }
            AppError::Format(e) => {
                tracing::error!(error = %e, "menu formatting failed");
                "internal server error"
            }
            AppError::NotFound => "not found",
        };

        let body = json!({
            "jsonapi": { "version": "1.0" },
            "errors": [
                { "status": status.as_u16().to_string(), "title": title }
            ],
        });

        let mut response = (status, body.to_string()).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE));
        response
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
