use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use quotevote_core::{DbError, ErrorKind, ServiceError};
use serde_json::json;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid vote data: {0}")]
    MalformedPayload(String),

    #[error("No quotes found")]
    NoQuotes,

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::NoQuotes => StatusCode::NOT_FOUND,
            AppError::Service(err) => match err.kind() {
                ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::StoreUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::MalformedPayload(_) => ErrorKind::InvalidArgument.as_str(),
            AppError::NoQuotes => ErrorKind::NotFound.as_str(),
            AppError::Service(err) => err.kind().as_str(),
            AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(
                "event=http_error module=server status=error code={} kind={} error={}",
                status.as_u16(),
                self.kind(),
                self
            );
            "Database error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message, "kind": self.kind() }))).into_response()
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Store setup failed: {0}")]
    Store(#[from] DbError),

    #[error("Network error: {0}")]
    Io(#[from] std::io::Error),
}
