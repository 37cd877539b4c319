//! Error types for finboard-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use finboard_core::{
    CoreError, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorDetails, ErrorLogger,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Bad request: {message}")]
    BadRequest { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest { message: message.into() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(error) => match error {
                CoreError::InvalidMonth { .. }
                | CoreError::CategoryNotFound { .. }
                | CoreError::EmptyLedger => StatusCode::NOT_FOUND,
                CoreError::InvalidFormat { .. } => StatusCode::BAD_REQUEST,
                CoreError::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn to_details(&self) -> ErrorDetails {
        match self {
            ApiError::Core(error) => error.to_details(),
            ApiError::BadRequest { .. } => ErrorDetails::new(ErrorCode::InvalidFormat, self.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Core(error) => {
                DefaultErrorLogger.log_error(error, &ErrorContext::new("api".to_string()))
            }
            other => log::warn!(target: "finboard::error", "{}", other),
        }

        (self.status(), Json(self.to_details())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
