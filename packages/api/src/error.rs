//! HTTP-facing error type.
//!
//! Every handler returns `Result<_, ApiError>`; the error renders as the JSON
//! envelope `{"status":"error","msg":...}`. Internal failures keep their cause
//! and the call stack at the point of conversion, are logged when rendered,
//! and reach the client only as `"Internal error"`.

use std::backtrace::Backtrace;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::HashError;

pub const INTERNAL_ERROR_MSG: &str = "Internal error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("{error:#}")]
    Internal { error: anyhow::Error, stack: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Wrap an unexpected failure, capturing the current call stack.
    pub fn internal(error: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            error: error.into(),
            stack: Backtrace::force_capture().to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        Self::internal(error)
    }
}

impl From<HashError> for ApiError {
    fn from(error: HashError) -> Self {
        Self::internal(error)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::internal(error)
    }
}

/// The `{"status": ..., "msg": ...}` envelope shared by every error response.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    pub status: &'a str,
    pub msg: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = match &self {
            ApiError::Internal { error, stack } => {
                tracing::error!(error = %format!("{error:#}"), stack = %stack, "request failed");
                INTERNAL_ERROR_MSG.to_string()
            }
            other => other.to_string(),
        };

        (
            status,
            Json(Envelope {
                status: "error",
                msg: &msg,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Forbidden("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::internal(anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_keeps_cause_and_stack() {
        let err = ApiError::from(anyhow!("disk on fire").context("saving note"));
        match &err {
            ApiError::Internal { stack, .. } => assert!(!stack.is_empty()),
            other => panic!("unexpected variant: {other:?}"),
        }
        let text = err.to_string();
        assert!(text.contains("saving note"));
        assert!(text.contains("disk on fire"));
    }

    #[test]
    fn test_internal_hides_details_from_client() {
        let response = ApiError::internal(anyhow!("secret detail")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
