//! API error responses
//!
//! Every error leaves the service as `{"detail": "..."}`.

use crate::delegate::DelegateError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete request body
    #[error("{detail}")]
    Validation { status: StatusCode, detail: String },
    /// The delegate failed to produce a document
    #[error("PRD generation error: {0}")]
    Delegate(#[from] DelegateError),
}

impl ApiError {
    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::Validation {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { status, .. } => *status,
            Self::Delegate(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delegate_error_is_500_with_cause() {
        let err = ApiError::from(DelegateError::Completion("quota exceeded".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "PRD generation error: completion failed: quota exceeded"
        );
    }

    #[test]
    fn test_validation_keeps_status() {
        let err = ApiError::unprocessable("query must not be empty");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "query must not be empty");
    }
}
