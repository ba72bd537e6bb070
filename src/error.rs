use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::inference::ModelError;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Model(_) | Self::Template(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns a machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Model(_) => "MODEL_ERROR",
            Self::Template(_) => "TEMPLATE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Error response body structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.code(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(ModelError::Shape {
                expected: 4,
                actual: 3
            })
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(ModelError::Invalid("x".into())).code(),
            "MODEL_ERROR"
        );
        let template = AppError::from(askama::Error::Fmt(std::fmt::Error));
        assert_eq!(template.code(), "TEMPLATE_ERROR");
        assert_eq!(template.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorResponse {
            error: ErrorDetail {
                code: "INTERNAL_ERROR",
                message: "Internal server error: boom".to_string(),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
        assert!(json["error"]["message"].as_str().unwrap().contains("boom"));
    }
}
