use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Which lookup came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Job,
    Applicant,
    Employer,
    Account,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Job => "Job",
            Resource::Applicant => "Applicant",
            Resource::Employer => "Employer",
            Resource::Account => "Account",
        };
        f.write_str(name)
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(Resource),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("Access denied")]
    Forbidden,

    #[error("Upload too large")]
    PayloadTooLarge,

    #[error("storage failure: {0}")]
    Storage(anyhow::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Storage(e) => {
                error!(error = %format!("{e:#}"), "storage failure");
                "Storage failure".to_string()
            }
            AppError::Internal(e) => {
                error!(error = %format!("{e:#}"), "internal error");
                "An internal server error occurred".to_string()
            }
            other => other.to_string(),
        };
        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_resource() {
        assert_eq!(AppError::NotFound(Resource::Job).to_string(), "Job not found");
        assert_eq!(
            AppError::NotFound(Resource::Applicant).to_string(),
            "Applicant not found"
        );
        assert_eq!(AppError::NotFound(Resource::Job).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn payload_too_large_maps_to_413() {
        assert_eq!(AppError::PayloadTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(AppError::PayloadTooLarge.to_string(), "Upload too large");
    }

    #[tokio::test]
    async fn server_errors_hide_details() {
        let res = AppError::Storage(anyhow::anyhow!("disk on fire")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Storage failure");
    }
}
