use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;

/// Uploaded resume as received from the client.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub body: Bytes,
}

/// Result of a submission. Both variants are successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    AlreadyApplied,
}

impl ApplyOutcome {
    pub fn message(self) -> &'static str {
        match self {
            ApplyOutcome::Applied => "Job Applied Successfully!",
            ApplyOutcome::AlreadyApplied => "You already applied for this job!",
        }
    }
}

impl IntoResponse for ApplyOutcome {
    fn into_response(self) -> Response {
        (StatusCode::OK, self.message()).into_response()
    }
}
