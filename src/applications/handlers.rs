use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{ApplyOutcome, ResumeUpload},
    repo_types::Application,
    services::ApplicationWorkflow,
};
use crate::{accounts::AuthUser, error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/applications", post(apply))
        .route("/applications/mine", get(my_applications))
}

fn bad_multipart(e: MultipartError) -> AppError {
    match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge,
        _ => AppError::Validation(e.body_text()),
    }
}

/// POST /applications (multipart)
/// Fields: `job_id` (or `jobId`) and the `resume` file.
#[instrument(skip(workflow, mp))]
pub async fn apply(
    State(workflow): State<ApplicationWorkflow>,
    AuthUser(email): AuthUser,
    mut mp: Multipart,
) -> Result<ApplyOutcome, AppError> {
    let mut job_id: Option<i64> = None;
    let mut resume: Option<ResumeUpload> = None;

    while let Some(field) = mp.next_field().await.map_err(bad_multipart)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("job_id") | Some("jobId") => {
                let text = field.text().await.map_err(bad_multipart)?;
                let id = text
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| AppError::Validation("job_id must be an integer".into()))?;
                job_id = Some(id);
            }
            Some("resume") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".into());
                let body = field.bytes().await.map_err(bad_multipart)?;
                resume = Some(ResumeUpload {
                    file_name,
                    content_type,
                    body,
                });
            }
            other => {
                warn!(field = ?other, "ignoring unexpected multipart field");
            }
        }
    }

    let job_id = job_id.ok_or_else(|| AppError::Validation("job_id is required".into()))?;
    let resume = resume.ok_or_else(|| AppError::Validation("resume is required".into()))?;

    workflow.submit_application(job_id, &email, resume).await
}

#[instrument(skip(workflow))]
pub async fn my_applications(
    State(workflow): State<ApplicationWorkflow>,
    AuthUser(email): AuthUser,
) -> Result<Json<Vec<Application>>, AppError> {
    workflow.list_my_applications(&email).await.map(Json)
}
