use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{dto::CreateJobRequest, repo_types::Job, services::JobPostings};
use crate::{accounts::AuthUser, error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/:id", get(get_job))
}

#[instrument(skip(postings, payload))]
pub async fn create_job(
    State(postings): State<JobPostings>,
    AuthUser(email): AuthUser,
    Json(payload): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let job = postings.create_job(payload, &email).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[instrument(skip(postings))]
pub async fn list_jobs(State(postings): State<JobPostings>) -> Result<Json<Vec<Job>>, AppError> {
    postings.list_jobs().await.map(Json)
}

#[instrument(skip(postings))]
pub async fn get_job(
    State(postings): State<JobPostings>,
    Path(id): Path<i64>,
) -> Result<Json<Job>, AppError> {
    postings.get_job(id).await.map(Json)
}
