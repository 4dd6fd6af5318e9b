use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, warn};

use super::{
    dto::CreateJobRequest,
    repo::JobRepo,
    repo_types::{Job, NewJob},
};
use crate::{
    accounts::{AccountRepo, Role},
    error::{AppError, Resource},
    state::AppState,
};

/// Creates and lists job postings on behalf of employer accounts.
#[derive(Clone)]
pub struct JobPostings {
    accounts: Arc<dyn AccountRepo>,
    jobs: Arc<dyn JobRepo>,
}

impl FromRef<AppState> for JobPostings {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.accounts.clone(), state.jobs.clone())
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl JobPostings {
    pub fn new(accounts: Arc<dyn AccountRepo>, jobs: Arc<dyn JobRepo>) -> Self {
        Self { accounts, jobs }
    }

    pub async fn create_job(
        &self,
        req: CreateJobRequest,
        employer_email: &str,
    ) -> Result<Job, AppError> {
        let title = req.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".into()));
        }
        if let Some(salary) = req.salary {
            if !salary.is_finite() || salary < 0.0 {
                return Err(AppError::Validation("Salary must be a non-negative number".into()));
            }
        }

        let employer = self
            .accounts
            .find_by_email(employer_email)
            .await?
            .ok_or(AppError::NotFound(Resource::Employer))?;
        if employer.role != Role::Employer {
            warn!(account_id = employer.id, "non-employer tried to post a job");
            return Err(AppError::Forbidden);
        }

        let job = self
            .jobs
            .create(NewJob {
                title: title.to_string(),
                description: trimmed(req.description),
                location: trimmed(req.location),
                salary: req.salary,
                employer_id: employer.id,
            })
            .await?;

        info!(job_id = job.id, employer_id = employer.id, "job created");
        Ok(job)
    }

    pub async fn list_jobs(&self) -> Result<Vec<Job>, AppError> {
        Ok(self.jobs.list_all().await?)
    }

    pub async fn get_job(&self, id: i64) -> Result<Job, AppError> {
        self.jobs
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound(Resource::Job))
    }
}
