use std::sync::Arc;

use axum::extract::FromRef;
use time::OffsetDateTime;
use tracing::{error, info, warn};

use super::{
    dto::{ApplyOutcome, ResumeUpload},
    repo::ApplicationRepo,
    repo_types::{Application, NewApplication},
};
use crate::{
    accounts::AccountRepo,
    error::{AppError, Resource},
    jobs::JobRepo,
    state::AppState,
    storage::StorageClient,
};

const FALLBACK_FILE_NAME: &str = "resume";

/// Last path segment of a client-supplied file name; the artifact namespace is flat.
fn base_file_name(original: Option<&str>) -> &str {
    let name = original
        .and_then(|n| n.rsplit(|c: char| c == '/' || c == '\\').next())
        .map(str::trim)
        .unwrap_or_default();
    match name {
        "" | "." | ".." => FALLBACK_FILE_NAME,
        n => n,
    }
}

/// `{unix_millis}_{file name}`. Two uploads of the same name in the same
/// millisecond map to the same key and the later one overwrites.
pub(crate) fn resume_key(at: OffsetDateTime, original: Option<&str>) -> String {
    let millis = at.unix_timestamp_nanos() / 1_000_000;
    format!("{}_{}", millis, base_file_name(original))
}

/// Turns an application request into at most one stored application.
///
/// The record insert is the commit point. The resume is written first, so a
/// failed insert leaves the artifact behind with nothing referencing it.
#[derive(Clone)]
pub struct ApplicationWorkflow {
    jobs: Arc<dyn JobRepo>,
    accounts: Arc<dyn AccountRepo>,
    applications: Arc<dyn ApplicationRepo>,
    storage: Arc<dyn StorageClient>,
}

impl FromRef<AppState> for ApplicationWorkflow {
    fn from_ref(state: &AppState) -> Self {
        Self::new(
            state.jobs.clone(),
            state.accounts.clone(),
            state.applications.clone(),
            state.storage.clone(),
        )
    }
}

impl ApplicationWorkflow {
    pub fn new(
        jobs: Arc<dyn JobRepo>,
        accounts: Arc<dyn AccountRepo>,
        applications: Arc<dyn ApplicationRepo>,
        storage: Arc<dyn StorageClient>,
    ) -> Self {
        Self {
            jobs,
            accounts,
            applications,
            storage,
        }
    }

    pub async fn submit_application(
        &self,
        job_id: i64,
        applicant_email: &str,
        resume: ResumeUpload,
    ) -> Result<ApplyOutcome, AppError> {
        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Job))?;
        let applicant = self
            .accounts
            .find_by_email(applicant_email)
            .await?
            .ok_or(AppError::NotFound(Resource::Applicant))?;

        if self
            .applications
            .exists_by_job_and_applicant(job.id, applicant.id)
            .await?
        {
            info!(job_id = job.id, applicant_id = applicant.id, "already applied");
            return Ok(ApplyOutcome::AlreadyApplied);
        }

        let key = resume_key(OffsetDateTime::now_utc(), resume.file_name.as_deref());
        self.storage
            .put_object(&key, resume.body, &resume.content_type)
            .await
            .map_err(AppError::Storage)?;

        let inserted = self
            .applications
            .insert(NewApplication {
                job_id: job.id,
                applicant_id: applicant.id,
                resume_file_name: key.clone(),
            })
            .await
            .map_err(|e| {
                error!(error = %format!("{e:#}"), %key, "application insert failed; resume left orphaned");
                AppError::Storage(e)
            })?;

        match inserted {
            Some(application) => {
                info!(
                    application_id = application.id,
                    job_id = job.id,
                    applicant_id = applicant.id,
                    resume = %key,
                    "application submitted"
                );
                Ok(ApplyOutcome::Applied)
            }
            None => {
                // Lost a race with a concurrent submission for the same pair. The
                // resume stays: its key may be the one the winning row references.
                warn!(job_id = job.id, applicant_id = applicant.id, %key, "duplicate application rejected by store");
                Ok(ApplyOutcome::AlreadyApplied)
            }
        }
    }

    pub async fn list_my_applications(
        &self,
        applicant_email: &str,
    ) -> Result<Vec<Application>, AppError> {
        let applicant = self
            .accounts
            .find_by_email(applicant_email)
            .await?
            .ok_or(AppError::NotFound(Resource::Applicant))?;
        Ok(self.applications.list_by_applicant(applicant.id).await?)
    }
}
