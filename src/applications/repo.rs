use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Application, ApplicationStatus, NewApplication};

#[async_trait]
pub trait ApplicationRepo: Send + Sync {
    async fn exists_by_job_and_applicant(&self, job_id: i64, applicant_id: i64)
        -> anyhow::Result<bool>;

    /// Inserts with status `APPLIED`. `None` means a row for the same
    /// (job, applicant) pair already exists and nothing was written.
    async fn insert(&self, application: NewApplication) -> anyhow::Result<Option<Application>>;

    async fn list_by_applicant(&self, applicant_id: i64) -> anyhow::Result<Vec<Application>>;
}

#[derive(Clone)]
pub struct PgApplicationRepo {
    db: PgPool,
}

impl PgApplicationRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ApplicationRepo for PgApplicationRepo {
    async fn exists_by_job_and_applicant(
        &self,
        job_id: i64,
        applicant_id: i64,
    ) -> anyhow::Result<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM applications
                 WHERE job_id = $1 AND applicant_id = $2
            )
            "#,
        )
        .bind(job_id)
        .bind(applicant_id)
        .fetch_one(&self.db)
        .await
        .context("check existing application")?;
        Ok(exists)
    }

    async fn insert(&self, application: NewApplication) -> anyhow::Result<Option<Application>> {
        // The unique (job_id, applicant_id) constraint decides concurrent races.
        sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (status, resume_file_name, job_id, applicant_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (job_id, applicant_id) DO NOTHING
            RETURNING id, status, resume_file_name, job_id, applicant_id, created_at
            "#,
        )
        .bind(ApplicationStatus::Applied.as_str())
        .bind(application.resume_file_name)
        .bind(application.job_id)
        .bind(application.applicant_id)
        .fetch_optional(&self.db)
        .await
        .context("insert application")
    }

    async fn list_by_applicant(&self, applicant_id: i64) -> anyhow::Result<Vec<Application>> {
        sqlx::query_as::<_, Application>(
            r#"
            SELECT id, status, resume_file_name, job_id, applicant_id, created_at
              FROM applications
             WHERE applicant_id = $1
             ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(applicant_id)
        .fetch_all(&self.db)
        .await
        .context("list applications by applicant")
    }
}
