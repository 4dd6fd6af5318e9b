use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Job, NewJob};

#[async_trait]
pub trait JobRepo: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Job>>;
    async fn create(&self, job: NewJob) -> anyhow::Result<Job>;
    /// Every job, oldest first.
    async fn list_all(&self) -> anyhow::Result<Vec<Job>>;
}

#[derive(Clone)]
pub struct PgJobRepo {
    db: PgPool,
}

impl PgJobRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JobRepo for PgJobRepo {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Job>> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT id, title, description, location, salary, employer_id, created_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find job by id")
    }

    async fn create(&self, job: NewJob) -> anyhow::Result<Job> {
        sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (title, description, location, salary, employer_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, location, salary, employer_id, created_at
            "#,
        )
        .bind(job.title)
        .bind(job.description)
        .bind(job.location)
        .bind(job.salary)
        .bind(job.employer_id)
        .fetch_one(&self.db)
        .await
        .context("insert job")
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Job>> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT id, title, description, location, salary, employer_id, created_at
            FROM jobs
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list jobs")
    }
}
