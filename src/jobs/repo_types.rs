use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub salary: Option<f64>,
    pub employer_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub salary: Option<f64>,
    pub employer_id: i64,
}
