use serde::Serialize;
use sqlx::FromRow;
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
}

#[derive(Debug, Error)]
#[error("unknown application status {0:?}")]
pub struct UnknownStatus(String);

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
        }
    }
}

impl TryFrom<String> for ApplicationStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "APPLIED" => Ok(ApplicationStatus::Applied),
            _ => Err(UnknownStatus(value)),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Application {
    pub id: i64,
    #[sqlx(try_from = "String")]
    pub status: ApplicationStatus,
    pub resume_file_name: String,
    pub job_id: i64,
    pub applicant_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: i64,
    pub applicant_id: i64,
    pub resume_file_name: String,
}
