use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Account, NewAccount};

#[async_trait]
pub trait AccountRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Account>>;
    /// Returns `None` when the email is already taken.
    async fn create(&self, account: NewAccount<'_>) -> anyhow::Result<Option<Account>>;
}

#[derive(Clone)]
pub struct PgAccountRepo {
    db: PgPool,
}

impl PgAccountRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepo for PgAccountRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Account>> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, name, password_hash, role, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find account by email")
    }

    async fn create(&self, account: NewAccount<'_>) -> anyhow::Result<Option<Account>> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, name, password_hash, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, name, password_hash, role, created_at
            "#,
        )
        .bind(account.email)
        .bind(account.name)
        .bind(account.password_hash)
        .bind(account.role.as_str())
        .fetch_optional(&self.db)
        .await
        .context("insert account")
    }
}
