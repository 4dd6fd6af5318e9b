use std::sync::Arc;

use crate::accounts::{AccountRepo, PgAccountRepo};
use crate::applications::{ApplicationRepo, PgApplicationRepo};
use crate::config::AppConfig;
use crate::jobs::{JobRepo, PgJobRepo};
use crate::storage::{self, StorageClient};
use crate::db;

/// Everything a request can reach; stores are trait objects.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<dyn AccountRepo>,
    pub jobs: Arc<dyn JobRepo>,
    pub applications: Arc<dyn ApplicationRepo>,
    pub storage: Arc<dyn StorageClient>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = db::connect(&config.database_url).await?;
        db::migrate(&pool).await?;

        let storage = storage::from_config(&config.storage).await?;

        Ok(Self {
            accounts: Arc::new(PgAccountRepo::new(pool.clone())),
            jobs: Arc::new(PgJobRepo::new(pool.clone())),
            applications: Arc::new(PgApplicationRepo::new(pool)),
            storage,
            config,
        })
    }
}
