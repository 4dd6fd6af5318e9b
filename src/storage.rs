use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use tracing::{debug, info};

use crate::config::{StorageBackend, StorageConfig};

/// Flat key -> bytes store for uploaded artifacts.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()>;
}

pub async fn from_config(cfg: &StorageConfig) -> anyhow::Result<Arc<dyn StorageClient>> {
    match cfg.backend {
        StorageBackend::Local => {
            info!(root = %cfg.upload_dir.display(), "using local artifact storage");
            Ok(Arc::new(LocalStorage::new(cfg.upload_dir.clone())) as Arc<dyn StorageClient>)
        }
        StorageBackend::S3 => {
            let s3 = cfg
                .s3
                .as_ref()
                .context("STORAGE_BACKEND=s3 requires MINIO_* settings")?;
            info!(endpoint = %s3.endpoint, bucket = %s3.bucket, "using s3 artifact storage");
            let storage = S3Storage::new(
                &s3.endpoint,
                &s3.bucket,
                &s3.access_key,
                &s3.secret_key,
                &s3.region,
            )
            .await?;
            Ok(Arc::new(storage) as Arc<dyn StorageClient>)
        }
    }
}

/// Keys live in one flat namespace, so anything that could escape the root is refused.
fn ensure_flat_key(key: &str) -> anyhow::Result<()> {
    anyhow::ensure!(
        !key.is_empty() && key != "." && key != ".." && !key.contains(['/', '\\']),
        "invalid storage key {key:?}"
    );
    Ok(())
}

#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    pub async fn new(
        endpoint: &str,
        bucket: &str,
        access_key: &str,
        secret_key: &str,
        region: &str,
    ) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(Credentials::new(
                access_key, secret_key, None, None, "static",
            ))
            .endpoint_url(endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: bucket.to_string(),
        })
    }
}

#[async_trait]
impl StorageClient for S3Storage {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        ensure_flat_key(key)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .context("s3 put_object")?;
        debug!(key, bucket = %self.bucket, "object stored");
        Ok(())
    }
}

/// Files under a single directory, created on first write.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> anyhow::Result<PathBuf> {
        ensure_flat_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn put_object(&self, key: &str, body: Bytes, _content_type: &str) -> anyhow::Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("create upload dir {}", self.root.display()))?;
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        debug!(key, bytes = body.len(), "object stored");
        Ok(())
    }
}
