//! ProviderSource の実装 - プロバイダ一覧の供給元

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::PoolError;
use crate::domain::provider::{ProviderRecord, validate_pool};
use crate::ports::ProviderSource;

/// In-memory snapshot; validated once at construction.
#[derive(Debug, Clone)]
pub struct StaticPool {
    records: Vec<ProviderRecord>,
}

impl StaticPool {
    /// records を検証して保持
    pub fn new(records: Vec<ProviderRecord>) -> Result<Self, PoolError> {
        validate_pool(&records)?;
        Ok(Self { records })
    }
}

#[async_trait]
impl ProviderSource for StaticPool {
    async fn snapshot(&self) -> Result<Vec<ProviderRecord>, PoolError> {
        Ok(self.records.clone())
    }
}

/// Reads a JSON array of provider records on every snapshot.
#[derive(Debug, Clone)]
pub struct JsonFilePool {
    path: PathBuf,
}

impl JsonFilePool {
    /// 読み込む JSON ファイルのパス
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProviderSource for JsonFilePool {
    async fn snapshot(&self) -> Result<Vec<ProviderRecord>, PoolError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let records: Vec<ProviderRecord> = serde_json::from_slice(&bytes)?;
        validate_pool(&records)?;
        debug!(path = %self.path.display(), providers = records.len(), "loaded provider snapshot");
        Ok(records)
    }
}
