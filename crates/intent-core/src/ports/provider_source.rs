//! ProviderSource port - プロバイダ一覧のスナップショット供給元

use async_trait::async_trait;

use crate::domain::errors::PoolError;
use crate::domain::provider::ProviderRecord;

/// Supplies the current provider pool. The snapshot is read-only to the
/// matcher and treated as immutable for the duration of one match.
#[async_trait]
pub trait ProviderSource: Send + Sync {
    async fn snapshot(&self) -> Result<Vec<ProviderRecord>, PoolError>;
}
