//! UnavailableGenerator - 常に失敗する生成器

use async_trait::async_trait;

use crate::domain::errors::GenerationError;
use crate::ports::{GenerationRequest, TextGenerator};

/// Generator wired when no usable capability is configured.
///
/// Every call fails with the same error, which the spec generator turns into
/// the fallback sentinel.
#[derive(Debug, Clone)]
pub struct UnavailableGenerator {
    error: GenerationError,
}

impl UnavailableGenerator {
    /// 常に error を返す生成器
    pub fn new(error: GenerationError) -> Self {
        Self { error }
    }

    /// 認証情報が無いとき用
    pub fn missing_credentials() -> Self {
        Self::new(GenerationError::MissingCredentials)
    }
}

#[async_trait]
impl TextGenerator for UnavailableGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        Err(self.error.clone())
    }
}
