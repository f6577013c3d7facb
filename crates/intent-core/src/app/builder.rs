//! CompilerBuilder - IntentCompiler の構築とワイヤリング
//!
//! # 使用例
//! ```ignore
//! let compiler = CompilerBuilder::from_config(&config).build()?;
//!
//! let compiler = CompilerBuilder::new()
//!     .generator(Arc::new(ScriptedGenerator::new().respond(text)))
//!     .build()?;
//! ```
//!
//! # Fail-fast 設計
//! - generator が未設定なら build() が BuildError を返す
//! - 設定ファイル経由なら generator は必ず決まる（認証情報が無い場合は常に失敗する生成器）

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::call::GenerationCall;
use super::compiler::IntentCompiler;
use super::config::{CompilerConfig, DEFAULT_MODEL};
use super::matcher::ProviderMatcher;
use super::payload_compiler::PayloadCompiler;
use super::retry::RetryPolicy;
use super::spec_generator::SpecGenerator;
use super::summarizer::NetworkSummarizer;
use crate::domain::errors::GenerationError;
use crate::domain::fallback::{FallbackPolicy, SentinelFallback};
use crate::impls::{CommandGenerator, UnavailableGenerator};
use crate::ports::{Clock, IdGenerator, SystemClock, TextGenerator, UlidGenerator};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no text generator configured")]
    MissingGenerator,
}

/// CompilerBuilder は IntentCompiler を組み立てる
///
/// 未設定の項目は既定値（SentinelFallback, SystemClock, 1 回試行, timeout なし）
pub struct CompilerBuilder {
    generator: Option<Arc<dyn TextGenerator>>,
    fallback: Arc<dyn FallbackPolicy>,
    ids: Option<Arc<dyn IdGenerator>>,
    clock: Option<Arc<dyn Clock>>,
    model: String,
    retry: RetryPolicy,
    timeout: Option<Duration>,
}

impl CompilerBuilder {
    /// generator 未設定の CompilerBuilder を作成
    pub fn new() -> Self {
        Self {
            generator: None,
            fallback: Arc::new(SentinelFallback),
            ids: None,
            clock: None,
            model: DEFAULT_MODEL.to_string(),
            retry: RetryPolicy::default(),
            timeout: None,
        }
    }

    /// Wire model, retry, timeout and the generator backend from `config`.
    ///
    /// - no `api_key`: every call fails with `MissingCredentials`
    /// - `api_key` and `generator_command`: `CommandGenerator`
    /// - `api_key` only: every call fails with `Unavailable`
    pub fn from_config(config: &CompilerConfig) -> Self {
        let generator: Arc<dyn TextGenerator> = match (&config.api_key, &config.generator_command) {
            (None, _) => {
                warn!("API_KEY not set, spec generation will use the fallback specification");
                Arc::new(UnavailableGenerator::missing_credentials())
            }
            (Some(key), Some(command)) => match CommandGenerator::from_command_line(command, key.clone()) {
                Some(generator) => {
                    info!(program = generator.program(), "using generator process");
                    Arc::new(generator)
                }
                None => {
                    warn!("generator_command is empty");
                    Arc::new(UnavailableGenerator::new(GenerationError::Unavailable(
                        "generator_command is empty".to_string(),
                    )))
                }
            },
            (Some(_), None) => {
                warn!("no generator_command configured, spec generation will use the fallback specification");
                Arc::new(UnavailableGenerator::new(GenerationError::Unavailable(
                    "no generator_command configured".to_string(),
                )))
            }
        };

        Self::new()
            .generator(generator)
            .model(config.model.clone())
            .retry_policy(config.retry_policy())
            .timeout(config.timeout())
    }

    /// テキスト生成の実装を設定（必須）
    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// 生成失敗時の FallbackPolicy を差し替える
    pub fn fallback(mut self, fallback: Arc<dyn FallbackPolicy>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Clock used for request-id timestamps. Ignored if `id_generator` is set.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// request id の生成器を差し替える
    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// リクエストに載せるモデル名
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// 外部呼び出しのリトライ方針
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// 1 回の試行あたりの timeout（None なら無制限）
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// IntentCompiler を構築
    ///
    /// # エラー
    /// - generator が未設定なら BuildError::MissingGenerator
    pub fn build(self) -> Result<IntentCompiler, BuildError> {
        let generator = self.generator.ok_or(BuildError::MissingGenerator)?;
        let ids: Arc<dyn IdGenerator> = match (self.ids, self.clock) {
            (Some(ids), _) => ids,
            (None, Some(clock)) => Arc::new(UlidGenerator::new(clock)),
            (None, None) => Arc::new(UlidGenerator::new(SystemClock)),
        };

        let call = GenerationCall::new(generator, self.model)
            .with_id_generator(ids)
            .with_retry(self.retry)
            .with_timeout(self.timeout);

        Ok(IntentCompiler {
            generator: SpecGenerator::new(call.clone(), self.fallback),
            summarizer: NetworkSummarizer::new(call),
            payloads: PayloadCompiler::new(),
            matcher: ProviderMatcher::new(),
        })
    }
}

impl Default for CompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
