//! CompilerConfig - 設定の読み込みと検証
//!
//! Sources, later wins:
//! 1. built-in defaults
//! 2. optional TOML file
//! 3. `.env` file and process environment (`API_KEY`, `INTENT_MODEL`,
//!    `INTENT_GENERATOR_CMD`)
//!
//! Missing credentials are not a configuration error: the builder wires a
//! generator that always fails, and spec generation degrades to the sentinel.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::retry::RetryPolicy;
use crate::domain::errors::ConfigError;

/// model 未指定時のモデル名
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// CompilerConfig はコンパイラ全体の設定
///
/// 全フィールドに既定値があり、TOML では必要なキーだけ書けばよい
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Model name forwarded with every generation request.
    pub model: String,

    /// Credentials for the generation capability.
    pub api_key: Option<String>,

    /// `[program, args...]` of the generator process.
    pub generator_command: Option<Vec<String>>,

    pub max_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub retry_multiplier: f64,

    /// Per-attempt timeout. None leaves timing to the capability.
    pub timeout_ms: Option<u64>,

    /// Log filter used by the CLI when `RUST_LOG` is unset.
    pub log_level: Option<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            generator_command: None,
            max_attempts: 1,
            retry_base_delay_ms: 2000,
            retry_multiplier: 2.0,
            timeout_ms: None,
            log_level: None,
        }
    }
}

// api_key を Debug 出力に出さない
impl fmt::Debug for CompilerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilerConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("generator_command", &self.generator_command)
            .field("max_attempts", &self.max_attempts)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .field("retry_multiplier", &self.retry_multiplier)
            .field("timeout_ms", &self.timeout_ms)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl CompilerConfig {
    /// Load from an optional TOML file, then `.env` and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        dotenv::dotenv().ok();
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// TOML ファイルを読む（環境変数は適用しない）
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// TOML 文字列から読む
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Apply environment overrides through `lookup`; blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(model) = get("INTENT_MODEL") {
            self.model = model;
        }
        if let Some(command) = get("INTENT_GENERATOR_CMD") {
            self.generator_command = Some(command.split_whitespace().map(str::to_string).collect());
        }
    }

    /// 値の検証
    ///
    /// - model が空でない
    /// - max_attempts >= 1
    /// - retry_multiplier が有限かつ >= 1.0
    /// - timeout_ms が指定されるなら正
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".to_string()));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid("max_attempts must be at least 1".to_string()));
        }
        if !self.retry_multiplier.is_finite() || self.retry_multiplier < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "retry_multiplier must be a finite number >= 1.0, got {}",
                self.retry_multiplier
            )));
        }
        if self.timeout_ms == Some(0) {
            return Err(ConfigError::Invalid("timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// 設定値から RetryPolicy を作る
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
            self.retry_multiplier,
        )
    }

    /// 試行ごとの timeout
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
