//! Errors - エラー型
//!
//! `GenerationError` never leaves the generator components: it is turned into
//! sentinel data at that boundary. The other errors belong to surfaces that
//! do report failures (config loading, provider snapshots, rent action).

use std::time::Duration;

use thiserror::Error;

use super::provider::ProviderStatus;

/// Why one external generation call did not produce a usable result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("generation credentials not configured")]
    MissingCredentials,

    #[error("generation capability unavailable: {0}")]
    Unavailable(String),

    #[error("generation transport failed: {0}")]
    Transport(String),

    #[error("generation timed out after {0:?}")]
    TimedOut(Duration),

    #[error("generation returned no text")]
    EmptyResponse,

    #[error("generated output is not valid JSON: {0}")]
    Malformed(String),

    #[error("generated output violates the schema: {0}")]
    SchemaViolation(String),

    #[error("task description is blank")]
    BlankTask,
}

impl GenerationError {
    /// Permanent failures are not worth another attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            GenerationError::MissingCredentials
                | GenerationError::Unavailable(_)
                | GenerationError::BlankTask
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to read provider snapshot: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse provider snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid provider record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("duplicate provider id {0}")]
    DuplicateId(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RentError {
    #[error("unknown provider {0}")]
    UnknownProvider(String),

    #[error("provider {id} is not rentable (status: {status})")]
    NotRentable { id: String, status: ProviderStatus },
}
