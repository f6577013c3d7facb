//! Domain - ドメインモデル（仕様・プロバイダ・ペイロード）
//!
//! Everything here is plain data plus pure policies: no I/O, no clocks,
//! no external calls.

pub mod analysis;
pub mod errors;
pub mod fallback;
pub mod ids;
pub mod payload;
pub mod provider;
pub mod schema;
pub mod spec;
pub mod stats;
pub mod template;

pub use analysis::{Analysis, Provenance};
pub use errors::{ConfigError, GenerationError, PoolError, RentError};
pub use fallback::{FallbackPolicy, SentinelFallback};
pub use ids::{Request, RequestId};
pub use payload::{DeploymentPayload, Job, Payment, Requirements};
pub use provider::{ProviderRecord, ProviderStatus, ServiceTier, ensure_rentable, validate_pool};
pub use schema::{FieldKind, OutputSchema, SchemaField};
pub use spec::JobSpecification;
pub use stats::NetworkStats;
pub use template::{DeploymentTemplate, TemplateCategory, template, templates};
