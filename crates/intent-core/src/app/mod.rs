//! App - アプリケーション層
//!
//! ports を組み合わせてパイプラインを実装します。
//!
//! # 主要コンポーネント
//! - **CompilerBuilder**: 設定からのワイヤリング
//! - **IntentCompiler**: パイプライン全体のファサード
//! - **SpecGenerator**: タスク記述 → JobSpecification（失敗時は fallback）
//! - **NetworkSummarizer**: ネットワーク統計 → 一文の要約
//! - **PayloadCompiler**: JobSpecification → DeploymentPayload
//! - **ProviderMatcher**: プロバイダ一覧のフィルタ

pub mod builder;
pub mod call;
pub mod compiler;
pub mod config;
pub mod matcher;
pub mod payload_compiler;
pub mod retry;
pub mod spec_generator;
pub mod summarizer;

pub use self::builder::{BuildError, CompilerBuilder};
pub use self::call::GenerationCall;
pub use self::compiler::IntentCompiler;
pub use self::config::{CompilerConfig, DEFAULT_MODEL};
pub use self::matcher::{MatchFilter, MatchResult, ProviderMatcher};
pub use self::payload_compiler::{PayloadCompiler, to_smallest_unit};
pub use self::retry::RetryPolicy;
pub use self::spec_generator::SpecGenerator;
pub use self::summarizer::{NETWORK_FALLBACK, NetworkSummarizer};
