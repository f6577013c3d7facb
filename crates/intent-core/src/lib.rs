//! intent-core
//!
//! Intent-to-deployment compiler: turns a natural-language compute task into a
//! validated job specification, compiles it into a deployment payload and
//! matches it against a snapshot of advertised providers.
//!
//! # モジュール構成
//! - **domain**: データと純粋なポリシー（JobSpecification, ProviderRecord, DeploymentPayload, fallback, schema）
//! - **ports**: 外部協調者の抽象化（TextGenerator, ProviderSource, Clock, IdGenerator）
//! - **impls**: ports の実装（ScriptedGenerator, CommandGenerator, StaticPool など）
//! - **app**: パイプライン（SpecGenerator, NetworkSummarizer, PayloadCompiler, ProviderMatcher, IntentCompiler）

pub mod domain;
pub mod ports;
pub mod impls;
pub mod app;

pub use app::{CompilerBuilder, CompilerConfig, IntentCompiler, MatchFilter, MatchResult};
pub use domain::{
    Analysis, DeploymentPayload, JobSpecification, NetworkStats, ProviderRecord, Provenance,
};
