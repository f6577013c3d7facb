//! IntentCompiler - パイプライン全体のファサード
//!
//! 全メソッドが `&self` を取るので、`analyze` と `summarize` は
//! `tokio::join!` で並行に呼び出せます。

use tracing::debug;

use super::matcher::{MatchFilter, MatchResult, ProviderMatcher};
use super::payload_compiler::PayloadCompiler;
use super::spec_generator::SpecGenerator;
use super::summarizer::NetworkSummarizer;
use crate::domain::analysis::Analysis;
use crate::domain::errors::{PoolError, RentError};
use crate::domain::payload::DeploymentPayload;
use crate::domain::provider::ProviderRecord;
use crate::domain::spec::JobSpecification;
use crate::domain::stats::NetworkStats;
use crate::ports::ProviderSource;

/// Built by [`CompilerBuilder`](super::CompilerBuilder).
pub struct IntentCompiler {
    pub(super) generator: SpecGenerator,
    pub(super) summarizer: NetworkSummarizer,
    pub(super) payloads: PayloadCompiler,
    pub(super) matcher: ProviderMatcher,
}

impl IntentCompiler {
    /// タスク記述を解析（失敗時は fallback、provenance 付き）
    pub async fn analyze(&self, task: &str) -> Analysis {
        self.generator.analyze(task).await
    }

    /// タスク記述から JobSpecification を得る。常に有効な値を返す
    pub async fn generate_specification(&self, task: &str) -> JobSpecification {
        self.generator.generate_specification(task).await
    }

    /// ネットワーク統計の一文要約。失敗時は固定文字列
    pub async fn summarize(&self, stats: &NetworkStats) -> String {
        self.summarizer.summarize(stats).await
    }

    /// JobSpecification を DeploymentPayload に変換（純粋関数）
    pub fn compile(&self, spec: &JobSpecification) -> DeploymentPayload {
        self.payloads.compile(spec)
    }

    /// スナップショットをフィルタ（元の順序を保つ）
    pub fn match_pool(&self, pool: &[ProviderRecord], filter: &MatchFilter) -> MatchResult {
        self.matcher.match_pool(pool, filter)
    }

    /// Take one snapshot from `source` and match against it.
    pub async fn match_source(
        &self,
        source: &dyn ProviderSource,
        filter: &MatchFilter,
    ) -> Result<MatchResult, PoolError> {
        let pool = source.snapshot().await?;
        let result = self.matcher.match_pool(&pool, filter);
        debug!(pool = pool.len(), matched = result.len(), "matched provider snapshot");
        Ok(result)
    }

    /// id のプロバイダを引き、今レンタル可能か確認
    pub fn select_for_rent<'a>(
        &self,
        pool: &'a [ProviderRecord],
        id: &str,
    ) -> Result<&'a ProviderRecord, RentError> {
        self.matcher.select_for_rent(pool, id)
    }
}
