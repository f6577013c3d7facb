//! ProviderMatcher - プロバイダ一覧のフィルタリング
//!
//! 安定なパススルー・フィルタです。並び替えは行わず、元の順序を保ちます。
//! Status is not part of eligibility: busy and offline providers are
//! returned too, and the rent action enforces `Idle`.

use crate::domain::errors::RentError;
use crate::domain::provider::{ProviderRecord, ensure_rentable};

/// MatchFilter はマッチング条件
///
/// 条件を指定しなければ全件が対象
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    /// Case-sensitive substring of `hardware_model`.
    pub hardware_substring: Option<String>,
    pub verified_only: bool,
}

impl MatchFilter {
    /// Matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// hardware_model に含まれるべき部分文字列を設定
    pub fn hardware(mut self, substring: impl Into<String>) -> Self {
        self.hardware_substring = Some(substring.into());
        self
    }

    /// 検証済みプロバイダに限定するか
    pub fn verified_only(mut self, verified_only: bool) -> Self {
        self.verified_only = verified_only;
        self
    }

    /// record が条件を満たすか（status は見ない）
    pub fn accepts(&self, record: &ProviderRecord) -> bool {
        if self.verified_only && !record.is_verified {
            return false;
        }
        match &self.hardware_substring {
            Some(needle) => record.hardware_model.contains(needle.as_str()),
            None => true,
        }
    }
}

/// Eligible records in pool order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult {
    records: Vec<ProviderRecord>,
}

impl MatchResult {
    /// マッチしたレコード（元の順序）
    pub fn records(&self) -> &[ProviderRecord] {
        &self.records
    }

    /// レコードの所有権を取り出す
    pub fn into_records(self) -> Vec<ProviderRecord> {
        self.records
    }

    /// マッチした件数
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 1 件もマッチしなかったか
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The `Idle` subset, order preserved.
    pub fn rentable(&self) -> impl Iterator<Item = &ProviderRecord> {
        self.records.iter().filter(|r| r.is_rentable())
    }

    /// Ascending by price per hour; ties keep pool order.
    pub fn sorted_by_price(mut self) -> Self {
        self.records
            .sort_by(|a, b| a.price_per_hour.total_cmp(&b.price_per_hour));
        self
    }
}

/// ProviderMatcher はステートレスなフィルタ
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderMatcher;

impl ProviderMatcher {
    /// ProviderMatcher を作成
    pub fn new() -> Self {
        Self
    }

    /// pool を filter で絞り込む。空の pool なら空の結果
    pub fn match_pool(&self, pool: &[ProviderRecord], filter: &MatchFilter) -> MatchResult {
        MatchResult {
            records: pool.iter().filter(|r| filter.accepts(r)).cloned().collect(),
        }
    }

    /// Look up `id` in the snapshot and check that it may be rented now.
    pub fn select_for_rent<'a>(
        &self,
        pool: &'a [ProviderRecord],
        id: &str,
    ) -> Result<&'a ProviderRecord, RentError> {
        let record = pool
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| RentError::UnknownProvider(id.to_string()))?;
        ensure_rentable(record)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::provider::ProviderStatus;
    use crate::domain::provider::fixtures::provider;
    use rstest::{fixture, rstest};

    #[fixture]
    fn pool() -> Vec<ProviderRecord> {
        vec![
            provider("node-01", "NVIDIA H100", 2.50, ProviderStatus::Idle, true),
            provider("node-02", "NVIDIA A100", 1.10, ProviderStatus::Busy, true),
            provider("node-03", "RTX 4090", 0.45, ProviderStatus::Idle, false),
            provider("node-04", "RTX 3090", 0.25, ProviderStatus::Idle, false),
            provider("node-05", "NVIDIA H100", 2.45, ProviderStatus::Busy, true),
        ]
    }

    fn ids(result: &MatchResult) -> Vec<&str> {
        result.records().iter().map(|r| r.id.as_str()).collect()
    }

    #[rstest]
    fn hardware_filter_keeps_pool_order(pool: Vec<ProviderRecord>) {
        let result = ProviderMatcher.match_pool(&pool, &MatchFilter::all().hardware("H100"));
        assert_eq!(ids(&result), vec!["node-01", "node-05"]);
    }

    #[rstest]
    fn hardware_filter_is_case_sensitive(pool: Vec<ProviderRecord>) {
        let result = ProviderMatcher.match_pool(&pool, &MatchFilter::all().hardware("h100"));
        assert!(result.is_empty());
    }

    #[rstest]
    fn status_does_not_affect_eligibility(pool: Vec<ProviderRecord>) {
        let result = ProviderMatcher.match_pool(&pool, &MatchFilter::all());
        assert_eq!(result.len(), 5);
        let rentable: Vec<&str> = result.rentable().map(|r| r.id.as_str()).collect();
        assert_eq!(rentable, vec!["node-01", "node-03", "node-04"]);
    }

    #[rstest]
    #[case(MatchFilter::all())]
    #[case(MatchFilter::all().hardware("RTX"))]
    #[case(MatchFilter::all().hardware("NVIDIA"))]
    #[case(MatchFilter::all().hardware("nothing"))]
    fn verified_only_is_an_ordered_subset(pool: Vec<ProviderRecord>, #[case] filter: MatchFilter) {
        let everything = ProviderMatcher.match_pool(&pool, &filter.clone().verified_only(false));
        let verified = ProviderMatcher.match_pool(&pool, &filter.verified_only(true));

        let verified_in_everything: Vec<&ProviderRecord> = everything
            .records()
            .iter()
            .filter(|r| verified.records().contains(*r))
            .collect();
        assert_eq!(
            verified_in_everything,
            verified.records().iter().collect::<Vec<_>>()
        );
        assert!(verified.records().iter().all(|r| r.is_verified));
    }

    #[test]
    fn empty_pool_gives_empty_result() {
        let result = ProviderMatcher.match_pool(&[], &MatchFilter::all().hardware("H100").verified_only(true));
        assert!(result.is_empty());
    }

    #[rstest]
    fn sorted_by_price_is_ascending(pool: Vec<ProviderRecord>) {
        let sorted = ProviderMatcher.match_pool(&pool, &MatchFilter::all()).sorted_by_price();
        assert_eq!(ids(&sorted), vec!["node-04", "node-03", "node-02", "node-05", "node-01"]);
    }

    #[rstest]
    fn select_for_rent_requires_idle(pool: Vec<ProviderRecord>) {
        let matcher = ProviderMatcher::new();

        assert_eq!(matcher.select_for_rent(&pool, "node-03").map(|r| r.id.as_str()), Ok("node-03"));
        assert_eq!(
            matcher.select_for_rent(&pool, "node-02"),
            Err(RentError::NotRentable {
                id: "node-02".to_string(),
                status: ProviderStatus::Busy,
            })
        );
        assert_eq!(
            matcher.select_for_rent(&pool, "node-99"),
            Err(RentError::UnknownProvider("node-99".to_string()))
        );
    }
}
