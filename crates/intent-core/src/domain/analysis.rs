//! Analysis - 解析結果と出自（生成 / fallback）
//!
//! The specification is always usable; `provenance` only tells a caller
//! (logs, CLI) whether it was generated or substituted.

use serde::{Deserialize, Serialize};

use super::ids::RequestId;
use super::spec::JobSpecification;

/// Serialized as SCREAMING_SNAKE_CASE: GENERATED / FALLBACK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provenance {
    Generated,
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Absent when no external call was made (blank task).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,

    pub spec: JobSpecification,

    pub provenance: Provenance,
}

impl Analysis {
    /// 生成に成功した結果
    pub fn generated(request_id: RequestId, spec: JobSpecification) -> Self {
        Self {
            request_id: Some(request_id),
            spec,
            provenance: Provenance::Generated,
        }
    }

    /// fallback で置き換えた結果
    pub fn fallback(
        request_id: Option<RequestId>,
        spec: JobSpecification,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            request_id,
            spec,
            provenance: Provenance::Fallback {
                reason: reason.into(),
            },
        }
    }

    /// fallback で置き換えられたか
    pub fn is_fallback(&self) -> bool {
        matches!(self.provenance, Provenance::Fallback { .. })
    }

    /// JobSpecification を取り出す
    pub fn into_spec(self) -> JobSpecification {
        self.spec
    }
}
