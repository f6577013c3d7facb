//! FallbackPolicy - 生成失敗時に返す仕様
//!
//! Failure is represented as data. The sentinel is a valid
//! `JobSpecification`, so payload compilation and presentation need no
//! failure-specific branch.

use super::errors::GenerationError;
use super::spec::JobSpecification;

/// Produces the specification returned in place of a failed generation.
///
/// Policies are pure functions of the failure (no side effects); logging is
/// left to the caller that observed it.
pub trait FallbackPolicy: Send + Sync {
    fn on_failure(&self, failure: &GenerationError) -> JobSpecification;
}

/// Default policy: the fixed "Analysis Failed" sentinel, whatever the cause.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentinelFallback;

impl SentinelFallback {
    /// SentinelFallback を作成
    pub fn new() -> Self {
        Self
    }

    /// The sentinel specification itself.
    pub fn sentinel() -> JobSpecification {
        JobSpecification {
            title: "Analysis Failed".to_string(),
            description: "Could not analyze requirements.".to_string(),
            recommended_hardware: "Generic GPU".to_string(),
            estimated_duration: "Unknown".to_string(),
            max_price_per_hour: 0.0,
            reasoning: "AI Service unavailable.".to_string(),
        }
    }
}

impl FallbackPolicy for SentinelFallback {
    fn on_failure(&self, _failure: &GenerationError) -> JobSpecification {
        Self::sentinel()
    }
}
