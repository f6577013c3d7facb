//! JobSpecification - タスク解析の構造化出力

use serde::{Deserialize, Serialize};

use super::errors::GenerationError;

/// Structured description of a compute job's requirements and budget.
///
/// Wire names follow the generation schema (`recommendedGpu`, `maxPrice`)
/// so the same value is embedded verbatim under `job.specs` in a payload.
///
/// All six fields are required on deserialization; a missing or `null`
/// field is rejected by serde before `validate` ever runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpecification {
    pub title: String,
    pub description: String,

    /// Free-form hardware identifier, e.g. "NVIDIA H100".
    #[serde(rename = "recommendedGpu")]
    pub recommended_hardware: String,

    /// Human-readable duration estimate.
    #[serde(rename = "estimatedDuration")]
    pub estimated_duration: String,

    /// Budget ceiling in USD per hour.
    #[serde(rename = "maxPrice")]
    pub max_price_per_hour: f64,

    pub reasoning: String,
}

impl JobSpecification {
    /// Parse generated text into a specification and check its invariants.
    pub fn from_generated(text: &str) -> Result<Self, GenerationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        let spec: Self = serde_json::from_str(text).map_err(|e| {
            if e.is_data() {
                GenerationError::SchemaViolation(e.to_string())
            } else {
                GenerationError::Malformed(e.to_string())
            }
        })?;
        spec.validate()?;
        Ok(spec)
    }

    /// Price must be a finite, non-negative number.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if !self.max_price_per_hour.is_finite() || self.max_price_per_hour < 0.0 {
            return Err(GenerationError::SchemaViolation(format!(
                "maxPrice must be a non-negative number, got {}",
                self.max_price_per_hour
            )));
        }
        Ok(())
    }
}
