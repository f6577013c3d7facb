//! DeploymentPayload - ネットワークに配信するペイロード
//!
//! Field names are part of the wire contract and must not change:
//! `network`, `version`, `job.type`, `job.specs`, `job.requirements.*`,
//! `job.payment.*`.

use serde::{Deserialize, Serialize};

use super::spec::JobSpecification;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentPayload {
    pub network: String,
    pub version: String,
    pub job: Job,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "type")]
    pub job_type: String,
    pub specs: JobSpecification,
    pub requirements: Requirements,
    pub payment: Payment,
}

/// Fixed capability requirements; not derived from the specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    pub cuda_version: String,
    pub p2p_transfer: bool,
    pub secure_enclave: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub token: String,
    /// Decimal integer string in the token's smallest unit.
    pub max_bid_wei: String,
}

impl DeploymentPayload {
    /// 表示・コピー用の整形済み JSON
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
