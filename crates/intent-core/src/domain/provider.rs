//! ProviderRecord - プロバイダの計算資源オファー
//!
//! Wire names follow the provider feed (`gpuModel`, `vram`, `tflops`, ...).

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{PoolError, RentError};

/// Serialized as SCREAMING_SNAKE_CASE: IDLE / BUSY / OFFLINE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderStatus {
    Idle,
    Busy,
    Offline,
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProviderStatus::Idle => "IDLE",
            ProviderStatus::Busy => "BUSY",
            ProviderStatus::Offline => "OFFLINE",
        };
        f.pad(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceTier {
    Standard,
    Gold,
    Enterprise,
}

impl fmt::Display for ServiceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceTier::Standard => "Standard",
            ServiceTier::Gold => "Gold",
            ServiceTier::Enterprise => "Enterprise",
        };
        f.pad(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    pub id: String,

    /// Display label; older snapshots omit it.
    #[serde(default)]
    pub name: String,

    #[serde(rename = "gpuModel")]
    pub hardware_model: String,

    #[serde(rename = "vram")]
    pub memory_capacity_gb: f64,

    #[serde(rename = "tflops")]
    pub throughput: f64,

    pub price_per_hour: f64,

    pub region: String,

    #[serde(rename = "availability")]
    pub availability_percent: f64,

    pub status: ProviderStatus,

    #[serde(rename = "provider")]
    pub owner_identity: String,

    pub is_verified: bool,

    #[serde(rename = "slaTier")]
    pub service_tier: ServiceTier,
}

impl ProviderRecord {
    /// Only idle providers may be rented.
    pub fn is_rentable(&self) -> bool {
        self.status == ProviderStatus::Idle
    }

    /// Check the record-level invariants of a snapshot entry.
    pub fn validate(&self) -> Result<(), PoolError> {
        let invalid = |reason: String| PoolError::InvalidRecord {
            id: self.id.clone(),
            reason,
        };

        if self.id.is_empty() {
            return Err(invalid("empty id".to_string()));
        }
        if !(self.memory_capacity_gb.is_finite() && self.memory_capacity_gb > 0.0) {
            return Err(invalid(format!("vram must be positive, got {}", self.memory_capacity_gb)));
        }
        if !(self.throughput.is_finite() && self.throughput > 0.0) {
            return Err(invalid(format!("tflops must be positive, got {}", self.throughput)));
        }
        if !(self.price_per_hour.is_finite() && self.price_per_hour >= 0.0) {
            return Err(invalid(format!(
                "pricePerHour must be non-negative, got {}",
                self.price_per_hour
            )));
        }
        if !(0.0..=100.0).contains(&self.availability_percent) {
            return Err(invalid(format!(
                "availability must be within [0, 100], got {}",
                self.availability_percent
            )));
        }
        Ok(())
    }
}

/// Validate every record of a snapshot and reject duplicate ids.
pub fn validate_pool(pool: &[ProviderRecord]) -> Result<(), PoolError> {
    let mut seen = HashSet::with_capacity(pool.len());
    for record in pool {
        record.validate()?;
        if !seen.insert(record.id.as_str()) {
            return Err(PoolError::DuplicateId(record.id.clone()));
        }
    }
    Ok(())
}

/// Rent action guard: renting is only permitted while the provider is idle.
pub fn ensure_rentable(record: &ProviderRecord) -> Result<(), RentError> {
    if record.is_rentable() {
        Ok(())
    } else {
        Err(RentError::NotRentable {
            id: record.id.clone(),
            status: record.status,
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn provider(
        id: &str,
        hardware_model: &str,
        price_per_hour: f64,
        status: ProviderStatus,
        is_verified: bool,
    ) -> ProviderRecord {
        ProviderRecord {
            id: id.to_string(),
            name: format!("{id}-rig"),
            hardware_model: hardware_model.to_string(),
            memory_capacity_gb: 80.0,
            throughput: 1979.0,
            price_per_hour,
            region: "US-East".to_string(),
            availability_percent: 98.0,
            status,
            owner_identity: "0x3a...9f2".to_string(),
            is_verified,
            service_tier: ServiceTier::Gold,
        }
    }
}
