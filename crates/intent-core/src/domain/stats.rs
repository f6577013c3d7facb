//! NetworkStats - ネットワーク全体の集計値

use serde::{Deserialize, Serialize};

/// Aggregate network metrics fed to the network summarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub active_nodes: u64,
    pub total_tflops: f64,
    pub jobs_running: u64,
    /// Percent, 0-100.
    pub network_utilization: f64,
    #[serde(rename = "avgPricePerFLOP")]
    pub avg_price_per_flop: f64,
}

impl NetworkStats {
    /// Last known network state, used when no live snapshot is supplied.
    pub fn last_known() -> Self {
        Self {
            active_nodes: 1420,
            total_tflops: 45000.0,
            jobs_running: 892,
            network_utilization: 68.0,
            avg_price_per_flop: 0.002,
        }
    }
}
