//! NetworkSummarizer - ネットワーク統計の一文要約

use tracing::{Instrument, debug, info_span, warn};

use super::call::GenerationCall;
use crate::domain::errors::GenerationError;
use crate::domain::stats::NetworkStats;

/// Returned whenever no usable sentence could be generated.
pub const NETWORK_FALLBACK: &str = "Network optimal.";

/// 統計を JSON で埋め込んだ指示文
pub fn build_prompt(stats: &NetworkStats) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(stats)?;
    Ok(format!(
        "Given these decentralized compute network stats: {json}, provide a 1-sentence quick \
         status update for the dashboard header about market liquidity or supply demand."
    ))
}

fn non_empty(text: &str) -> Result<String, GenerationError> {
    let text = text.trim();
    if text.is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(text.to_string())
    }
}

/// NetworkSummarizer は統計を一文のステータスに要約する（スキーマ制約なし）
pub struct NetworkSummarizer {
    call: GenerationCall,
}

impl NetworkSummarizer {
    /// NetworkSummarizer を作成
    pub fn new(call: GenerationCall) -> Self {
        Self { call }
    }

    /// 一文の要約を返す。失敗・空文字は NETWORK_FALLBACK
    pub async fn summarize(&self, stats: &NetworkStats) -> String {
        let prompt = match build_prompt(stats) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = %e, "could not encode network stats, using fallback summary");
                return NETWORK_FALLBACK.to_string();
            }
        };

        let request_id = self.call.next_request_id();
        let span = info_span!("network_summary", request_id = %request_id);

        async {
            match self.call.run(request_id, prompt, None, non_empty).await {
                Ok(sentence) => {
                    debug!(chars = sentence.len(), "network summary generated");
                    sentence
                }
                Err(failure) => {
                    warn!(reason = %failure, "summary generation failed, using fallback");
                    NETWORK_FALLBACK.to_string()
                }
            }
        }
        .instrument(span)
        .await
    }
}
