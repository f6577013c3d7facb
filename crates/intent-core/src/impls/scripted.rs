//! ScriptedGenerator - 開発・テスト用の生成器
//!
//! 事前に積んだ応答を FIFO で返し、受け取ったリクエストを記録します。

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::errors::GenerationError;
use crate::ports::{GenerationRequest, TextGenerator};

/// # 使用例
/// ```ignore
/// let generator = ScriptedGenerator::new()
///     .respond(r#"{"title": ...}"#)
///     .fail(GenerationError::Transport("reset".into()));
/// ```
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, GenerationError>>>,
    received: Mutex<Vec<GenerationRequest>>,
    latency: Option<Duration>,
}

impl ScriptedGenerator {
    /// 空のスクリプトで作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 成功応答を積む
    pub fn respond(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()))
    }

    /// 失敗応答を積む
    pub fn fail(self, error: GenerationError) -> Self {
        self.push(Err(error))
    }

    /// Sleep before answering each call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn push(mut self, entry: Result<String, GenerationError>) -> Self {
        self.script.get_mut().push_back(entry);
        self
    }

    /// Requests seen so far, in call order.
    pub async fn received(&self) -> Vec<GenerationRequest> {
        self.received.lock().await.clone()
    }

    /// これまでの呼び出し回数
    pub async fn calls(&self) -> usize {
        self.received.lock().await.len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.received.lock().await.push(request.clone());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.script.lock().await.pop_front().unwrap_or_else(|| {
            Err(GenerationError::Unavailable("script exhausted".to_string()))
        })
    }
}
