//! GenerationCall - 外部生成呼び出しの共通部分
//!
//! One outbound request per attempt, bounded by the retry policy and an
//! optional per-attempt timeout. The caller supplies the parser that decides
//! whether the returned text is usable; a parse failure counts as a failed
//! attempt.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::retry::RetryPolicy;
use crate::domain::errors::GenerationError;
use crate::domain::ids::RequestId;
use crate::domain::schema::OutputSchema;
use crate::ports::{GenerationRequest, IdGenerator, SystemClock, TextGenerator, UlidGenerator};

/// GenerationCall は生成器・モデル名・リトライ方針・timeout をまとめたもの
///
/// SpecGenerator と NetworkSummarizer が共有します（clone は Arc の複製のみ）
#[derive(Clone)]
pub struct GenerationCall {
    generator: Arc<dyn TextGenerator>,
    ids: Arc<dyn IdGenerator>,
    model: String,
    retry: RetryPolicy,
    timeout: Option<Duration>,
}

impl GenerationCall {
    /// 1 回試行・timeout なし・SystemClock ベースの id で作成
    pub fn new(generator: Arc<dyn TextGenerator>, model: impl Into<String>) -> Self {
        Self {
            generator,
            ids: Arc::new(UlidGenerator::new(SystemClock)),
            model: model.into(),
            retry: RetryPolicy::default(),
            timeout: None,
        }
    }

    /// request id の生成器を差し替える
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// リトライ方針を設定
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// 試行ごとの timeout を設定
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// リクエストに載せるモデル名
    pub fn model(&self) -> &str {
        &self.model
    }

    /// 新しい request id を払い出す（ログ相関用）
    pub fn next_request_id(&self) -> RequestId {
        self.ids.generate_request_id()
    }

    /// Run the call until `parse` accepts the text or the policy gives up.
    /// Returns the last failure.
    pub async fn run<T, F>(
        &self,
        request_id: RequestId,
        prompt: String,
        schema: Option<OutputSchema>,
        parse: F,
    ) -> Result<T, GenerationError>
    where
        F: Fn(&str) -> Result<T, GenerationError>,
    {
        let request = GenerationRequest {
            request_id,
            model: self.model.clone(),
            prompt,
            schema,
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            let result = match self.attempt(&request).await {
                Ok(text) => parse(&text),
                Err(e) => Err(e),
            };

            let err = match result {
                Ok(value) => {
                    debug!(attempt = attempts, "generation succeeded");
                    return Ok(value);
                }
                Err(e) => e,
            };

            if !err.is_retryable() || !self.retry.allows_another(attempts) {
                return Err(err);
            }

            let delay = self.retry.next_delay(attempts);
            warn!(
                attempt = attempts,
                error = %err,
                delay_ms = delay.as_millis() as u64,
                "generation attempt failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn attempt(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.generator.generate(request))
                .await
                .map_err(|_| GenerationError::TimedOut(limit))?,
            None => self.generator.generate(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::ScriptedGenerator;

    fn parse_upper(text: &str) -> Result<String, GenerationError> {
        if text.is_empty() {
            Err(GenerationError::EmptyResponse)
        } else {
            Ok(text.to_uppercase())
        }
    }

    fn call(generator: Arc<ScriptedGenerator>, retry: RetryPolicy) -> GenerationCall {
        GenerationCall::new(generator, "test-model").with_retry(retry)
    }

    #[tokio::test]
    async fn single_attempt_returns_first_failure() {
        let generator = Arc::new(
            ScriptedGenerator::new()
                .fail(GenerationError::Transport("reset".into()))
                .respond("never reached"),
        );
        let call = call(generator.clone(), RetryPolicy::single_attempt());

        let result = call
            .run(call.next_request_id(), "p".into(), None, parse_upper)
            .await;

        assert_eq!(result, Err(GenerationError::Transport("reset".into())));
        assert_eq!(generator.calls().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_failures_with_backoff() {
        let generator = Arc::new(
            ScriptedGenerator::new()
                .respond("")
                .fail(GenerationError::Transport("reset".into()))
                .respond("ok"),
        );
        let call = call(
            generator.clone(),
            RetryPolicy::new(3, Duration::from_secs(2), 2.0),
        );

        let started = tokio::time::Instant::now();
        let result = call
            .run(call.next_request_id(), "p".into(), None, parse_upper)
            .await;

        assert_eq!(result, Ok("OK".to_string()));
        assert_eq!(generator.calls().await, 3);
        // 2s + 4s
        assert!(started.elapsed() >= Duration::from_secs(6));
    }

    #[tokio::test]
    async fn permanent_failures_are_not_retried() {
        let generator = Arc::new(
            ScriptedGenerator::new()
                .fail(GenerationError::MissingCredentials)
                .respond("ok"),
        );
        let call = call(generator.clone(), RetryPolicy::new(5, Duration::ZERO, 1.0));

        let result = call
            .run(call.next_request_id(), "p".into(), None, parse_upper)
            .await;

        assert_eq!(result, Err(GenerationError::MissingCredentials));
        assert_eq!(generator.calls().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_generator_times_out() {
        let generator = Arc::new(
            ScriptedGenerator::new()
                .respond("late")
                .with_latency(Duration::from_secs(60)),
        );
        let call = GenerationCall::new(generator, "test-model")
            .with_timeout(Some(Duration::from_secs(5)));

        let result = call
            .run(call.next_request_id(), "p".into(), None, parse_upper)
            .await;

        assert_eq!(result, Err(GenerationError::TimedOut(Duration::from_secs(5))));
    }

    #[tokio::test]
    async fn request_carries_model_prompt_and_schema() {
        let generator = Arc::new(ScriptedGenerator::new().respond("x"));
        let call = GenerationCall::new(generator.clone(), "gemini-2.5-flash");
        let id = call.next_request_id();

        call.run(
            id,
            "the prompt".into(),
            Some(OutputSchema::job_specification()),
            parse_upper,
        )
        .await
        .unwrap();

        let received = generator.received().await;
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].request_id, id);
        assert_eq!(received[0].model, "gemini-2.5-flash");
        assert_eq!(received[0].prompt, "the prompt");
        assert!(received[0].schema.is_some());
    }
}
