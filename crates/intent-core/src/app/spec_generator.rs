//! SpecGenerator - タスク記述から JobSpecification を生成
//!
//! 生成の失敗はここで FallbackPolicy によってデータに変換され、
//! 呼び出し側にエラーとして漏れることはありません。

use std::sync::Arc;

use tracing::{Instrument, debug, info_span, warn};

use super::call::GenerationCall;
use crate::domain::analysis::Analysis;
use crate::domain::errors::GenerationError;
use crate::domain::fallback::FallbackPolicy;
use crate::domain::schema::OutputSchema;
use crate::domain::spec::JobSpecification;

/// Instruction wrapped around the user's task description.
pub fn build_prompt(task: &str) -> String {
    format!(
        "You are a DevOps and AI infrastructure expert. A user wants to run this computing task: \
         \"{task}\".\n\
         Analyze its technical requirements. Recommend specific GPU hardware (e.g. H100, A100, 4090), \
         estimate the memory (VRAM) it needs and how long it will take, and propose a maximum price \
         per hour in USD."
    )
}

/// SpecGenerator はタスク記述を JobSpecification に変換する
///
/// 出力スキーマ付きで 1 リクエストを送り、結果を検証します。
pub struct SpecGenerator {
    call: GenerationCall,
    fallback: Arc<dyn FallbackPolicy>,
    schema: OutputSchema,
}

impl SpecGenerator {
    /// SpecGenerator を作成
    pub fn new(call: GenerationCall, fallback: Arc<dyn FallbackPolicy>) -> Self {
        Self {
            call,
            fallback,
            schema: OutputSchema::job_specification(),
        }
    }

    /// Always yields a usable specification; `provenance` records whether it
    /// was generated or substituted.
    pub async fn analyze(&self, task: &str) -> Analysis {
        let task = task.trim();
        if task.is_empty() {
            let failure = GenerationError::BlankTask;
            warn!(reason = %failure, "skipping generation, using fallback specification");
            return Analysis::fallback(None, self.fallback.on_failure(&failure), failure.to_string());
        }

        let request_id = self.call.next_request_id();
        let span = info_span!(
            "spec_generation",
            request_id = %request_id,
            model = %self.call.model()
        );

        async {
            let result = self
                .call
                .run(
                    request_id,
                    build_prompt(task),
                    Some(self.schema.clone()),
                    JobSpecification::from_generated,
                )
                .await;

            match result {
                Ok(spec) => {
                    debug!(title = %spec.title, max_price = spec.max_price_per_hour, "specification generated");
                    Analysis::generated(request_id, spec)
                }
                Err(failure) => {
                    warn!(reason = %failure, "generation failed, using fallback specification");
                    Analysis::fallback(
                        Some(request_id),
                        self.fallback.on_failure(&failure),
                        failure.to_string(),
                    )
                }
            }
        }
        .instrument(span)
        .await
    }

    /// `analyze(task).spec`.
    pub async fn generate_specification(&self, task: &str) -> JobSpecification {
        self.analyze(task).await.into_spec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::Provenance;
    use crate::domain::fallback::SentinelFallback;
    use crate::impls::ScriptedGenerator;
    use rstest::rstest;

    const VALID: &str = r#"{
        "title": "Llama 3 70B LoRA fine-tune",
        "description": "Parameter-efficient fine-tuning on 50k instructions",
        "recommendedGpu": "NVIDIA H100 80GB",
        "estimatedDuration": "6 hours",
        "maxPrice": 2.5,
        "reasoning": "70B weights need 80GB-class memory even with LoRA"
    }"#;

    fn generator(scripted: ScriptedGenerator) -> (Arc<ScriptedGenerator>, SpecGenerator) {
        let scripted = Arc::new(scripted);
        let call = GenerationCall::new(scripted.clone(), "gemini-2.5-flash");
        (scripted, SpecGenerator::new(call, Arc::new(SentinelFallback)))
    }

    #[tokio::test]
    async fn valid_output_is_returned_as_generated() {
        let (scripted, generator) = generator(ScriptedGenerator::new().respond(VALID));

        let analysis = generator.analyze("fine-tune llama").await;

        assert_eq!(analysis.provenance, Provenance::Generated);
        assert_eq!(analysis.spec.recommended_hardware, "NVIDIA H100 80GB");
        assert_eq!(analysis.spec.max_price_per_hour, 2.5);

        let received = scripted.received().await;
        assert_eq!(received.len(), 1);
        assert_eq!(Some(received[0].request_id), analysis.request_id);
        assert!(received[0].prompt.contains("\"fine-tune llama\""));
        assert_eq!(received[0].schema, Some(OutputSchema::job_specification()));
    }

    #[rstest]
    #[case::missing_credentials(Err(GenerationError::MissingCredentials))]
    #[case::transport(Err(GenerationError::Transport("connection reset".into())))]
    #[case::empty_text(Ok(""))]
    #[case::whitespace_text(Ok("  \n"))]
    #[case::not_json(Ok("Sure! Here is your spec:"))]
    #[case::missing_field(Ok(r#"{"title": "t", "description": "d"}"#))]
    #[case::negative_price(Ok(
        r#"{"title":"t","description":"d","recommendedGpu":"g","estimatedDuration":"e","maxPrice":-1,"reasoning":"r"}"#
    ))]
    #[tokio::test]
    async fn every_failure_degrades_to_the_sentinel(#[case] response: Result<&str, GenerationError>) {
        let scripted = match response {
            Ok(text) => ScriptedGenerator::new().respond(text),
            Err(e) => ScriptedGenerator::new().fail(e),
        };
        let (_, generator) = generator(scripted);

        let analysis = generator.analyze("render a video").await;

        assert!(analysis.is_fallback());
        assert!(analysis.request_id.is_some());
        assert_eq!(analysis.spec, SentinelFallback::sentinel());
    }

    #[rstest]
    #[case("")]
    #[case("   \t")]
    #[tokio::test]
    async fn blank_task_makes_no_call(#[case] task: &str) {
        let (scripted, generator) = generator(ScriptedGenerator::new().respond(VALID));

        let analysis = generator.analyze(task).await;

        assert_eq!(analysis.request_id, None);
        assert_eq!(analysis.spec, SentinelFallback::sentinel());
        assert_eq!(scripted.calls().await, 0);
    }

    #[tokio::test]
    async fn extra_fields_in_output_are_ignored() {
        let text = r#"{"title":"t","description":"d","recommendedGpu":"A100","estimatedDuration":"1h",
                      "maxPrice":1.1,"reasoning":"r","vramGb":40}"#;
        let (_, generator) = generator(ScriptedGenerator::new().respond(text));

        let spec = generator.generate_specification("train").await;
        assert_eq!(spec.recommended_hardware, "A100");
    }

    #[test]
    fn prompt_embeds_the_task() {
        let prompt = build_prompt("transcribe 1000 hours of audio");
        assert!(prompt.contains("\"transcribe 1000 hours of audio\""));
        assert!(prompt.contains("H100"));
    }
}
