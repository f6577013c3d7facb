//! TextGenerator port - 外部テキスト生成サービス
//!
//! The only suspension point of the pipeline. Implementations report every
//! failure (missing credentials, transport, empty output) as a
//! `GenerationError`; turning that into sentinel data is the caller's job.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::errors::GenerationError;
use crate::domain::ids::RequestId;
use crate::domain::schema::OutputSchema;

/// One request to the generation capability.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub request_id: RequestId,
    pub model: String,
    pub prompt: String,
    /// When set, the capability is asked for JSON conforming to it.
    pub schema: Option<OutputSchema>,
}

/// Wire form handed to out-of-process backends.
#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    request_id: String,
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

impl GenerationRequest {
    /// プロセス外バックエンドに渡す JSON
    pub fn to_wire_json(&self) -> Result<String, serde_json::Error> {
        let wire = WireRequest {
            request_id: self.request_id.to_string(),
            model: &self.model,
            prompt: &self.prompt,
            response_mime_type: self.schema.as_ref().map(|_| "application/json"),
            response_schema: self.schema.as_ref().map(OutputSchema::to_json),
        };
        serde_json::to_string(&wire)
    }
}

/// Thread Safety: `Send + Sync` so one generator can serve concurrent calls.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the raw generated text. Empty text is returned as-is; callers
    /// decide whether it counts as a failure.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    fn request(schema: Option<OutputSchema>) -> GenerationRequest {
        GenerationRequest {
            request_id: RequestId::from_ulid(Ulid::nil()),
            model: "gemini-2.5-flash".to_string(),
            prompt: "hello".to_string(),
            schema,
        }
    }

    #[test]
    fn wire_json_includes_schema_only_when_constrained() {
        let v: serde_json::Value =
            serde_json::from_str(&request(None).to_wire_json().unwrap()).unwrap();
        assert_eq!(v["model"], "gemini-2.5-flash");
        assert!(v.get("response_schema").is_none());
        assert!(v.get("response_mime_type").is_none());

        let v: serde_json::Value = serde_json::from_str(
            &request(Some(OutputSchema::job_specification()))
                .to_wire_json()
                .unwrap(),
        )
        .unwrap();
        assert_eq!(v["response_mime_type"], "application/json");
        assert_eq!(v["response_schema"]["type"], "OBJECT");
        assert!(v["request_id"].as_str().unwrap().starts_with("req-"));
    }
}
