//! CommandGenerator - 外部プロセスへの生成委譲
//!
//! The configured program receives the request as one JSON document on
//! stdin (`request_id`, `model`, `prompt`, optional `response_mime_type` /
//! `response_schema`) and must print the generated text on stdout.
//! Credentials are handed over through the `API_KEY` environment variable;
//! the process is the boundary, how it reaches a model is its own business.

use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::GenerationError;
use crate::ports::{GenerationRequest, TextGenerator};

#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    api_key: String,
}

impl CommandGenerator {
    /// 起動するプログラム・引数・子プロセスに渡す API キーを指定
    pub fn new(program: impl Into<String>, args: Vec<String>, api_key: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args,
            api_key: api_key.into(),
        }
    }

    /// Build from a `[program, args...]` command line. `None` when empty.
    pub fn from_command_line(command: &[String], api_key: impl Into<String>) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec(), api_key))
    }

    /// 起動するプログラム名
    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl TextGenerator for CommandGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let body = request
            .to_wire_json()
            .map_err(|e| GenerationError::Transport(format!("encode request: {e}")))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("API_KEY", &self.api_key)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // 呼び出し側が timeout で諦めたらプロセスも止める
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| GenerationError::Unavailable(format!("spawn {}: {e}", self.program)))?;

        // stdin への書き込みと stdout の読み出しを並行に進める。
        // 順番に行うと、パイプが埋まった時点で親子が互いを待ち続ける。
        let stdin = child.stdin.take();
        let write_request = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            match stdin.write_all(body.as_bytes()).await {
                // 入力を読み切らずに応答するプロセスもある。判定は終了コードと stdout で行う
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
            // stdin の drop でパイプが閉じ、子プロセスに EOF が届く
        };

        let (written, output) = tokio::join!(write_request, child.wait_with_output());

        let output = output
            .map_err(|e| GenerationError::Transport(format!("wait for {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GenerationError::Transport(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        written.map_err(|e| GenerationError::Transport(format!("write request: {e}")))?;

        debug!(
            request_id = %request.request_id,
            bytes = output.stdout.len(),
            "generator process finished"
        );

        String::from_utf8(output.stdout)
            .map_err(|e| GenerationError::Transport(format!("non UTF-8 output: {e}")))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::domain::ids::RequestId;
    use ulid::Ulid;

    fn request() -> GenerationRequest {
        GenerationRequest {
            request_id: RequestId::from_ulid(Ulid::new()),
            model: "test-model".to_string(),
            prompt: "describe the network".to_string(),
            schema: None,
        }
    }

    /// パイプのバッファ（通常 64 KiB）を大きく超えるリクエスト
    fn large_request() -> GenerationRequest {
        GenerationRequest {
            prompt: "x".repeat(512 * 1024),
            ..request()
        }
    }

    fn sh(script: &str) -> CommandGenerator {
        CommandGenerator::new("sh", vec!["-c".to_string(), script.to_string()], "secret-key")
    }

    #[tokio::test]
    async fn returns_stdout_and_passes_credentials() {
        let generator = sh(r#"cat > /dev/null; printf '%s' "$API_KEY""#);
        assert_eq!(generator.generate(&request()).await, Ok("secret-key".to_string()));
    }

    #[tokio::test]
    async fn request_is_written_to_stdin_as_json() {
        let generator = sh("cat");
        let echoed = generator.generate(&request()).await.unwrap();
        let v: serde_json::Value = serde_json::from_str(&echoed).unwrap();
        assert_eq!(v["prompt"], "describe the network");
        assert_eq!(v["model"], "test-model");
    }

    #[tokio::test]
    async fn large_request_echoed_back_does_not_stall() {
        let generator = sh("cat");
        let result = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            generator.generate(&large_request()),
        )
        .await
        .expect("generator process stalled");

        let echoed = result.unwrap();
        assert!(echoed.len() > 512 * 1024);
        let v: serde_json::Value = serde_json::from_str(&echoed).unwrap();
        assert_eq!(v["prompt"].as_str().map(str::len), Some(512 * 1024));
    }

    #[tokio::test]
    async fn answer_without_reading_stdin_is_kept() {
        let generator = sh("printf ok");
        assert_eq!(
            generator.generate(&large_request()).await,
            Ok("ok".to_string())
        );
    }

    #[tokio::test]
    async fn non_zero_exit_is_a_transport_failure() {
        let generator = sh("cat > /dev/null; echo boom >&2; exit 3");
        let err = generator.generate(&request()).await.unwrap_err();
        assert!(matches!(&err, GenerationError::Transport(msg) if msg.contains("boom")));
    }

    #[tokio::test]
    async fn missing_program_is_unavailable() {
        let generator = CommandGenerator::new("/nonexistent/generator", Vec::new(), "k");
        assert!(matches!(
            generator.generate(&request()).await,
            Err(GenerationError::Unavailable(_))
        ));
    }

    #[test]
    fn from_command_line_splits_program_and_args() {
        let line = vec!["python3".to_string(), "gen.py".to_string()];
        let generator = CommandGenerator::from_command_line(&line, "k").unwrap();
        assert_eq!(generator.program(), "python3");
        assert!(CommandGenerator::from_command_line(&[], "k").is_none());
    }
}
