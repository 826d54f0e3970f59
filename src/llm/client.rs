//! LLM collaborator.
//!
//! The model is reached either by spawning a local binary (`ollama run <model>
//! <prompt>`) or by posting to Ollama's HTTP generate endpoint. Both return the
//! model's text trimmed, with no structure assumed.

use crate::config::{LlmBackendKind, LlmConfig};
use crate::otel::llm_span;
use crate::types::{ChatError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn, Instrument};

/// How long to wait for the model before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeoutPolicy {
    /// Wait as long as the model takes
    #[default]
    Unbounded,
    /// Abort the request after the given duration
    After(Duration),
}

impl TimeoutPolicy {
    pub fn from_secs(secs: Option<u64>) -> Self {
        match secs {
            Some(s) if s > 0 => Self::After(Duration::from_secs(s)),
            _ => Self::Unbounded,
        }
    }
}

/// Text-in, text-out model backend.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Backend name for tracing.
    fn name(&self) -> &str;

    /// Generate a completion for a single free-text prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Runs `<command> run <model> <prompt>` and returns its stdout.
pub struct ProcessBackend {
    command: String,
    model: String,
}

impl ProcessBackend {
    pub fn new(command: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl LlmBackend for ProcessBackend {
    fn name(&self) -> &str {
        "process"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let output = Command::new(&self.command)
            .arg("run")
            .arg(&self.model)
            .arg(prompt)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ChatError::llm(format!("failed to launch '{}': {}", self.command, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr.trim(), "LLM process exited with failure");
            if stdout.is_empty() {
                return Err(ChatError::llm(format!(
                    "'{}' exited with {}: {}",
                    self.command,
                    output.status,
                    stderr.trim()
                )));
            }
        }

        Ok(stdout)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Posts to `<endpoint>/api/generate` with streaming disabled.
pub struct OllamaHttpBackend {
    endpoint: String,
    model: String,
    client: Client,
}

impl OllamaHttpBackend {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client: Client::new(),
        }
    }

    fn url(&self) -> String {
        format!("{}/api/generate", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmBackend for OllamaHttpBackend {
    fn name(&self) -> &str {
        "ollama_http"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(self.url())
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| ChatError::llm(format!("Ollama API error: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::llm(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ChatError::llm(format!("Ollama API error {}: {}", status, body)));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| ChatError::llm(format!("Failed to parse Ollama response: {}", e)))?;

        Ok(parsed.response.trim().to_string())
    }
}

/// Backend plus timeout policy.
pub struct LlmClient {
    backend: Box<dyn LlmBackend>,
    timeout: TimeoutPolicy,
}

impl LlmClient {
    pub fn new(backend: Box<dyn LlmBackend>, timeout: TimeoutPolicy) -> Self {
        Self { backend, timeout }
    }

    /// Build the configured backend.
    pub fn from_config(config: &LlmConfig) -> Self {
        let backend: Box<dyn LlmBackend> = match config.backend {
            LlmBackendKind::Process => Box::new(ProcessBackend::new(&config.command, &config.model)),
            LlmBackendKind::OllamaHttp => {
                Box::new(OllamaHttpBackend::new(&config.endpoint, &config.model))
            }
        };
        Self::new(backend, TimeoutPolicy::from_secs(config.timeout_secs))
    }

    pub fn timeout(&self) -> TimeoutPolicy {
        self.timeout
    }

    /// Send one prompt and wait for the answer.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Timeout` if the policy's limit elapses first, or the
    /// backend's own error
    pub async fn ask(&self, prompt: &str) -> Result<String> {
        let span = llm_span(self.backend.name(), prompt.len());
        async {
            debug!(prompt = %prompt, "sending prompt");
            let answer = match self.timeout {
                TimeoutPolicy::Unbounded => self.backend.generate(prompt).await?,
                TimeoutPolicy::After(limit) => {
                    tokio::time::timeout(limit, self.backend.generate(prompt))
                        .await
                        .map_err(|_| ChatError::Timeout(limit))??
                }
            };
            debug!(chars = answer.len(), "received answer");
            Ok::<_, ChatError>(answer)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowBackend;

    #[async_trait]
    impl LlmBackend for SlowBackend {
        fn name(&self) -> &str {
            "slow"
        }

        async fn generate(&self, _prompt: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("late".to_string())
        }
    }

    #[test]
    fn test_timeout_policy_from_secs() {
        assert_eq!(TimeoutPolicy::from_secs(None), TimeoutPolicy::Unbounded);
        assert_eq!(TimeoutPolicy::from_secs(Some(0)), TimeoutPolicy::Unbounded);
        assert_eq!(
            TimeoutPolicy::from_secs(Some(30)),
            TimeoutPolicy::After(Duration::from_secs(30))
        );
    }

    #[tokio::test]
    async fn test_timeout_aborts_slow_backend() {
        let client = LlmClient::new(
            Box::new(SlowBackend),
            TimeoutPolicy::After(Duration::from_millis(20)),
        );
        let err = client.ask("anything").await.unwrap_err();
        assert!(matches!(err, ChatError::Timeout(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_backend_returns_trimmed_stdout() {
        // `echo run <model> <prompt>` stands in for the model binary
        let backend = ProcessBackend::new("echo", "llama3");
        let out = backend.generate("what is rust").await.unwrap();
        assert_eq!(out, "run llama3 what is rust");
    }

    #[tokio::test]
    async fn test_process_backend_missing_binary() {
        let backend = ProcessBackend::new("definitely-not-an-llm-binary-xyz", "llama3");
        let err = backend.generate("hi").await.unwrap_err();
        assert!(matches!(err, ChatError::LlmError(_)));
    }

    #[test]
    fn test_ollama_url() {
        let backend = OllamaHttpBackend::new("http://localhost:11434/", "llama3");
        assert_eq!(backend.url(), "http://localhost:11434/api/generate");
    }
}
