//! Collaborator boundary - the external agent-execution capability
//!
//! The whole pipeline treats "run this role against this conversation" as
//! an opaque call: role + message history + context in, responding role +
//! free text + updated context out. The production implementation speaks
//! the Anthropic Messages API; tests script the trait directly.

use async_trait::async_trait;
use std::time::Duration;
use weaver_core::{ChatMessage, Context, Result, RoleId, WeaverConfig, WeaverError};

use crate::roles;
use crate::types::{AgentReply, AnthropicMessage, AnthropicRequest, AnthropicResponse};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

// Rate limit retry configuration
const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_SECS: u64 = 15;
const MAX_BACKOFF_SECS: u64 = 120;

/// Opaque agent-execution capability
///
/// Implementations either succeed with a reply or fail outright; the task
/// runner treats any failure as a non-productive iteration, bounded by
/// the same cap as productive ones.
#[async_trait]
pub trait Collaborator: Send + Sync {
    /// Run one role against a message history and context snapshot
    async fn run(
        &self,
        role: RoleId,
        messages: &[ChatMessage],
        context: &Context,
    ) -> Result<AgentReply>;
}

/// Anthropic-backed collaborator
#[derive(Debug, Clone)]
pub struct AnthropicCollaborator {
    http: reqwest::Client,
    model: String,
    max_tokens: usize,
    api_key: String,
    timeout_secs: u64,
}

impl AnthropicCollaborator {
    /// Build a collaborator from run configuration
    ///
    /// Reads the API key from the configured environment variable and
    /// installs the per-call timeout on the HTTP client.
    pub fn from_config(config: &WeaverConfig) -> Result<Self> {
        let api_key = std::env::var(&config.models.api_key_env)
            .map_err(|_| WeaverError::MissingApiKey(config.models.api_key_env.clone()))?;

        let timeout_secs = config.loop_defaults.request_timeout_secs;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| WeaverError::Agent(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            model: config.models.default.clone(),
            max_tokens: config.loop_defaults.max_tokens,
            api_key,
            timeout_secs,
        })
    }

    async fn send(&self, request: &AnthropicRequest) -> Result<String> {
        let mut retries = 0;
        let mut backoff_secs = INITIAL_BACKOFF_SECS;

        loop {
            tracing::debug!("Sending collaborator request (attempt {})", retries + 1);

            let response = self
                .http
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(request)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        WeaverError::AgentTimeout(self.timeout_secs)
                    } else {
                        WeaverError::Agent(format!("Failed to send request: {}", e))
                    }
                })?;

            let status = response.status();

            // Rate limit (429): bounded retry with backoff
            if status.as_u16() == 429 {
                retries += 1;
                if retries > MAX_RETRIES {
                    return Err(WeaverError::ApiLimit(format!(
                        "Rate limit exceeded after {} retries",
                        MAX_RETRIES
                    )));
                }

                let wait_secs = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(backoff_secs);

                tracing::warn!(
                    "Rate limited (429). Waiting {}s before retry {}/{}",
                    wait_secs,
                    retries,
                    MAX_RETRIES
                );
                tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                backoff_secs = (backoff_secs * 2).min(MAX_BACKOFF_SECS);
                continue;
            }

            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown".to_string());
                return Err(WeaverError::Agent(format!(
                    "API error {}: {}",
                    status, error_text
                )));
            }

            let parsed: AnthropicResponse = response
                .json()
                .await
                .map_err(|e| WeaverError::Agent(format!("Failed to parse response: {}", e)))?;

            let text: String = parsed
                .content
                .iter()
                .filter(|c| c.content_type == "text")
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join("");

            if text.is_empty() {
                return Err(WeaverError::Agent("No text content in response".to_string()));
            }

            return Ok(text);
        }
    }
}

#[async_trait]
impl Collaborator for AnthropicCollaborator {
    async fn run(
        &self,
        role: RoleId,
        messages: &[ChatMessage],
        context: &Context,
    ) -> Result<AgentReply> {
        let definition = roles::role(role);

        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: definition.instructions.to_string(),
            messages: messages
                .iter()
                .map(|m| AnthropicMessage {
                    role: m.role.clone(),
                    content: m.content.clone(),
                })
                .collect(),
        };

        let text = self.send(&request).await?;
        tracing::info!("{} replied ({} chars)", definition.name, text.len());

        // Each hand-off layers a fresh snapshot; callers keep their own.
        let context = context.with("last_role", role.to_string());

        Ok(AgentReply {
            role,
            text,
            context,
        })
    }
}
