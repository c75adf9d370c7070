//! Type definitions for collaborator interactions

use serde::{Deserialize, Serialize};
use weaver_core::{Context, RoleId};

/// Literal marker the tester emits when all tests are reported passing
pub const COMPLETE_MARKER: &str = "IMPLEMENTATION COMPLETE";

/// Literal marker the tester emits when tests are reported failing
pub const FAILED_MARKER: &str = "FAILED";

/// Reply from one collaborator invocation
#[derive(Debug, Clone)]
pub struct AgentReply {
    /// Role that produced the reply
    pub role: RoleId,
    /// Free-text response
    pub text: String,
    /// Context snapshot layered with this hand-off's additions
    pub context: Context,
}

impl AgentReply {
    /// Classify this reply's completion signal
    pub fn verdict(&self) -> Verdict {
        Verdict::from_text(&self.text)
    }
}

/// Closed classification of a tester reply
///
/// The markers are untrusted free text; this is the single place they are
/// inspected. Nothing downstream searches the reply again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Reply contains the completion marker
    Complete,
    /// Reply contains the failure marker
    Failed(String),
    /// Neither marker present
    Inconclusive,
}

impl Verdict {
    /// Derive a verdict from reply text
    ///
    /// The completion marker takes precedence when both appear, matching
    /// the tester's branch order in the pipeline this replaces.
    pub fn from_text(text: &str) -> Self {
        if text.contains(COMPLETE_MARKER) {
            Verdict::Complete
        } else if text.contains(FAILED_MARKER) {
            let reason = text
                .lines()
                .find(|l| l.contains(FAILED_MARKER))
                .unwrap_or(FAILED_MARKER)
                .trim()
                .to_string();
            Verdict::Failed(reason)
        } else {
            Verdict::Inconclusive
        }
    }
}

/// Anthropic API message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicMessage {
    pub role: String,
    pub content: String,
}

/// Anthropic API request format
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicRequest {
    pub model: String,
    pub max_tokens: usize,
    pub system: String,
    pub messages: Vec<AnthropicMessage>,
}

/// Anthropic API response format
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicResponse {
    pub content: Vec<AnthropicContent>,
}

/// Content block in an Anthropic response
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicContent {
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(default)]
    pub text: String,
}
