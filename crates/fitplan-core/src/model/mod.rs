//! Text-generation model clients.
//!
//! The pipeline talks to the model through the [`PlanModel`] trait so the
//! real [`GeminiClient`] can be swapped for a fake in tests.
//!
//! ```text
//! PlanPipeline --generate(prompt)--> Arc<dyn PlanModel>
//!                                        |
//!                                        +-- GeminiClient --POST--> :generateContent
//! ```

pub mod gemini;

use async_trait::async_trait;
use serde::Serialize;

pub use gemini::{GeminiClient, GeminiConfig};

/// Token accounting reported by the provider, when it reports any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Text returned by a model call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    /// Markdown text, untouched.
    pub text: String,
    pub usage: Option<TokenUsage>,
    pub finish_reason: Option<String>,
}

impl ModelReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
            finish_reason: None,
        }
    }
}

/// Why a model call failed.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model request timed out")]
    Timeout,

    #[error("model request failed: {0}")]
    Transport(String),

    #[error("model provider rejected the credentials (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("model provider rate limit or quota exceeded: {message}")]
    RateLimited { message: String },

    #[error("model provider error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed model response: {0}")]
    Malformed(String),

    #[error("model returned no text")]
    Empty,
}

/// A hosted text-generation model.
#[async_trait]
pub trait PlanModel: Send + Sync {
    /// Provider name for logs (e.g. "gemini").
    fn name(&self) -> &str;

    /// Model identifier sent to the provider.
    fn model(&self) -> &str;

    /// Send one prompt and wait for the full reply. No retries.
    async fn generate(&self, prompt: &str) -> Result<ModelReply, ModelError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn PlanModel) {}
};
