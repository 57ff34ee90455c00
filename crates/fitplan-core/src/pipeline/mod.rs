//! Plan request pipeline: request -> prompt -> model -> rendered plan.
//!
//! A [`PlanPipeline`] owns the injected model client and allows one
//! generation at a time. Failures come back as [`PipelineError`] and never
//! touch previously produced output; the caller decides what to keep.

pub mod render;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::model::{ModelError, ModelReply, PlanModel, TokenUsage};
use crate::profile::PlanRequest;
use crate::prompt::{self, TemplateError};

pub use render::markdown_to_html;

/// Notice shown after a successful generation.
pub const SUCCESS_NOTICE: &str = "Successfully generated!";
/// Notice shown for any failed generation. Provider details stay in the logs.
pub const FAILURE_NOTICE: &str = "Plan generation failed. Please try again.";
/// Notice shown when a generation is already running.
pub const BUSY_NOTICE: &str = "A plan is already being generated. Please wait.";

/// A generated plan, ready to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanResponse {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub model: String,
    /// Model output, unmodified.
    pub markdown: String,
    /// `markdown` rendered to HTML without sanitizing.
    pub html: String,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to build prompt: {0}")]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("a generation is already in progress")]
    Busy,
}

impl PipelineError {
    /// What the user is told. Never includes provider internals.
    pub fn user_notice(&self) -> &'static str {
        match self {
            Self::Busy => BUSY_NOTICE,
            Self::Template(_) | Self::Model(_) => FAILURE_NOTICE,
        }
    }
}

/// Clears the in-flight flag when a generation ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct PlanPipeline {
    model: Arc<dyn PlanModel>,
    in_flight: AtomicBool,
}

impl PlanPipeline {
    pub fn new(model: Arc<dyn PlanModel>) -> Self {
        Self {
            model,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.model()
    }

    /// Whether a generation is running right now.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn build_prompt(&self, request: &PlanRequest) -> Result<String, TemplateError> {
        prompt::build_prompt(request)
    }

    /// One model call with the given prompt.
    pub async fn submit(&self, prompt: &str) -> Result<ModelReply, ModelError> {
        self.model.generate(prompt).await
    }

    pub fn render(reply: &ModelReply) -> String {
        markdown_to_html(&reply.text)
    }

    /// Build the prompt, call the model once and render the reply.
    ///
    /// Returns [`PipelineError::Busy`] without calling the model if another
    /// generation has not finished yet.
    pub async fn generate(&self, request: &PlanRequest) -> Result<PlanResponse, PipelineError> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            warn!("generation rejected: another one is in flight");
            return Err(PipelineError::Busy);
        };

        let request_id = Uuid::new_v4();
        let span = info_span!(
            "generate",
            %request_id,
            provider = self.model.name(),
            model = self.model.model()
        );

        async {
            let prompt = self.build_prompt(request).inspect_err(|e| {
                error!(error = %e, "prompt template contract violated");
            })?;

            info!(
                objective = %request.objective,
                sessions = request.training_sessions_per_week,
                "requesting plan"
            );
            let started = std::time::Instant::now();
            let reply = self.submit(&prompt).await.inspect_err(|e| {
                error!(error = %e, elapsed_ms = started.elapsed().as_millis() as u64, "model call failed");
            })?;

            if let Some(usage) = reply.usage {
                info!(
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    total_tokens = usage.total_tokens,
                    "model usage"
                );
            }
            info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                chars = reply.text.len(),
                "plan generated"
            );

            Ok::<_, PipelineError>(PlanResponse {
                request_id,
                generated_at: Utc::now(),
                model: self.model.model().to_owned(),
                html: Self::render(&reply),
                usage: reply.usage,
                markdown: reply.text,
            })
        }
        .instrument(span)
        .await
    }
}
