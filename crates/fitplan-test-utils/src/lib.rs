//! Shared test utilities for fitplan tests.
//!
//! Provides a scripted [`FakeModel`] that stands in for the hosted model, and
//! a few ready-made profiles.
//!
//! A fake answers each call from its script in order, then repeats its
//! fallback. Every prompt it receives is recorded so tests can assert on the
//! exact outbound payload and on how many calls were made.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use fitplan_core::model::{ModelError, ModelReply, PlanModel};
use fitplan_core::profile::{ActivityLevel, Gender, Objective, PlanRequest};

/// One scripted outcome.
#[derive(Debug, Clone)]
pub enum Scripted {
    Reply(String),
    Timeout,
    Unauthorized,
    RateLimited,
    ServerError,
    Empty,
}

impl Scripted {
    fn into_result(self) -> Result<ModelReply, ModelError> {
        match self {
            Self::Reply(text) => Ok(ModelReply::text(text)),
            Self::Timeout => Err(ModelError::Timeout),
            Self::Unauthorized => Err(ModelError::Unauthorized { status: 401 }),
            Self::RateLimited => Err(ModelError::RateLimited {
                message: "quota exceeded for project 1234".to_owned(),
            }),
            Self::ServerError => Err(ModelError::Api {
                status: 500,
                message: "backend shard 7 unavailable".to_owned(),
            }),
            Self::Empty => Err(ModelError::Empty),
        }
    }
}

/// Holds a [`FakeModel`] call open until the test releases it.
#[derive(Clone)]
pub struct Gate {
    started: Arc<Notify>,
    release: Arc<Semaphore>,
}

impl Gate {
    /// Wait until a call has reached the model.
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    /// Let one held call finish.
    pub fn release(&self) {
        self.release.add_permits(1);
    }
}

pub struct FakeModel {
    script: Mutex<VecDeque<Scripted>>,
    fallback: Scripted,
    prompts: Mutex<Vec<String>>,
    gate: Option<Gate>,
}

impl FakeModel {
    /// Always answers with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_fallback(Scripted::Reply(text.into()))
    }

    /// Always fails with the given outcome.
    pub fn failing(outcome: Scripted) -> Self {
        Self::with_fallback(outcome)
    }

    fn with_fallback(fallback: Scripted) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            prompts: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Answer the next calls with `outcomes`, in order, before the fallback.
    pub fn then(self, outcomes: impl IntoIterator<Item = Scripted>) -> Self {
        self.script
            .lock()
            .expect("script lock poisoned")
            .extend(outcomes);
        self
    }

    /// Make every call wait for [`Gate::release`]. Returns the gate.
    pub fn gated(mut self) -> (Self, Gate) {
        let gate = Gate {
            started: Arc::new(Notify::new()),
            release: Arc::new(Semaphore::new(0)),
        };
        self.gate = Some(gate.clone());
        (self, gate)
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.prompts.lock().expect("prompts lock poisoned").len()
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock poisoned").clone()
    }
}

#[async_trait]
impl PlanModel for FakeModel {
    fn name(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    async fn generate(&self, prompt: &str) -> Result<ModelReply, ModelError> {
        self.prompts
            .lock()
            .expect("prompts lock poisoned")
            .push(prompt.to_owned());

        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release
                .acquire()
                .await
                .expect("gate semaphore closed")
                .forget();
        }

        let next = self
            .script
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        next.into_result()
    }
}

/// Markdown resembling a real plan, with a table and inline HTML.
pub const SAMPLE_PLAN_MARKDOWN: &str = "\
## Training plan

| Day | Type | Duration (min) | Description |
|-----|------|----------------|-------------|
| Monday | Strength | 45 | Full body |
| Wednesday | Cardio | 30 | Intervals |

<p class=\"why\">Chosen for steady progress.</p>
";

/// The worked example: a 30 year old woman aiming to lose 5 kg in 8 weeks.
pub fn sample_request() -> PlanRequest {
    PlanRequest {
        gender: Gender::Female,
        age: 30,
        height_cm: 165,
        current_weight_kg: 70,
        objective: Objective::LoseWeight,
        target_weight_kg: 65,
        weeks_to_goal: 8,
        training_sessions_per_week: 4,
        activity_level: ActivityLevel::ModeratelyActive,
    }
}

/// A maintenance profile (no target, no deadline).
pub fn maintenance_request() -> PlanRequest {
    PlanRequest {
        gender: Gender::Male,
        age: 45,
        height_cm: 178,
        current_weight_kg: 82,
        objective: Objective::Maintenance,
        target_weight_kg: 82,
        weeks_to_goal: 0,
        training_sessions_per_week: 2,
        activity_level: ActivityLevel::Sedentary,
    }
}
