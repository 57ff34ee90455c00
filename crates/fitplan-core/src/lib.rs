//! Core of fitplan: the profile form, the plan prompt and the pipeline that
//! sends it to a hosted model.

pub mod form;
pub mod model;
pub mod pipeline;
pub mod profile;
pub mod prompt;

pub use form::FormCollector;
pub use model::{GeminiClient, GeminiConfig, ModelError, PlanModel};
pub use pipeline::{PipelineError, PlanPipeline, PlanResponse};
pub use profile::{ActivityLevel, Gender, Objective, PlanRequest};
