use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use fitplan_core::form::{FieldError, FormCollector, FormView};
use fitplan_core::pipeline::{
    FAILURE_NOTICE, PipelineError, PlanPipeline, PlanResponse, SUCCESS_NOTICE,
};

use crate::page;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }
}

impl From<FieldError> for AppError {
    fn from(err: FieldError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        let status = match &err {
            PipelineError::Busy => StatusCode::CONFLICT,
            PipelineError::Model(_) => StatusCode::BAD_GATEWAY,
            PipelineError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.user_notice().to_owned(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Shared state for one interactive session.
#[derive(Clone)]
pub struct AppState {
    form: Arc<Mutex<FormCollector>>,
    pipeline: Arc<PlanPipeline>,
    /// Last successful plan. Failures never overwrite it.
    last_plan: Arc<Mutex<Option<PlanResponse>>>,
}

impl AppState {
    pub fn new(pipeline: Arc<PlanPipeline>) -> Self {
        Self {
            form: Arc::new(Mutex::new(FormCollector::new())),
            pipeline,
            last_plan: Arc::new(Mutex::new(None)),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One control change from the page.
#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub field: String,
    pub value: serde_json::Value,
}

impl FieldUpdate {
    fn value_text(&self) -> Result<String, AppError> {
        match &self.value {
            serde_json::Value::String(s) => Ok(s.clone()),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            other => Err(AppError::bad_request(format!(
                "field {} expects a string or number, got {other}",
                self.field
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub plan: PlanResponse,
    pub notice: &'static str,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/api/form", get(get_form).post(update_form))
        .route("/api/form/reset", post(reset_form))
        .route("/api/generate", post(generate))
        .route("/api/output", get(get_output))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(pipeline: Arc<PlanPipeline>, bind: &str, port: u16) -> Result<()> {
    let app = build_router(AppState::new(pipeline.clone()));
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!(model = pipeline.model_name(), "fitplan serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("fitplan serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C; shutting down");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index(State(state): State<AppState>) -> Html<String> {
    let view = state.form.lock().await.view();
    let last_plan = state.last_plan.lock().await;
    Html(page::render_page(&view, last_plan.as_ref()))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_form(State(state): State<AppState>) -> Json<FormView> {
    Json(state.form.lock().await.view())
}

async fn update_form(
    State(state): State<AppState>,
    Json(update): Json<FieldUpdate>,
) -> Result<Json<FormView>, AppError> {
    let value = update.value_text()?;
    let mut form = state.form.lock().await;
    form.set_field(&update.field, &value)?;
    Ok(Json(form.view()))
}

async fn reset_form(State(state): State<AppState>) -> Json<FormView> {
    let mut form = state.form.lock().await;
    form.reset();
    Json(form.view())
}

async fn generate(State(state): State<AppState>) -> Result<Json<GenerateResponse>, AppError> {
    // Snapshot, then release the form so the page stays responsive.
    let request = state.form.lock().await.snapshot();

    let plan = state.pipeline.generate(&request).await.map_err(|e| {
        if !matches!(e, PipelineError::Busy) {
            tracing::warn!(notice = FAILURE_NOTICE, "generation failed; keeping previous output");
        }
        AppError::from(e)
    })?;

    *state.last_plan.lock().await = Some(plan.clone());
    Ok(Json(GenerateResponse {
        plan,
        notice: SUCCESS_NOTICE,
    }))
}

async fn get_output(State(state): State<AppState>) -> Json<Option<PlanResponse>> {
    Json(state.last_plan.lock().await.clone())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
