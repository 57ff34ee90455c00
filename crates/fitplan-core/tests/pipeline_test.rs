//! Pipeline tests against a scripted fake model.

use std::sync::Arc;

use fitplan_core::form::FormCollector;
use fitplan_core::model::ModelError;
use fitplan_core::pipeline::{FAILURE_NOTICE, PipelineError, PlanPipeline};
use fitplan_core::prompt::build_prompt;
use fitplan_test_utils::{
    FakeModel, SAMPLE_PLAN_MARKDOWN, Scripted, maintenance_request, sample_request,
};

#[tokio::test]
async fn scenario_issues_exactly_one_call_with_the_built_prompt() {
    let fake = Arc::new(FakeModel::replying(SAMPLE_PLAN_MARKDOWN));
    let pipeline = PlanPipeline::new(fake.clone());

    let request = sample_request();
    let plan = pipeline.generate(&request).await.expect("generation should succeed");

    assert_eq!(fake.calls(), 1);
    let sent = &fake.prompts()[0];
    assert_eq!(sent, &build_prompt(&request).unwrap());
    for needle in ["female", "30", "165", "70", "65", "8", "4", "Moderately active"] {
        assert!(sent.contains(needle), "payload should contain {needle:?}");
    }

    assert_eq!(plan.markdown, SAMPLE_PLAN_MARKDOWN);
    assert_eq!(plan.model, "fake-model");
    assert!(plan.html.contains("<table>"));
    assert!(plan.html.contains("<p class=\"why\">Chosen for steady progress.</p>"));
    assert!(!pipeline.is_busy());
}

#[tokio::test]
async fn timeout_fails_once_without_retry() {
    let fake = Arc::new(FakeModel::failing(Scripted::Timeout));
    let pipeline = PlanPipeline::new(fake.clone());

    let err = pipeline.generate(&sample_request()).await.unwrap_err();

    assert!(matches!(err, PipelineError::Model(ModelError::Timeout)));
    assert_eq!(err.user_notice(), FAILURE_NOTICE);
    assert_eq!(fake.calls(), 1, "no automatic retry");
    assert!(!pipeline.is_busy(), "busy flag must clear after failure");
}

#[tokio::test]
async fn every_remote_failure_maps_to_the_generic_notice() {
    for outcome in [
        Scripted::Unauthorized,
        Scripted::RateLimited,
        Scripted::ServerError,
        Scripted::Empty,
    ] {
        let pipeline = PlanPipeline::new(Arc::new(FakeModel::failing(outcome.clone())));
        let err = pipeline.generate(&sample_request()).await.unwrap_err();
        assert_eq!(err.user_notice(), FAILURE_NOTICE, "outcome {outcome:?}");
    }
}

#[tokio::test]
async fn manual_retry_after_failure_succeeds() {
    let fake = Arc::new(FakeModel::replying("# ok").then([Scripted::RateLimited]));
    let pipeline = PlanPipeline::new(fake.clone());

    assert!(pipeline.generate(&sample_request()).await.is_err());
    let plan = pipeline.generate(&sample_request()).await.unwrap();
    assert_eq!(plan.markdown, "# ok");
    assert_eq!(fake.calls(), 2);
}

#[tokio::test]
async fn second_generation_while_busy_is_rejected_without_a_call() {
    let (fake, gate) = FakeModel::replying("# plan").gated();
    let fake = Arc::new(fake);
    let pipeline = Arc::new(PlanPipeline::new(fake.clone()));

    let first = {
        let pipeline = pipeline.clone();
        tokio::spawn(async move { pipeline.generate(&sample_request()).await })
    };
    gate.wait_started().await;
    assert!(pipeline.is_busy());

    let err = pipeline.generate(&sample_request()).await.unwrap_err();
    assert!(matches!(err, PipelineError::Busy));
    assert_eq!(fake.calls(), 1);

    gate.release();
    let plan = first.await.unwrap().expect("first generation should finish");
    assert_eq!(plan.markdown, "# plan");
    assert!(!pipeline.is_busy());
}

#[tokio::test]
async fn form_snapshot_feeds_the_pipeline() {
    let fake = Arc::new(FakeModel::replying("# plan"));
    let pipeline = PlanPipeline::new(fake.clone());

    let mut form = FormCollector::new();
    form.set_field("objective", "Maintenance").unwrap();
    form.set_field("current_weight_kg", "82").unwrap();
    pipeline.generate(&form.snapshot()).await.unwrap();

    let sent = &fake.prompts()[0];
    assert!(sent.contains("The goal they want to achieve is: Maintenance."));
    assert!(sent.contains("The target weight is 82 kg and must be reached in 0 weeks"));
}

#[tokio::test]
async fn identical_requests_send_identical_payloads() {
    let fake = Arc::new(FakeModel::replying("# plan"));
    let pipeline = PlanPipeline::new(fake.clone());

    pipeline.generate(&maintenance_request()).await.unwrap();
    pipeline.generate(&maintenance_request()).await.unwrap();

    let prompts = fake.prompts();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], prompts[1]);
}
