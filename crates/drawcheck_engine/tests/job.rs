mod common;

use std::path::PathBuf;
use std::sync::Arc;

use common::{FakeBackend, FakeClient, TestSink};
use drawcheck_engine::{
    run_job, AnalysisError, AnalysisMode, DocumentExtractor, EngineEvent, ExtractorSettings,
    InferenceClient, InferenceError, InferenceSettings, JobContext, JobOutcome, JobSpec,
    ModelSelection, ReportSource, Stage,
};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

fn spec(mode: AnalysisMode, document: &str) -> JobSpec {
    JobSpec {
        job_id: 9,
        mode,
        document: PathBuf::from(document),
        models: ModelSelection {
            text_model: "llama2:3b".to_string(),
            vision_model: "llava:7b".to_string(),
        },
    }
}

fn context(backend: &FakeBackend, client: Arc<FakeClient>) -> JobContext {
    JobContext {
        extractor: Arc::new(DocumentExtractor::new(
            Arc::new(backend.clone()),
            ExtractorSettings::default(),
        )),
        client: client as Arc<dyn InferenceClient>,
        inference: InferenceSettings::default(),
    }
}

fn stages(events: &[EngineEvent]) -> Vec<Stage> {
    events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::Progress(progress) => Some(progress.stage),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn fast_job_skips_graphics() {
    let backend = FakeBackend::with_pages(&["РАЗРАБ. ", "Иванов"]);
    let client = Arc::new(FakeClient::replying(Ok("СООТВЕТСТВИЕ: ДА".to_string())));
    let sink = TestSink::default();

    let outcome = run_job(
        &spec(AnalysisMode::Fast, "drawing.pdf"),
        &context(&backend, Arc::clone(&client)),
        &CancellationToken::new(),
        &sink,
    )
    .await;

    match outcome {
        JobOutcome::Completed(report) => {
            assert_eq!(report.text, "СООТВЕТСТВИЕ: ДА");
            assert_eq!(report.source, ReportSource::Model);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    let requests = client.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "llama2:3b");
    assert_eq!(requests[0].images, None);
    assert_eq!(
        stages(&sink.take()),
        vec![Stage::ExtractingText, Stage::ExtractingText, Stage::Analyzing]
    );
    assert_eq!(backend.open_handles(), 0);
}

#[tokio::test]
async fn standard_job_sends_page_images_to_vision_model() {
    let backend = FakeBackend::with_pages(&["a", "b", "c", "d"]);
    let client = Arc::new(FakeClient::replying(Ok("ok".to_string())));
    let sink = TestSink::default();

    let outcome = run_job(
        &spec(AnalysisMode::Standard, "drawing.pdf"),
        &context(&backend, Arc::clone(&client)),
        &CancellationToken::new(),
        &sink,
    )
    .await;

    assert!(matches!(outcome, JobOutcome::Completed(_)));
    let requests = client.requests.lock().unwrap();
    assert_eq!(requests[0].model, "llava:7b");
    assert_eq!(requests[0].images.as_ref().map(Vec::len), Some(3));

    let events = sink.take();
    assert!(stages(&events).contains(&Stage::ExtractingImages));
    assert!(events.iter().any(|event| matches!(
        event,
        EngineEvent::Progress(progress) if progress.message == "Extracted 3 images"
    )));
}

#[tokio::test]
async fn text_progress_counts_characters() {
    let backend = FakeBackend::with_pages(&["Лист 1"]);
    let client = Arc::new(FakeClient::replying(Ok("ok".to_string())));
    let sink = TestSink::default();

    run_job(
        &spec(AnalysisMode::Fast, "drawing.pdf"),
        &context(&backend, client),
        &CancellationToken::new(),
        &sink,
    )
    .await;

    let messages: Vec<String> = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            EngineEvent::Progress(progress) => Some(progress.message),
            _ => None,
        })
        .collect();
    assert!(messages.contains(&"Text extracted: 6 characters".to_string()));
}

#[tokio::test]
async fn cancelled_before_start_never_calls_the_service() {
    let backend = FakeBackend::with_pages(&["text"]);
    let client = Arc::new(FakeClient::replying(Ok("ok".to_string())));
    let token = CancellationToken::new();
    token.cancel();

    let outcome = run_job(
        &spec(AnalysisMode::Standard, "drawing.pdf"),
        &context(&backend, Arc::clone(&client)),
        &token,
        &TestSink::default(),
    )
    .await;

    assert_eq!(outcome, JobOutcome::Cancelled);
    assert_eq!(client.calls(), 0);
    assert_eq!(backend.opened.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn reply_after_stop_is_discarded() {
    let backend = FakeBackend::with_pages(&["text"]);
    let token = CancellationToken::new();
    let client = Arc::new(
        FakeClient::replying(Ok("late verdict".to_string())).cancelling(token.clone()),
    );

    let outcome = run_job(
        &spec(AnalysisMode::Fast, "drawing.pdf"),
        &context(&backend, Arc::clone(&client)),
        &token,
        &TestSink::default(),
    )
    .await;

    assert_eq!(client.calls(), 1);
    assert_eq!(outcome, JobOutcome::Cancelled);
}

#[tokio::test]
async fn unreadable_document_fails_without_inference() {
    let backend = FakeBackend::with_pages(&["text"]);
    let client = Arc::new(FakeClient::replying(Ok("ok".to_string())));

    let outcome = run_job(
        &spec(AnalysisMode::Fast, "missing.pdf"),
        &context(&backend, Arc::clone(&client)),
        &CancellationToken::new(),
        &TestSink::default(),
    )
    .await;

    assert!(matches!(
        outcome,
        JobOutcome::Failed(AnalysisError::Extraction(_))
    ));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn service_errors_fail_the_job() {
    let backend = FakeBackend::with_pages(&["text"]);
    let client = Arc::new(FakeClient::replying(Err(InferenceError::ServiceError(500))));

    let outcome = run_job(
        &spec(AnalysisMode::Standard, "drawing.pdf"),
        &context(&backend, client),
        &CancellationToken::new(),
        &TestSink::default(),
    )
    .await;

    assert_eq!(
        outcome,
        JobOutcome::Failed(AnalysisError::Inference(InferenceError::ServiceError(500)))
    );
}

#[tokio::test]
async fn standard_timeout_completes_with_heuristic_report() {
    let backend = FakeBackend::with_pages(&["РАЗРАБ. масса"]);
    let client = Arc::new(FakeClient::replying(Err(InferenceError::Timeout { secs: 120 })));
    let sink = TestSink::default();

    let outcome = run_job(
        &spec(AnalysisMode::Standard, "drawing.pdf"),
        &context(&backend, client),
        &CancellationToken::new(),
        &sink,
    )
    .await;

    match outcome {
        JobOutcome::Completed(report) => {
            assert_eq!(report.source, ReportSource::Heuristic);
            assert!(report.text.contains("Основная надпись: ✓ ЕСТЬ"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(stages(&sink.take()).last(), Some(&Stage::Fallback));
}
