use std::path::Path;
use std::sync::Arc;

use engine_logging::{job_error, job_info};
use tokio_util::sync::CancellationToken;

use crate::analysis::analyze;
use crate::client::{InferenceClient, InferenceSettings};
use crate::extract::DocumentExtractor;
use crate::progress::{report, ProgressSink};
use crate::prompt::build_request;
use crate::{AnalysisError, AnalysisReport, ExtractionError, JobOutcome, JobSpec, Stage};

/// Shared services a worker runs against.
#[derive(Clone)]
pub struct JobContext {
    pub extractor: Arc<DocumentExtractor>,
    pub client: Arc<dyn InferenceClient>,
    pub inference: InferenceSettings,
}

/// Runs extraction, request building and inference for one job. The token is
/// checked before each step and once more after inference; a dispatched
/// request is never aborted, its reply is dropped instead.
pub async fn run_job(
    spec: &JobSpec,
    ctx: &JobContext,
    cancel: &CancellationToken,
    sink: &dyn ProgressSink,
) -> JobOutcome {
    match execute(spec, ctx, cancel, sink).await {
        Ok(Some(report)) => {
            job_info!(spec.job_id, "completed ({:?})", report.source);
            JobOutcome::Completed(report)
        }
        Ok(None) => {
            job_info!(spec.job_id, "cancelled");
            JobOutcome::Cancelled
        }
        Err(err) => {
            job_error!(spec.job_id, "failed: {}", err);
            JobOutcome::Failed(err)
        }
    }
}

async fn execute(
    spec: &JobSpec,
    ctx: &JobContext,
    cancel: &CancellationToken,
    sink: &dyn ProgressSink,
) -> Result<Option<AnalysisReport>, AnalysisError> {
    let max_pages = ctx.extractor.settings().max_pages;

    if cancel.is_cancelled() {
        return Ok(None);
    }
    report(sink, spec.job_id, Stage::ExtractingText, "Extracting text...");
    let text = blocking(&ctx.extractor, &spec.document, move |extractor, path| {
        extractor.extract_text(path, max_pages)
    })
    .await?;
    report(
        sink,
        spec.job_id,
        Stage::ExtractingText,
        format!("Text extracted: {} characters", text.chars().count()),
    );

    let mut images = None;
    if spec.mode.requires_graphics() {
        if cancel.is_cancelled() {
            return Ok(None);
        }
        report(sink, spec.job_id, Stage::ExtractingImages, "Extracting graphics...");
        let pages = blocking(&ctx.extractor, &spec.document, move |extractor, path| {
            extractor.extract_images(path, max_pages)
        })
        .await?;
        report(
            sink,
            spec.job_id,
            Stage::ExtractingImages,
            format!("Extracted {} images", pages.len()),
        );
        images = Some(pages);
    }

    if cancel.is_cancelled() {
        return Ok(None);
    }
    let request = build_request(spec.mode, &text, images, &spec.models);
    report(
        sink,
        spec.job_id,
        Stage::Analyzing,
        format!("Analyzing with {}...", request.model),
    );
    let timeout = ctx.inference.timeout_for(spec.mode);
    let result = analyze(
        ctx.client.as_ref(),
        &request,
        spec.mode,
        timeout,
        &text,
        spec.job_id,
        sink,
    )
    .await;

    if cancel.is_cancelled() {
        return Ok(None);
    }
    Ok(Some(result?))
}

async fn blocking<T, F>(
    extractor: &Arc<DocumentExtractor>,
    path: &Path,
    work: F,
) -> Result<T, AnalysisError>
where
    T: Send + 'static,
    F: FnOnce(&DocumentExtractor, &Path) -> Result<T, ExtractionError> + Send + 'static,
{
    let extractor = Arc::clone(extractor);
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || work(&extractor, &path))
        .await
        .map_err(|err| AnalysisError::Worker(err.to_string()))?
        .map_err(AnalysisError::from)
}
