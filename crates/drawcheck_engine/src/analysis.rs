use engine_logging::job_warn;

use crate::client::{InferenceClient, TimeoutPolicy};
use crate::fallback::heuristic_report;
use crate::progress::{report, ProgressSink};
use crate::prompt::AnalysisRequest;
use crate::{AnalysisMode, AnalysisReport, InferenceError, JobId, ReportSource, Stage};

pub const FALLBACK_NOTICE: &str = "Model timed out; using simplified keyword analysis...";

/// Runs one inference call. A standard-mode timeout degrades to the keyword
/// checklist over the full extracted `text`; every other error is returned.
pub async fn analyze(
    client: &dyn InferenceClient,
    request: &AnalysisRequest,
    mode: AnalysisMode,
    timeout: TimeoutPolicy,
    text: &str,
    job_id: JobId,
    sink: &dyn ProgressSink,
) -> Result<AnalysisReport, InferenceError> {
    match client.generate(request, timeout).await {
        Ok(reply) => Ok(AnalysisReport {
            text: reply,
            source: ReportSource::Model,
        }),
        Err(InferenceError::Timeout { secs }) if mode == AnalysisMode::Standard => {
            job_warn!(job_id, "model timed out after {}s, using fallback", secs);
            report(sink, job_id, Stage::Fallback, FALLBACK_NOTICE);
            Ok(AnalysisReport {
                text: heuristic_report(text),
                source: ReportSource::Heuristic,
            })
        }
        Err(err) => Err(err),
    }
}
