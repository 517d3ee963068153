use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a PDF file to analyze.
    DocumentSelected(PathBuf),
    /// Engine finished rendering the first-page preview.
    PreviewRendered {
        document: PathBuf,
        result: Result<usize, String>,
    },
    /// User asked to check the inference service.
    CheckServiceClicked,
    /// Periodic service refresh timer fired.
    ServiceRefreshDue,
    /// Engine finished a service check.
    ServiceChecked {
        status: crate::ServiceStatus,
        announce: bool,
    },
    /// User picked the text-only model.
    TextModelSelected(String),
    /// User picked the vision model.
    VisionModelSelected(String),
    /// User clicked one of the analysis buttons.
    StartClicked(crate::AnalysisMode),
    /// User clicked Stop.
    StopClicked,
    /// User asked to save the last report.
    ExportClicked(PathBuf),
    /// Engine progress for a job.
    JobProgress {
        job_id: crate::JobId,
        message: String,
    },
    /// Engine final message for a job.
    JobFinished {
        job_id: crate::JobId,
        outcome: crate::JobOutcome,
    },
    /// Engine finished writing a report.
    ExportFinished(Result<PathBuf, String>),
}
