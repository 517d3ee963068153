use std::path::PathBuf;

use crate::{AnalysisError, ExportError, ExtractionError};

pub type JobId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    Fast,
    Standard,
}

impl AnalysisMode {
    /// Standard analysis sends rasterized pages to a vision model.
    pub fn requires_graphics(self) -> bool {
        matches!(self, AnalysisMode::Standard)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub text_model: String,
    pub vision_model: String,
}

/// Everything a worker needs to run one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub job_id: JobId,
    pub mode: AnalysisMode,
    pub document: PathBuf,
    pub models: ModelSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ExtractingText,
    ExtractingImages,
    Analyzing,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProgress {
    pub job_id: JobId,
    pub stage: Stage,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSource {
    Model,
    /// Keyword checklist produced after the model timed out.
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub text: String,
    pub source: ReportSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed(AnalysisReport),
    Failed(AnalysisError),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceStatus {
    pub reachable: bool,
    pub models: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(JobProgress),
    /// Always the last event emitted for a job.
    JobFinished {
        job_id: JobId,
        outcome: JobOutcome,
    },
    ServiceChecked {
        status: ServiceStatus,
        announce: bool,
    },
    PreviewRendered {
        document: PathBuf,
        result: Result<Vec<u8>, ExtractionError>,
    },
    ExportFinished(Result<PathBuf, ExportError>),
}
