use std::fmt;
use std::path::PathBuf;

pub type JobId = u64;

/// Default text-only model.
pub const DEFAULT_TEXT_MODEL: &str = "llama2:3b";
/// Default vision-capable model.
pub const DEFAULT_VISION_MODEL: &str = "llava:7b";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Short verdict, text only, low latency.
    Fast,
    /// Six-section report, page images included.
    Standard,
}

impl AnalysisMode {
    pub fn label(self) -> &'static str {
        match self {
            AnalysisMode::Fast => "fast",
            AnalysisMode::Standard => "standard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Cancelled,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_active(self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Running)
    }
}

/// One analysis run, active or finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisJob {
    pub id: JobId,
    pub mode: AnalysisMode,
    pub document: PathBuf,
    pub status: JobStatus,
    pub cancel_requested: bool,
}

impl AnalysisJob {
    pub(crate) fn new(id: JobId, mode: AnalysisMode, document: PathBuf) -> Self {
        Self {
            id,
            mode,
            document,
            status: JobStatus::Pending,
            cancel_requested: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Extraction,
    ServiceUnreachable,
    ServiceError(u16),
    Timeout,
    InvalidResponse,
    Busy,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Extraction => write!(f, "extraction error"),
            ErrorKind::ServiceUnreachable => write!(f, "service unreachable"),
            ErrorKind::ServiceError(code) => write!(f, "service error {code}"),
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::InvalidResponse => write!(f, "invalid service response"),
            ErrorKind::Busy => write!(f, "another analysis is running"),
        }
    }
}

/// Final message of a job, as delivered to the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed {
        report: String,
        /// The report came from the keyword fallback rather than the model.
        degraded: bool,
    },
    Failed {
        kind: ErrorKind,
        message: String,
    },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceStatus {
    pub reachable: bool,
    pub models: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub text_model: String,
    pub vision_model: String,
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self {
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Warning,
    Error,
}

/// A message the front-end must show to the user once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub text: String,
}

impl Alert {
    pub(crate) fn info(text: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Info,
            text: text.into(),
        }
    }

    pub(crate) fn warning(text: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Warning,
            text: text.into(),
        }
    }

    pub(crate) fn error(text: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Error,
            text: text.into(),
        }
    }
}
