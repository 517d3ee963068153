use std::path::PathBuf;

use crate::{AnalysisMode, JobId, ModelSelection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RenderPreview {
        document: PathBuf,
    },
    CheckService {
        /// Report the outcome to the user, not only in the status line.
        announce: bool,
    },
    StartJob {
        job_id: JobId,
        mode: AnalysisMode,
        document: PathBuf,
        models: ModelSelection,
    },
    CancelJob {
        job_id: JobId,
    },
    ExportReport {
        destination: PathBuf,
        report: String,
    },
}
