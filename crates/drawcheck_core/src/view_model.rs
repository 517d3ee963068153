use std::path::PathBuf;

use crate::{AnalysisMode, JobId, JobStatus, ModelSelection};

/// How many installed models the summary line lists before eliding.
const MODEL_SUMMARY_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Stopping,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceView {
    pub checked: bool,
    pub reachable: bool,
    pub models: Vec<String>,
}

impl ServiceView {
    pub fn summary(&self) -> String {
        if !self.checked {
            return "Service not checked yet".to_string();
        }
        if !self.reachable {
            return "Service unavailable".to_string();
        }
        if self.models.is_empty() {
            return "No models installed".to_string();
        }
        let shown: Vec<&str> = self
            .models
            .iter()
            .take(MODEL_SUMMARY_LIMIT)
            .map(String::as_str)
            .collect();
        if self.models.len() > MODEL_SUMMARY_LIMIT {
            format!("Models: {}...", shown.join(", "))
        } else {
            format!("Models: {}", shown.join(", "))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlsView {
    pub can_load: bool,
    pub can_start: bool,
    pub can_stop: bool,
    pub can_export: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobView {
    pub job_id: JobId,
    pub mode: AnalysisMode,
    pub status: JobStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub phase: Phase,
    pub status_line: String,
    pub progress: Option<String>,
    pub document: Option<PathBuf>,
    pub preview_bytes: Option<usize>,
    pub service: ServiceView,
    pub models: ModelSelection,
    pub job: Option<JobView>,
    /// Everything the result pane shows, oldest first.
    pub transcript: Vec<String>,
    /// Bumped whenever the transcript is cleared.
    pub transcript_generation: u64,
    /// Report of the last completed job for the current document.
    pub report: Option<String>,
    pub controls: ControlsView,
    pub dirty: bool,
}
