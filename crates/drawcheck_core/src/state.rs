use std::path::{Path, PathBuf};

use crate::view_model::{AppViewModel, ControlsView, JobView, Phase, ServiceView};
use crate::{
    Alert, AnalysisJob, AnalysisMode, JobId, JobOutcome, JobStatus, ModelSelection, ServiceStatus,
};

const RESULT_RULE_WIDTH: usize = 60;

/// Coordinator state. Owned by the UI loop; only `update` mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    document: Option<PathBuf>,
    preview_bytes: Option<usize>,
    service: Option<ServiceStatus>,
    models: ModelSelection,
    next_job_id: JobId,
    job: Option<AnalysisJob>,
    result: Option<String>,
    transcript: Vec<String>,
    transcript_generation: u64,
    progress: Option<String>,
    status_line: String,
    alerts: Vec<Alert>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_models(ModelSelection::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_models(models: ModelSelection) -> Self {
        Self {
            document: None,
            preview_bytes: None,
            service: None,
            models,
            next_job_id: 1,
            job: None,
            result: None,
            transcript: Vec::new(),
            transcript_generation: 0,
            progress: None,
            status_line: "Checking inference service...".to_string(),
            alerts: Vec::new(),
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let phase = match self.active_job() {
            Some(job) if job.cancel_requested => Phase::Stopping,
            Some(_) => Phase::Running,
            None => Phase::Idle,
        };
        let busy = phase != Phase::Idle;

        AppViewModel {
            phase,
            status_line: self.status_line.clone(),
            progress: self.progress.clone(),
            document: self.document.clone(),
            preview_bytes: self.preview_bytes,
            service: match &self.service {
                Some(status) => ServiceView {
                    checked: true,
                    reachable: status.reachable,
                    models: status.models.clone(),
                },
                None => ServiceView::default(),
            },
            models: self.models.clone(),
            job: self.job.as_ref().map(|job| JobView {
                job_id: job.id,
                mode: job.mode,
                status: job.status,
            }),
            transcript: self.transcript.clone(),
            transcript_generation: self.transcript_generation,
            report: self.result.clone(),
            controls: ControlsView {
                can_load: !busy,
                can_start: !busy && self.document.is_some(),
                can_stop: phase == Phase::Running,
                can_export: !busy && self.result.is_some(),
            },
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Drains alerts raised since the last call.
    pub fn take_alerts(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.alerts)
    }

    pub fn active_job(&self) -> Option<&AnalysisJob> {
        self.job.as_ref().filter(|job| job.status.is_active())
    }

    pub fn last_job(&self) -> Option<&AnalysisJob> {
        self.job.as_ref()
    }

    pub fn document(&self) -> Option<&Path> {
        self.document.as_deref()
    }

    pub fn last_result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn models(&self) -> &ModelSelection {
        &self.models
    }

    pub fn service_reachable(&self) -> bool {
        self.service.as_ref().is_some_and(|status| status.reachable)
    }

    pub(crate) fn known_models(&self) -> &[String] {
        self.service
            .as_ref()
            .map(|status| status.models.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
        self.dirty = true;
    }

    pub(crate) fn set_status_line(&mut self, text: impl Into<String>) {
        self.status_line = text.into();
        self.dirty = true;
    }

    pub(crate) fn load_document(&mut self, path: PathBuf) {
        self.transcript.clear();
        self.transcript_generation += 1;
        self.transcript
            .push(format!("File loaded: {}", path.display()));
        self.result = None;
        self.preview_bytes = None;
        self.progress = None;
        self.document = Some(path);
        self.dirty = true;
    }

    pub(crate) fn set_preview(&mut self, byte_len: Option<usize>) {
        self.preview_bytes = byte_len;
        self.dirty = true;
    }

    pub(crate) fn set_service(&mut self, status: ServiceStatus) {
        self.service = Some(status);
        self.dirty = true;
    }

    pub(crate) fn models_mut(&mut self) -> &mut ModelSelection {
        self.dirty = true;
        &mut self.models
    }

    /// Registers a new pending job for the loaded document.
    pub(crate) fn begin_job(&mut self, mode: AnalysisMode, document: PathBuf) -> JobId {
        let job_id = self.next_job_id;
        self.next_job_id += 1;
        self.job = Some(AnalysisJob::new(job_id, mode, document));
        self.progress = None;
        self.transcript
            .push(format!("Starting {} analysis...", mode.label()));
        self.dirty = true;
        job_id
    }

    pub(crate) fn request_cancel(&mut self) -> Option<JobId> {
        let job = self.job.as_mut().filter(|job| job.status.is_active())?;
        if job.cancel_requested {
            return None;
        }
        job.cancel_requested = true;
        let job_id = job.id;
        self.dirty = true;
        Some(job_id)
    }

    /// Returns false when the message does not belong to the active job.
    pub(crate) fn apply_progress(&mut self, job_id: JobId, message: String) -> bool {
        let Some(job) = self.job.as_mut().filter(|job| job.status.is_active()) else {
            return false;
        };
        if job.id != job_id || job.cancel_requested {
            return false;
        }
        job.status = JobStatus::Running;
        self.transcript.push(message.clone());
        self.progress = Some(message);
        self.dirty = true;
        true
    }

    /// Records the final outcome of the active job and returns its terminal status.
    pub(crate) fn apply_outcome(&mut self, job_id: JobId, outcome: JobOutcome) -> Option<JobStatus> {
        let job = self
            .job
            .as_mut()
            .filter(|job| job.status.is_active() && job.id == job_id)?;

        let status = if job.cancel_requested {
            JobStatus::Cancelled
        } else {
            match &outcome {
                JobOutcome::Completed { .. } => JobStatus::Completed,
                JobOutcome::Failed { .. } => JobStatus::Failed,
                JobOutcome::Cancelled => JobStatus::Cancelled,
            }
        };
        job.status = status;
        self.progress = None;
        self.dirty = true;

        match (status, outcome) {
            (JobStatus::Completed, JobOutcome::Completed { report, .. }) => {
                let rule = "=".repeat(RESULT_RULE_WIDTH);
                self.transcript.push(rule.clone());
                self.transcript.push("ANALYSIS RESULTS:".to_string());
                self.transcript.push(rule);
                self.transcript.push(report.clone());
                self.result = Some(report);
            }
            (JobStatus::Failed, JobOutcome::Failed { kind, message }) => {
                self.transcript.push(format!("Error ({kind}): {message}"));
            }
            _ => {
                self.transcript
                    .push("Analysis stopped; any late result was discarded.".to_string());
            }
        }
        Some(status)
    }
}
