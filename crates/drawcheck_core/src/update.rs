use std::path::PathBuf;

use crate::{Alert, AnalysisMode, AppState, Effect, JobStatus, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DocumentSelected(path) => select_document(&mut state, path),
        Msg::PreviewRendered { document, result } => {
            // A preview for a document that was since replaced is stale.
            if state.document() == Some(document.as_path()) {
                match result {
                    Ok(byte_len) => state.set_preview(Some(byte_len)),
                    Err(message) => {
                        state.set_preview(None);
                        state.alert(Alert::warning(format!("Could not render preview: {message}")));
                    }
                }
            }
            Vec::new()
        }
        Msg::CheckServiceClicked => vec![Effect::CheckService { announce: true }],
        Msg::ServiceRefreshDue => vec![Effect::CheckService { announce: false }],
        Msg::ServiceChecked { status, announce } => {
            let reachable = status.reachable;
            state.set_service(status);
            if state.active_job().is_none() {
                state.set_status_line(if reachable {
                    "Service: connected"
                } else {
                    "Service: not running"
                });
            }
            if announce {
                state.alert(if reachable {
                    Alert::info("Inference service is reachable")
                } else {
                    Alert::error("Inference service is unavailable. Start the service.")
                });
            }
            Vec::new()
        }
        Msg::TextModelSelected(name) => {
            if let Some(name) = accept_model_name(&mut state, name) {
                state.models_mut().text_model = name;
            }
            Vec::new()
        }
        Msg::VisionModelSelected(name) => {
            if let Some(name) = accept_model_name(&mut state, name) {
                state.models_mut().vision_model = name;
            }
            Vec::new()
        }
        Msg::StartClicked(mode) => start_job(&mut state, mode),
        Msg::StopClicked => match state.request_cancel() {
            Some(job_id) => {
                state.set_status_line("Stopping analysis...");
                vec![Effect::CancelJob { job_id }]
            }
            None => Vec::new(),
        },
        Msg::ExportClicked(destination) => {
            if state.active_job().is_some() {
                state.alert(Alert::error("Wait for the running analysis to finish"));
                Vec::new()
            } else if let Some(report) = state.last_result() {
                let report = report.to_string();
                vec![Effect::ExportReport {
                    destination,
                    report,
                }]
            } else {
                state.alert(Alert::error("No results to export"));
                Vec::new()
            }
        }
        Msg::JobProgress { job_id, message } => {
            state.apply_progress(job_id, message);
            Vec::new()
        }
        Msg::JobFinished { job_id, outcome } => {
            let failure = match &outcome {
                crate::JobOutcome::Failed { kind, message } => Some(format!("{kind}: {message}")),
                _ => None,
            };
            let degraded = matches!(outcome, crate::JobOutcome::Completed { degraded: true, .. });
            match state.apply_outcome(job_id, outcome) {
                Some(JobStatus::Completed) if degraded => {
                    state.set_status_line("Analysis finished (simplified keyword check)")
                }
                Some(JobStatus::Completed) => state.set_status_line("Analysis finished"),
                Some(JobStatus::Cancelled) => state.set_status_line("Analysis stopped"),
                Some(_) => {
                    state.set_status_line("Analysis failed");
                    if let Some(text) = failure {
                        state.alert(Alert::error(format!("An error occurred: {text}")));
                    }
                }
                None => {}
            }
            Vec::new()
        }
        Msg::ExportFinished(result) => {
            match result {
                Ok(path) => state.alert(Alert::info(format!("Report saved: {}", path.display()))),
                Err(message) => state.alert(Alert::error(format!("Could not save report: {message}"))),
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn select_document(state: &mut AppState, path: PathBuf) -> Vec<Effect> {
    if state.active_job().is_some() {
        state.alert(Alert::error("Cannot load a new file while an analysis is running"));
        return Vec::new();
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    state.load_document(path.clone());
    state.set_status_line(format!("Loaded: {name}"));
    vec![Effect::RenderPreview { document: path }]
}

fn start_job(state: &mut AppState, mode: AnalysisMode) -> Vec<Effect> {
    if state.active_job().is_some() {
        state.alert(Alert::error("An analysis is already running"));
        return Vec::new();
    }
    let Some(document) = state.document().map(PathBuf::from) else {
        state.alert(Alert::error("Load a PDF file first"));
        return Vec::new();
    };
    if !state.service_reachable() {
        state.alert(Alert::error("Inference service is not running"));
        return Vec::new();
    }

    let models = state.models().clone();
    let job_id = state.begin_job(mode, document.clone());
    state.set_status_line("Analysis in progress...");
    vec![Effect::StartJob {
        job_id,
        mode,
        document,
        models,
    }]
}

fn accept_model_name(state: &mut AppState, name: String) -> Option<String> {
    let name = name.trim().to_string();
    if name.is_empty() {
        state.alert(Alert::error("Model name must not be empty"));
        return None;
    }
    let known = state.known_models();
    if !known.is_empty() && !known.iter().any(|model| *model == name) {
        state.alert(Alert::warning(format!(
            "Model {name} is not installed on the inference service"
        )));
    }
    state.mark_dirty();
    Some(name)
}
