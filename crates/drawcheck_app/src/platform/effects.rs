use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use drawcheck_core::{AnalysisMode, Effect, ErrorKind, JobOutcome, ModelSelection, Msg, ServiceStatus};
use drawcheck_engine::{
    AnalysisError, AtomicFileWriter, EngineConfig, EngineError, EngineEvent, EngineEvents,
    EngineHandle, InferenceError, JobSpec, ReportSource,
};
use engine_logging::{engine_info, engine_warn};

use crate::app::UiEvent;

/// Executes core effects on the engine and feeds engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        config: EngineConfig,
        preview_path: Option<PathBuf>,
        ui_tx: mpsc::Sender<UiEvent>,
    ) -> Result<Self, EngineError> {
        let (engine, events) = EngineHandle::new(config)?;
        Ok(Self::with_engine(engine, events, preview_path, ui_tx))
    }

    pub fn with_engine(
        engine: EngineHandle,
        events: EngineEvents,
        preview_path: Option<PathBuf>,
        ui_tx: mpsc::Sender<UiEvent>,
    ) -> Self {
        spawn_event_loop(events, preview_path, ui_tx);
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RenderPreview { document } => self.engine.render_preview(document),
                Effect::CheckService { announce } => self.engine.check_service(announce),
                Effect::StartJob {
                    job_id,
                    mode,
                    document,
                    models,
                } => {
                    engine_info!("StartJob job_id={} mode={} document={:?}", job_id, mode.label(), document);
                    self.engine.start_job(JobSpec {
                        job_id,
                        mode: map_mode(mode),
                        document,
                        models: map_models(models),
                    });
                }
                Effect::CancelJob { job_id } => self.engine.cancel_job(job_id),
                Effect::ExportReport {
                    destination,
                    report,
                } => self.engine.export(Some(report), destination),
            }
        }
    }
}

fn spawn_event_loop(
    events: EngineEvents,
    preview_path: Option<PathBuf>,
    ui_tx: mpsc::Sender<UiEvent>,
) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if let (Some(path), EngineEvent::PreviewRendered { result: Ok(png), .. }) =
                (&preview_path, &event)
            {
                save_preview(path, png);
            }
            if ui_tx.send(UiEvent::Msg(to_msg(event))).is_err() {
                break;
            }
        }
    });
}

fn save_preview(path: &Path, png: &[u8]) {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        engine_warn!("Preview path {:?} has no file name", path);
        return;
    };
    match AtomicFileWriter::for_target(path).write(name, png) {
        Ok(written) => engine_info!("Preview saved to {:?}", written),
        Err(err) => engine_warn!("Failed to save preview to {:?}: {}", path, err),
    }
}

pub(crate) fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(progress) => Msg::JobProgress {
            job_id: progress.job_id,
            message: progress.message,
        },
        EngineEvent::JobFinished { job_id, outcome } => Msg::JobFinished {
            job_id,
            outcome: map_outcome(outcome),
        },
        EngineEvent::ServiceChecked { status, announce } => Msg::ServiceChecked {
            status: ServiceStatus {
                reachable: status.reachable,
                models: status.models,
            },
            announce,
        },
        EngineEvent::PreviewRendered { document, result } => Msg::PreviewRendered {
            document,
            result: result.map(|png| png.len()).map_err(|err| err.to_string()),
        },
        EngineEvent::ExportFinished(result) => {
            Msg::ExportFinished(result.map_err(|err| err.to_string()))
        }
    }
}

fn map_outcome(outcome: drawcheck_engine::JobOutcome) -> JobOutcome {
    match outcome {
        drawcheck_engine::JobOutcome::Completed(report) => JobOutcome::Completed {
            degraded: report.source == ReportSource::Heuristic,
            report: report.text,
        },
        drawcheck_engine::JobOutcome::Failed(err) => JobOutcome::Failed {
            kind: error_kind(&err),
            message: err.to_string(),
        },
        drawcheck_engine::JobOutcome::Cancelled => JobOutcome::Cancelled,
    }
}

fn error_kind(err: &AnalysisError) -> ErrorKind {
    match err {
        // Worker failures only happen around blocking extraction steps.
        AnalysisError::Extraction(_) | AnalysisError::Worker(_) => ErrorKind::Extraction,
        AnalysisError::Inference(InferenceError::ServiceUnreachable(_)) => {
            ErrorKind::ServiceUnreachable
        }
        AnalysisError::Inference(InferenceError::ServiceError(code)) => {
            ErrorKind::ServiceError(*code)
        }
        AnalysisError::Inference(InferenceError::Timeout { .. }) => ErrorKind::Timeout,
        AnalysisError::Inference(InferenceError::InvalidResponse(_)) => ErrorKind::InvalidResponse,
        AnalysisError::Busy => ErrorKind::Busy,
    }
}

fn map_mode(mode: AnalysisMode) -> drawcheck_engine::AnalysisMode {
    match mode {
        AnalysisMode::Fast => drawcheck_engine::AnalysisMode::Fast,
        AnalysisMode::Standard => drawcheck_engine::AnalysisMode::Standard,
    }
}

fn map_models(models: ModelSelection) -> drawcheck_engine::ModelSelection {
    drawcheck_engine::ModelSelection {
        text_model: models.text_model,
        vision_model: models.vision_model,
    }
}
