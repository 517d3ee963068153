use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn, job_error, job_info};
use tokio_util::sync::CancellationToken;

use crate::client::{check_service, InferenceSettings, OllamaClient};
use crate::export::export_report;
use crate::extract::{DocumentExtractor, ExtractorSettings};
use crate::job::{run_job, JobContext};
use crate::progress::ChannelProgressSink;
use crate::raster::Pdftoppm;
use crate::{AnalysisError, EngineError, EngineEvent, JobId, JobOutcome, JobSpec};

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub extractor: ExtractorSettings,
    pub rasterizer: Pdftoppm,
    pub inference: InferenceSettings,
}

enum EngineCommand {
    StartJob(JobSpec),
    CancelJob(JobId),
    CheckService { announce: bool },
    RenderPreview(PathBuf),
    Export { report: Option<String>, destination: PathBuf },
}

/// The one job the engine may run at a time, with its cancellation token.
#[derive(Clone, Default)]
struct JobSlot {
    inner: Arc<Mutex<Option<(JobId, CancellationToken)>>>,
}

impl JobSlot {
    fn lock(&self) -> MutexGuard<'_, Option<(JobId, CancellationToken)>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn try_claim(&self, job_id: JobId) -> Option<CancellationToken> {
        let mut slot = self.lock();
        if slot.is_some() {
            return None;
        }
        let token = CancellationToken::new();
        *slot = Some((job_id, token.clone()));
        Some(token)
    }

    fn release(&self, job_id: JobId) {
        let mut slot = self.lock();
        if matches!(slot.as_ref(), Some((current, _)) if *current == job_id) {
            *slot = None;
        }
    }

    fn cancel(&self, job_id: JobId) -> bool {
        match self.lock().as_ref() {
            Some((current, token)) if *current == job_id => {
                token.cancel();
                true
            }
            _ => false,
        }
    }
}

/// Command side of the engine. Dropping it stops the engine thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Event side of the engine, in the order workers produced them.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineEvents {
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl EngineHandle {
    /// Engine backed by lopdf, pdftoppm and an Ollama client.
    pub fn new(config: EngineConfig) -> Result<(Self, EngineEvents), EngineError> {
        let client = OllamaClient::new(&config.inference)?;
        let context = JobContext {
            extractor: Arc::new(DocumentExtractor::lopdf(config.extractor, config.rasterizer)),
            client: Arc::new(client),
            inference: config.inference,
        };
        Self::with_context(context)
    }

    pub fn with_context(context: JobContext) -> Result<(Self, EngineEvents), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            let slot = JobSlot::default();
            while let Ok(command) = cmd_rx.recv() {
                handle_command(&runtime, &context, &slot, command, &event_tx);
            }
            engine_info!("Engine command channel closed, shutting down");
            runtime.shutdown_background();
        });

        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    pub fn start_job(&self, spec: JobSpec) {
        self.send(EngineCommand::StartJob(spec));
    }

    pub fn cancel_job(&self, job_id: JobId) {
        self.send(EngineCommand::CancelJob(job_id));
    }

    pub fn check_service(&self, announce: bool) {
        self.send(EngineCommand::CheckService { announce });
    }

    pub fn render_preview(&self, document: PathBuf) {
        self.send(EngineCommand::RenderPreview(document));
    }

    pub fn export(&self, report: Option<String>, destination: PathBuf) {
        self.send(EngineCommand::Export {
            report,
            destination,
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_warn!("Engine thread is gone; command dropped");
        }
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    context: &JobContext,
    slot: &JobSlot,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    let event_tx = event_tx.clone();
    match command {
        EngineCommand::StartJob(spec) => {
            let Some(token) = slot.try_claim(spec.job_id) else {
                engine_warn!("Rejecting job {}: another job is running", spec.job_id);
                let _ = event_tx.send(EngineEvent::JobFinished {
                    job_id: spec.job_id,
                    outcome: JobOutcome::Failed(AnalysisError::Busy),
                });
                return;
            };
            let context = context.clone();
            let slot = slot.clone();
            runtime.spawn(async move {
                job_info!(spec.job_id, "started {:?} on {:?}", spec.mode, spec.document);
                let sink = ChannelProgressSink::new(event_tx.clone());
                let worker = tokio::spawn({
                    let spec = spec.clone();
                    async move { run_job(&spec, &context, &token, &sink).await }
                });
                let outcome = match worker.await {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        job_error!(spec.job_id, "worker aborted: {}", err);
                        JobOutcome::Failed(AnalysisError::Worker(err.to_string()))
                    }
                };
                // Free the slot first so the next start is never refused.
                slot.release(spec.job_id);
                let _ = event_tx.send(EngineEvent::JobFinished {
                    job_id: spec.job_id,
                    outcome,
                });
            });
        }
        EngineCommand::CancelJob(job_id) => {
            if slot.cancel(job_id) {
                job_info!(job_id, "cancellation requested");
            }
        }
        EngineCommand::CheckService { announce } => {
            let client = Arc::clone(&context.client);
            runtime.spawn(async move {
                let status = check_service(client.as_ref()).await;
                let _ = event_tx.send(EngineEvent::ServiceChecked { status, announce });
            });
        }
        EngineCommand::RenderPreview(document) => {
            let extractor = Arc::clone(&context.extractor);
            runtime.spawn_blocking(move || {
                let result = extractor.render_preview(&document);
                let _ = event_tx.send(EngineEvent::PreviewRendered { document, result });
            });
        }
        EngineCommand::Export {
            report,
            destination,
        } => {
            runtime.spawn_blocking(move || {
                let result = export_report(report.as_deref(), &destination);
                let _ = event_tx.send(EngineEvent::ExportFinished(result));
            });
        }
    }
}
