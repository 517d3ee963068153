//! Drawcheck engine: document extraction, inference calls and report export.
mod analysis;
mod client;
mod engine;
mod error;
mod export;
mod extract;
mod fallback;
mod job;
mod pdf;
mod persist;
mod progress;
mod prompt;
mod raster;
mod types;

pub use analysis::{analyze, FALLBACK_NOTICE};
pub use client::{check_service, InferenceClient, InferenceSettings, OllamaClient, TimeoutPolicy};
pub use engine::{EngineConfig, EngineEvents, EngineHandle};
pub use error::{AnalysisError, EngineError, ExportError, ExtractionError, InferenceError};
pub use export::{export_report, render_pdf, to_win_ansi};
pub use extract::{DocumentBackend, DocumentExtractor, ExtractorSettings, OpenDocument};
pub use fallback::{evaluate, heuristic_report, CategoryCheck};
pub use job::{run_job, JobContext};
pub use pdf::LopdfBackend;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use progress::{ChannelProgressSink, ProgressSink};
pub use prompt::{
    build_prompt, build_request, text_limit, truncate_for_prompt, AnalysisRequest,
    InferenceOptions, FAST_TEXT_LIMIT, STANDARD_TEXT_LIMIT, TRUNCATION_MARKER,
};
pub use raster::{Pdftoppm, RasterSettings};
pub use types::{
    AnalysisMode, AnalysisReport, EngineEvent, JobId, JobOutcome, JobProgress, JobSpec,
    ModelSelection, ReportSource, ServiceStatus, Stage,
};
