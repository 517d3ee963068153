//! Drawcheck core: pure job-coordinator state machine and view-model helpers.
mod effect;
mod job;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use job::{
    Alert, AlertLevel, AnalysisJob, AnalysisMode, ErrorKind, JobId, JobOutcome, JobStatus,
    ModelSelection, ServiceStatus, DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL,
};
pub use msg::Msg;
pub use state::AppState;
pub use update::update;
pub use view_model::{AppViewModel, ControlsView, JobView, Phase, ServiceView};
