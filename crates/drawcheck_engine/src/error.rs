use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("cannot open {path}: {message}")]
    Open { path: String, message: String },
    #[error("page {page}: {message}")]
    Page { page: usize, message: String },
    #[error("rasterization failed: {0}")]
    Render(String),
    #[error("pdftoppm not found; install poppler-utils to render pages")]
    RasterizerMissing,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InferenceError {
    #[error("inference service unreachable: {0}")]
    ServiceUnreachable(String),
    #[error("inference service returned status {0}")]
    ServiceError(u16),
    #[error("the model did not answer within {secs} seconds")]
    Timeout { secs: u64 },
    #[error("unexpected reply from inference service: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error("another analysis is already running")]
    Busy,
    #[error("worker task failed: {0}")]
    Worker(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("no completed analysis to export")]
    NoResult,
    #[error("cannot write {path}: {message}")]
    Write { path: String, message: String },
    #[error("cannot render report: {0}")]
    Render(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Client(#[from] InferenceError),
}
