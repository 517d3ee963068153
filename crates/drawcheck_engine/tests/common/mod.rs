#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use drawcheck_engine::{
    AnalysisRequest, DocumentBackend, EngineEvent, ExtractionError, InferenceClient,
    InferenceError, OpenDocument, ProgressSink, RasterSettings, TimeoutPolicy,
};
use tokio_util::sync::CancellationToken;

/// In-memory document source. Counts opened and dropped handles.
#[derive(Clone, Default)]
pub struct FakeBackend {
    pages: Vec<Result<String, ExtractionError>>,
    pub opened: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
}

impl FakeBackend {
    pub fn with_pages(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|page| Ok(page.to_string())).collect(),
            ..Self::default()
        }
    }

    pub fn with_results(pages: Vec<Result<String, ExtractionError>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn open_handles(&self) -> usize {
        self.opened.load(Ordering::SeqCst) - self.closed.load(Ordering::SeqCst)
    }
}

impl DocumentBackend for FakeBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn OpenDocument>, ExtractionError> {
        if path.to_string_lossy().contains("missing") {
            return Err(ExtractionError::Open {
                path: path.display().to_string(),
                message: "not found".to_string(),
            });
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeDocument {
            pages: self.pages.clone(),
            closed: Arc::clone(&self.closed),
        }))
    }
}

struct FakeDocument {
    pages: Vec<Result<String, ExtractionError>>,
    closed: Arc<AtomicUsize>,
}

impl OpenDocument for FakeDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&mut self, index: usize) -> Result<String, ExtractionError> {
        self.pages[index].clone()
    }

    fn render_page(
        &mut self,
        index: usize,
        settings: &RasterSettings,
    ) -> Result<Vec<u8>, ExtractionError> {
        Ok(format!("png-{index}-{}", settings.dpi).into_bytes())
    }
}

impl Drop for FakeDocument {
    fn drop(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Scripted inference service that records every request it receives.
pub struct FakeClient {
    reply: Result<String, InferenceError>,
    models: Vec<String>,
    delay: Duration,
    cancel_during_call: Option<CancellationToken>,
    panic_once: AtomicBool,
    pub requests: Mutex<Vec<AnalysisRequest>>,
}

impl FakeClient {
    pub fn replying(reply: Result<String, InferenceError>) -> Self {
        Self {
            reply,
            models: vec!["llama2:3b".to_string(), "llava:7b".to_string()],
            delay: Duration::ZERO,
            cancel_during_call: None,
            panic_once: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Simulates a stop request arriving while the call is in flight.
    pub fn cancelling(mut self, token: CancellationToken) -> Self {
        self.cancel_during_call = Some(token);
        self
    }

    /// Crashes inside the first call, then answers normally.
    pub fn panicking_once(self) -> Self {
        self.panic_once.store(true, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl InferenceClient for FakeClient {
    async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        Ok(self.models.clone())
    }

    async fn generate(
        &self,
        request: &AnalysisRequest,
        _timeout: TimeoutPolicy,
    ) -> Result<String, InferenceError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.panic_once.swap(false, Ordering::SeqCst) {
            panic!("inference backend crashed");
        }
        if let Some(token) = &self.cancel_during_call {
            token.cancel();
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone()
    }
}

#[derive(Default)]
pub struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}
