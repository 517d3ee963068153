use std::time::Duration;

use engine_logging::{engine_debug, engine_warn};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::prompt::{AnalysisRequest, InferenceOptions};
use crate::{AnalysisMode, InferenceError, ServiceStatus};

const MISSING_RESPONSE: &str = "Нет ответа от модели";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceSettings {
    pub base_url: String,
    pub fast_timeout: Duration,
    pub standard_connect_timeout: Duration,
    pub standard_read_timeout: Duration,
    pub status_timeout: Duration,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            fast_timeout: Duration::from_secs(60),
            standard_connect_timeout: Duration::from_secs(30),
            standard_read_timeout: Duration::from_secs(120),
            status_timeout: Duration::from_secs(5),
        }
    }
}

impl InferenceSettings {
    pub fn timeout_for(&self, mode: AnalysisMode) -> TimeoutPolicy {
        match mode {
            AnalysisMode::Fast => TimeoutPolicy::Total(self.fast_timeout),
            AnalysisMode::Standard => TimeoutPolicy::Split {
                connect: self.standard_connect_timeout,
                read: self.standard_read_timeout,
            },
        }
    }
}

/// How long one generate call may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutPolicy {
    Total(Duration),
    Split { connect: Duration, read: Duration },
}

impl TimeoutPolicy {
    fn reported_secs(self) -> u64 {
        match self {
            TimeoutPolicy::Total(total) => total.as_secs(),
            TimeoutPolicy::Split { read, .. } => read.as_secs(),
        }
    }
}

#[async_trait::async_trait]
pub trait InferenceClient: Send + Sync {
    async fn list_models(&self) -> Result<Vec<String>, InferenceError>;

    async fn generate(
        &self,
        request: &AnalysisRequest,
        timeout: TimeoutPolicy,
    ) -> Result<String, InferenceError>;
}

/// Reachability plus installed models; any failure counts as unreachable.
pub async fn check_service(client: &dyn InferenceClient) -> ServiceStatus {
    match client.list_models().await {
        Ok(models) => ServiceStatus {
            reachable: true,
            models,
        },
        Err(err) => {
            engine_warn!("Service check failed: {}", err);
            ServiceStatus::default()
        }
    }
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<&'a [String]>,
    options: &'a InferenceOptions,
}

#[derive(Deserialize)]
struct GenerateReply {
    response: Option<String>,
}

#[derive(Deserialize)]
struct TagsReply {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

/// Client for an Ollama-compatible HTTP service.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: Url,
    status_timeout: Duration,
}

impl OllamaClient {
    pub fn new(settings: &InferenceSettings) -> Result<Self, InferenceError> {
        let mut raw = settings.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw).map_err(|err| {
            InferenceError::ServiceUnreachable(format!("invalid base url {raw}: {err}"))
        })?;
        Ok(Self {
            base_url,
            status_timeout: settings.status_timeout,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, InferenceError> {
        self.base_url
            .join(path)
            .map_err(|err| InferenceError::ServiceUnreachable(err.to_string()))
    }

    fn build_client(&self, policy: TimeoutPolicy) -> Result<reqwest::Client, InferenceError> {
        let builder = match policy {
            TimeoutPolicy::Total(total) => reqwest::Client::builder().timeout(total),
            TimeoutPolicy::Split { connect, read } => reqwest::Client::builder()
                .connect_timeout(connect)
                .read_timeout(read)
                .timeout(connect + read),
        };
        builder
            .build()
            .map_err(|err| InferenceError::ServiceUnreachable(err.to_string()))
    }
}

#[async_trait::async_trait]
impl InferenceClient for OllamaClient {
    async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        let policy = TimeoutPolicy::Total(self.status_timeout);
        let client = self.build_client(policy)?;
        let response = client
            .get(self.endpoint("api/tags")?)
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, policy))?;
        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::ServiceError(status.as_u16()));
        }
        let tags: TagsReply = response
            .json()
            .await
            .map_err(|err| map_reqwest_error(err, policy))?;
        Ok(tags.models.into_iter().map(|tag| tag.name).collect())
    }

    async fn generate(
        &self,
        request: &AnalysisRequest,
        timeout: TimeoutPolicy,
    ) -> Result<String, InferenceError> {
        let client = self.build_client(timeout)?;
        let body = GenerateBody {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            images: request.images.as_deref(),
            options: &request.options,
        };
        engine_debug!(
            "POST api/generate model={} images={}",
            request.model,
            request.images.as_ref().map_or(0, Vec::len)
        );
        let response = client
            .post(self.endpoint("api/generate")?)
            .json(&body)
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, timeout))?;
        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::ServiceError(status.as_u16()));
        }
        let reply: GenerateReply = response
            .json()
            .await
            .map_err(|err| map_reqwest_error(err, timeout))?;
        Ok(reply
            .response
            .unwrap_or_else(|| MISSING_RESPONSE.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error, policy: TimeoutPolicy) -> InferenceError {
    if err.is_timeout() {
        return InferenceError::Timeout {
            secs: policy.reported_secs(),
        };
    }
    if err.is_decode() {
        return InferenceError::InvalidResponse(err.to_string());
    }
    InferenceError::ServiceUnreachable(err.to_string())
}
