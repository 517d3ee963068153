//! `drawcheck.ron` settings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use drawcheck_core::{ModelSelection, DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL};
use drawcheck_engine::{EngineConfig, ExtractorSettings, InferenceSettings, Pdftoppm};
use engine_logging::{engine_info, engine_warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "drawcheck.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
    /// Suggestions listed by the `models` command.
    pub text_models: Vec<String>,
    pub vision_models: Vec<String>,
    pub max_pages: usize,
    pub image_dpi: u32,
    pub preview_dpi: u32,
    pub preview_size: (u32, u32),
    pub fast_timeout_secs: u64,
    pub standard_connect_timeout_secs: u64,
    pub standard_read_timeout_secs: u64,
    pub status_timeout_secs: u64,
    /// Zero disables the periodic service check.
    pub service_refresh_secs: u64,
    pub preview_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            text_models: ["llama2:3b", "tinyllama", "qwen:1.8b", "llama3:8b"]
                .map(String::from)
                .to_vec(),
            vision_models: ["llava:7b", "bakllava:7b", "llava:13b"]
                .map(String::from)
                .to_vec(),
            max_pages: 3,
            image_dpi: 150,
            preview_dpi: 72,
            preview_size: (400, 300),
            fast_timeout_secs: 60,
            standard_connect_timeout_secs: 30,
            standard_read_timeout_secs: 120,
            status_timeout_secs: 5,
            service_refresh_secs: 30,
            preview_path: None,
        }
    }
}

impl AppConfig {
    pub fn models(&self) -> ModelSelection {
        ModelSelection {
            text_model: self.text_model.clone(),
            vision_model: self.vision_model.clone(),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            extractor: ExtractorSettings {
                max_pages: self.max_pages,
                image_dpi: self.image_dpi,
                preview_dpi: self.preview_dpi,
                preview_size: self.preview_size,
            },
            rasterizer: Pdftoppm::default(),
            inference: InferenceSettings {
                base_url: self.base_url.clone(),
                fast_timeout: Duration::from_secs(self.fast_timeout_secs),
                standard_connect_timeout: Duration::from_secs(self.standard_connect_timeout_secs),
                standard_read_timeout: Duration::from_secs(self.standard_read_timeout_secs),
                status_timeout: Duration::from_secs(self.status_timeout_secs),
            },
        }
    }

    pub fn service_refresh(&self) -> Option<Duration> {
        (self.service_refresh_secs > 0).then(|| Duration::from_secs(self.service_refresh_secs))
    }
}

/// Loads an explicitly named file; any failure is an error.
pub fn load_from(path: &Path) -> anyhow::Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    let config = ron::from_str(&content)
        .with_context(|| format!("cannot parse config file {}", path.display()))?;
    engine_info!("Loaded configuration from {:?}", path);
    Ok(config)
}

/// Loads the default file from `dir`. A missing file means defaults; a broken
/// one is logged and ignored.
pub fn load_default(dir: &Path) -> AppConfig {
    let path = dir.join(DEFAULT_CONFIG_FILE);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return AppConfig::default(),
        Err(err) => {
            engine_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };
    match ron::from_str(&content) {
        Ok(config) => {
            engine_info!("Loaded configuration from {:?}", path);
            config
        }
        Err(err) => {
            engine_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}
