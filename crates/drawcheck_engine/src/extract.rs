use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use engine_logging::engine_debug;

use crate::pdf::LopdfBackend;
use crate::raster::{Pdftoppm, RasterSettings};
use crate::ExtractionError;

/// Opens documents for page-by-page access.
pub trait DocumentBackend: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn OpenDocument>, ExtractionError>;
}

/// An open document handle. Dropping it releases the underlying file.
pub trait OpenDocument {
    fn page_count(&self) -> usize;
    fn page_text(&mut self, index: usize) -> Result<String, ExtractionError>;
    /// Renders one page to PNG bytes.
    fn render_page(&mut self, index: usize, settings: &RasterSettings)
        -> Result<Vec<u8>, ExtractionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorSettings {
    pub max_pages: usize,
    /// Resolution of page images sent to the model.
    pub image_dpi: u32,
    pub preview_dpi: u32,
    pub preview_size: (u32, u32),
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            max_pages: 3,
            image_dpi: 150,
            preview_dpi: 72,
            preview_size: (400, 300),
        }
    }
}

/// Pulls text and page rasters out of a document, at most `max_pages` pages.
#[derive(Clone)]
pub struct DocumentExtractor {
    backend: Arc<dyn DocumentBackend>,
    settings: ExtractorSettings,
}

impl DocumentExtractor {
    pub fn new(backend: Arc<dyn DocumentBackend>, settings: ExtractorSettings) -> Self {
        Self { backend, settings }
    }

    /// Extractor backed by lopdf for text and pdftoppm for rasters.
    pub fn lopdf(settings: ExtractorSettings, rasterizer: Pdftoppm) -> Self {
        Self::new(Arc::new(LopdfBackend::new(rasterizer)), settings)
    }

    pub fn settings(&self) -> &ExtractorSettings {
        &self.settings
    }

    pub fn extract_text(&self, path: &Path, max_pages: usize) -> Result<String, ExtractionError> {
        let mut document = self.backend.open(path)?;
        let pages = document.page_count().min(max_pages);
        let mut text = String::new();
        for index in 0..pages {
            text.push_str(&document.page_text(index)?);
        }
        engine_debug!(
            "Extracted {} chars from {} page(s) of {:?}",
            text.chars().count(),
            pages,
            path
        );
        Ok(text)
    }

    /// Rasterizes pages at the model resolution, base64-encoded for transport.
    pub fn extract_images(
        &self,
        path: &Path,
        max_pages: usize,
    ) -> Result<Vec<String>, ExtractionError> {
        let settings = RasterSettings {
            dpi: self.settings.image_dpi,
            scale_to: None,
        };
        let mut document = self.backend.open(path)?;
        let pages = document.page_count().min(max_pages);
        let mut images = Vec::with_capacity(pages);
        for index in 0..pages {
            let png = document.render_page(index, &settings)?;
            images.push(STANDARD.encode(png));
        }
        Ok(images)
    }

    /// Low resolution PNG of the first page.
    pub fn render_preview(&self, path: &Path) -> Result<Vec<u8>, ExtractionError> {
        let settings = RasterSettings {
            dpi: self.settings.preview_dpi,
            scale_to: Some(self.settings.preview_size),
        };
        let mut document = self.backend.open(path)?;
        if document.page_count() == 0 {
            return Err(ExtractionError::Page {
                page: 1,
                message: "document has no pages".to_string(),
            });
        }
        document.render_page(0, &settings)
    }
}
