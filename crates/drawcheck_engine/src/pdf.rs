use std::path::{Path, PathBuf};

use lopdf::Document;

use crate::extract::{DocumentBackend, OpenDocument};
use crate::raster::{Pdftoppm, RasterSettings};
use crate::ExtractionError;

/// Text through lopdf, page images through pdftoppm.
#[derive(Debug, Clone, Default)]
pub struct LopdfBackend {
    rasterizer: Pdftoppm,
}

impl LopdfBackend {
    pub fn new(rasterizer: Pdftoppm) -> Self {
        Self { rasterizer }
    }
}

impl DocumentBackend for LopdfBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn OpenDocument>, ExtractionError> {
        let document = Document::load(path).map_err(|err| ExtractionError::Open {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        // Keys of `get_pages` are 1-based page numbers in document order.
        let pages = document.get_pages().keys().copied().collect();
        Ok(Box::new(LopdfDocument {
            path: path.to_path_buf(),
            document,
            pages,
            rasterizer: self.rasterizer.clone(),
        }))
    }
}

struct LopdfDocument {
    path: PathBuf,
    document: Document,
    pages: Vec<u32>,
    rasterizer: Pdftoppm,
}

impl LopdfDocument {
    fn page_number(&self, index: usize) -> Result<u32, ExtractionError> {
        self.pages
            .get(index)
            .copied()
            .ok_or_else(|| ExtractionError::Page {
                page: index + 1,
                message: "page out of range".to_string(),
            })
    }
}

impl OpenDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&mut self, index: usize) -> Result<String, ExtractionError> {
        let number = self.page_number(index)?;
        self.document
            .extract_text(&[number])
            .map_err(|err| ExtractionError::Page {
                page: index + 1,
                message: err.to_string(),
            })
    }

    fn render_page(
        &mut self,
        index: usize,
        settings: &RasterSettings,
    ) -> Result<Vec<u8>, ExtractionError> {
        let number = self.page_number(index)?;
        self.rasterizer.render(&self.path, number, settings)
    }
}
