use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use engine_logging::engine_debug;

use crate::ExtractionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSettings {
    pub dpi: u32,
    /// Exact output size in pixels, when set.
    pub scale_to: Option<(u32, u32)>,
}

/// Renders PDF pages to PNG with the poppler `pdftoppm` executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdftoppm {
    program: PathBuf,
}

impl Default for Pdftoppm {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl Pdftoppm {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Renders the 1-based `page` of `pdf_path`.
    pub fn render(
        &self,
        pdf_path: &Path,
        page: u32,
        settings: &RasterSettings,
    ) -> Result<Vec<u8>, ExtractionError> {
        let temp = tempfile::tempdir().map_err(|err| ExtractionError::Render(err.to_string()))?;
        let prefix = temp.path().join("page");
        let page_arg = page.to_string();
        let dpi_arg = settings.dpi.to_string();

        let mut command = Command::new(&self.program);
        command.args(["-png", "-singlefile", "-r", &dpi_arg, "-f", &page_arg, "-l", &page_arg]);
        if let Some((width, height)) = settings.scale_to {
            command
                .arg("-scale-to-x")
                .arg(width.to_string())
                .arg("-scale-to-y")
                .arg(height.to_string());
        }
        command.arg(pdf_path).arg(&prefix);

        engine_debug!("Rendering page {} of {:?} at {} dpi", page, pdf_path, settings.dpi);
        match command.output() {
            Ok(output) if output.status.success() => fs::read(prefix.with_extension("png"))
                .map_err(|err| ExtractionError::Render(format!("no image for page {page}: {err}"))),
            Ok(output) => Err(ExtractionError::Render(format!(
                "pdftoppm exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(ExtractionError::RasterizerMissing)
            }
            Err(err) => Err(ExtractionError::Render(err.to_string())),
        }
    }
}
