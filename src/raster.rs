//! Page rasterization
//!
//! Renders single PDF pages to grayscale bitmaps. The default backend shells
//! out to Poppler's `pdftoppm`, which renders the page's MediaBox.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::margin::Bitmap;

/// Default render resolution; at 72 DPI one pixel is one PDF point
pub const DEFAULT_DPI: u32 = 72;

const PDFTOPPM: &str = "pdftoppm";

/// Output file prefix inside the scratch directory
const OUTPUT_PREFIX: &str = "page";

/// Rasterization error types
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("{0} not found (install poppler-utils)")]
    ToolNotFound(String),

    #[error("Failed to render page {page}: {message}")]
    RenderFailed { page: u32, message: String },

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RasterError>;

/// Renders one page at a time to an ink-convention bitmap
pub trait PageRasterizer {
    /// Render 1-based `page` at `dpi`
    fn render_page(&self, page: u32, dpi: u32) -> Result<Bitmap>;
}

/// Rasterizer backed by the `pdftoppm` command
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    source: PathBuf,
    /// Resolved on `PATH` at first use when unset
    program: Option<PathBuf>,
}

impl PdftoppmRasterizer {
    /// Use the `pdftoppm` found on `PATH`
    ///
    /// The lookup happens on the first render, so a document that is never
    /// rendered does not need Poppler installed.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            program: None,
        }
    }

    /// Use an explicit `pdftoppm` binary
    ///
    /// Like [`PdftoppmRasterizer::new`], the binary is only checked when a
    /// page is rendered.
    pub fn with_program(source: impl Into<PathBuf>, program: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            program: Some(program.into()),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    fn program(&self) -> Result<PathBuf> {
        match &self.program {
            Some(program) if program.exists() => Ok(program.clone()),
            Some(program) => Err(RasterError::ToolNotFound(program.display().to_string())),
            None => which::which(PDFTOPPM)
                .map_err(|_| RasterError::ToolNotFound(PDFTOPPM.to_string())),
        }
    }

    /// Arguments for rendering one page into `prefix.pgm`
    fn render_args(&self, page: u32, dpi: u32, prefix: &Path) -> Vec<String> {
        let page = page.to_string();
        vec![
            "-gray".to_string(),
            "-r".to_string(),
            dpi.to_string(),
            "-f".to_string(),
            page.clone(),
            "-l".to_string(),
            page,
            "-singlefile".to_string(),
            self.source.display().to_string(),
            prefix.display().to_string(),
        ]
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn render_page(&self, page: u32, dpi: u32) -> Result<Bitmap> {
        let program = self.program()?;
        let scratch = tempfile::tempdir()?;
        let prefix = scratch.path().join(OUTPUT_PREFIX);

        debug!(page, dpi, source = %self.source.display(), "rendering page");
        let output = Command::new(&program)
            .args(self.render_args(page, dpi, &prefix))
            .output()?;

        if !output.status.success() {
            return Err(RasterError::RenderFailed {
                page,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let rendered = prefix.with_extension("pgm");
        if !rendered.exists() {
            return Err(RasterError::RenderFailed {
                page,
                message: format!("{} produced no output", PDFTOPPM),
            });
        }

        let gray = image::open(&rendered)
            .map_err(|e| RasterError::InvalidImage(e.to_string()))?
            .to_luma8();
        debug!(page, width = gray.width(), height = gray.height(), "page rendered");

        Bitmap::from_grayscale(&gray).map_err(|e| RasterError::InvalidImage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_tool_not_found() {
        let rasterizer = PdftoppmRasterizer::with_program("in.pdf", "/nonexistent/bin/pdftoppm");
        assert!(matches!(
            rasterizer.render_page(1, DEFAULT_DPI),
            Err(RasterError::ToolNotFound(_))
        ));
    }

    #[test]
    fn test_render_args() {
        let temp_dir = tempfile::tempdir().unwrap();
        let program = temp_dir.path().join("pdftoppm");
        std::fs::write(&program, b"").unwrap();

        let rasterizer = PdftoppmRasterizer::with_program("book.pdf", &program);
        let args = rasterizer.render_args(7, 144, Path::new("/tmp/x/page"));

        assert_eq!(
            args,
            vec![
                "-gray",
                "-r",
                "144",
                "-f",
                "7",
                "-l",
                "7",
                "-singlefile",
                "book.pdf",
                "/tmp/x/page",
            ]
        );
        assert_eq!(rasterizer.source(), Path::new("book.pdf"));
        assert_eq!(rasterizer.program().unwrap(), program);
    }

    #[test]
    fn test_error_display_messages() {
        let err = RasterError::ToolNotFound("pdftoppm".to_string());
        assert!(err.to_string().contains("poppler-utils"));

        let err = RasterError::RenderFailed {
            page: 3,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to render page 3: boom");
    }

    // Needs poppler-utils; skipped when pdftoppm is absent
    #[test]
    fn test_render_real_page() {
        let Ok(_) = which::which(PDFTOPPM) else {
            eprintln!("pdftoppm not installed, skipping");
            return;
        };

        let temp_dir = tempfile::tempdir().unwrap();
        let pdf = temp_dir.path().join("box.pdf");
        crate::document::tests::write_test_pdf(&pdf, &[(200.0, 100.0)], b"0 g 50 20 60 40 re f");

        let rasterizer = PdftoppmRasterizer::new(&pdf);
        let bitmap = rasterizer.render_page(1, DEFAULT_DPI).unwrap();

        assert_eq!((bitmap.width(), bitmap.height()), (200, 100));
        let rect = crate::margin::MarginDetector::detect_rect(
            &bitmap,
            &crate::margin::DetectOptions::default(),
        );
        assert!((rect.x1 - 50.0).abs() <= 1.0);
        assert!((rect.y1 - 20.0).abs() <= 1.0);
        assert!((rect.x2 - 110.0).abs() <= 1.0);
        assert!((rect.y2 - 60.0).abs() <= 1.0);
    }
}
