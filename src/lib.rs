//! pdfclip - Auto-crop PDF pages to their printed content
//!
//! Each page is rendered to a grayscale bitmap, the bounding box of the ink
//! is measured, and the page's MediaBox is replaced with that box (or with
//! a fixed rectangle supplied by the caller).
//!
//! # Modules
//!
//! - [`margin`] - ink bounding-box detection on bitmaps
//! - [`raster`] - page rendering through `pdftoppm`
//! - [`document`] - MediaBox access on `lopdf` documents
//! - [`crop`] - per-page orchestration
//! - [`config`] - TOML configuration
//! - [`cli`] - command-line definitions
//!
//! # Example
//!
//! ```rust,no_run
//! use pdfclip::{CropOptions, PageCropper, PdfDocument, PdftoppmRasterizer, SilentObserver};
//! use std::path::Path;
//!
//! let input = Path::new("book.pdf");
//! let mut doc = PdfDocument::open(input).unwrap();
//! let rasterizer = PdftoppmRasterizer::new(input);
//!
//! let summary = PageCropper::new(CropOptions::default())
//!     .crop(&mut doc, &rasterizer, &SilentObserver)
//!     .unwrap();
//! println!("cropped {} pages", summary.crops.len());
//!
//! doc.save(Path::new("book-cropped.pdf")).unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod crop;
pub mod document;
pub mod margin;
pub mod raster;

// Re-export public API
pub use cli::Cli;
pub use config::{CliOverrides, Config, ConfigError};
pub use crop::{
    CropError, CropObserver, CropOptions, CropOptionsBuilder, CropSource, CropSummary, PageCrop,
    PageCropper, PageSelection, SilentObserver,
};
pub use document::{DocumentError, PageDocument, PdfDocument};
pub use margin::{
    Bitmap, DetectOptions, DetectOptionsBuilder, MarginDetection, MarginDetector, MarginError,
    Margins, PageRect, ParseRectError,
};
pub use raster::{PageRasterizer, PdftoppmRasterizer, RasterError};

/// Process exit codes
pub mod exit_codes {
    /// Crop and save completed
    pub const SUCCESS: i32 = 0;
    /// Bad command line (clap's own exit status)
    pub const USAGE_ERROR: i32 = 2;
    /// Input document could not be opened
    pub const OPEN_ERROR: i32 = 3;
    /// A page could not be cropped
    pub const CROP_ERROR: i32 = 4;
    /// Output document could not be written
    pub const SAVE_ERROR: i32 = 5;
}
