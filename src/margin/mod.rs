//! Margin Detection module
//!
//! Finds the tightest rectangle around the ink on a rasterized page.
//!
//! # Features
//!
//! - Row/column scans from all four sides
//! - Optional header/footer masking for layouts with running heads
//! - Configurable ink threshold for anti-aliased renders
//! - Bottom-left-origin output matching PDF page space
//!
//! # Example
//!
//! ```rust
//! use pdfclip::{Bitmap, DetectOptions, MarginDetector};
//!
//! let mut bitmap = Bitmap::blank(100, 100).unwrap();
//! bitmap.set(50, 40, 255);
//!
//! let options = DetectOptions::builder().mask_header_footer(false).build();
//! let rect = MarginDetector::detect_rect(&bitmap, &options);
//!
//! assert_eq!((rect.x1, rect.y1, rect.x2, rect.y2), (40.0, 49.0, 41.0, 50.0));
//! ```

// Submodules
mod detect;
mod types;

// Re-export public API
pub use detect::MarginDetector;
pub use types::{
    format_g, Bitmap, MarginDetection, MarginError, Margins, PageRect, ParseRectError, Result,
};

// ============================================================
// Constants
// ============================================================

/// Rows blanked at the top of the page when masking headers
pub const DEFAULT_HEADER_ROWS: u32 = 70;

/// Rows blanked at the bottom of the page when masking footers
pub const DEFAULT_FOOTER_ROWS: u32 = 20;

/// Pixels strictly above this value count as ink
pub const DEFAULT_INK_THRESHOLD: u8 = 0;

// ============================================================
// Options
// ============================================================

/// Margin detection options
///
/// The header/footer band sizes are in pixels at the render resolution and
/// were tuned for 72 DPI pages; other DPIs need other values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectOptions {
    /// Ignore ink in the header and footer bands
    pub mask_header_footer: bool,
    /// Header band height in pixels
    pub header_rows: u32,
    /// Footer band height in pixels
    pub footer_rows: u32,
    /// Ink threshold (0-255)
    pub ink_threshold: u8,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            mask_header_footer: false,
            header_rows: DEFAULT_HEADER_ROWS,
            footer_rows: DEFAULT_FOOTER_ROWS,
            ink_threshold: DEFAULT_INK_THRESHOLD,
        }
    }
}

impl DetectOptions {
    /// Create a new options builder
    pub fn builder() -> DetectOptionsBuilder {
        DetectOptionsBuilder::default()
    }

    /// Options with the header/footer bands masked
    pub fn masked() -> Self {
        Self {
            mask_header_footer: true,
            ..Default::default()
        }
    }
}

/// Builder for DetectOptions
#[derive(Debug, Default)]
pub struct DetectOptionsBuilder {
    options: DetectOptions,
}

impl DetectOptionsBuilder {
    /// Enable or disable header/footer masking
    #[must_use]
    pub fn mask_header_footer(mut self, enabled: bool) -> Self {
        self.options.mask_header_footer = enabled;
        self
    }

    /// Set header band height in pixels
    #[must_use]
    pub fn header_rows(mut self, rows: u32) -> Self {
        self.options.header_rows = rows;
        self
    }

    /// Set footer band height in pixels
    #[must_use]
    pub fn footer_rows(mut self, rows: u32) -> Self {
        self.options.footer_rows = rows;
        self
    }

    /// Set ink threshold
    #[must_use]
    pub fn ink_threshold(mut self, threshold: u8) -> Self {
        self.options.ink_threshold = threshold;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> DetectOptions {
        self.options
    }
}
