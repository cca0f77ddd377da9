//! Page crop orchestration
//!
//! Walks the selected pages, renders and measures each one (or applies a
//! fixed override rectangle) and writes the result back as the page's
//! MediaBox. Saving is left to the caller.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::document::{DocumentError, PageDocument};
use crate::margin::{DetectOptions, MarginDetection, MarginDetector, PageRect};
use crate::raster::{PageRasterizer, RasterError, DEFAULT_DPI};

/// PDF user-space units per inch
const POINTS_PER_INCH: f64 = 72.0;

/// Crop error types
#[derive(Debug, Error)]
pub enum CropError {
    #[error("Render error: {0}")]
    Render(#[from] RasterError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Invalid DPI: {0}")]
    InvalidDpi(u32),
}

pub type Result<T> = std::result::Result<T, CropError>;

/// Which pages to crop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Every page, in order
    #[default]
    All,
    /// One 1-based page
    Single(u32),
}

impl PageSelection {
    /// `0` selects all pages
    pub fn from_page_number(page: u32) -> Self {
        match page {
            0 => PageSelection::All,
            n => PageSelection::Single(n),
        }
    }

    /// Pages to process in a document of `page_count` pages
    pub fn pages(&self, page_count: u32) -> Vec<u32> {
        match *self {
            PageSelection::All => (1..=page_count).collect(),
            PageSelection::Single(page) if page <= page_count => vec![page],
            PageSelection::Single(_) => Vec::new(),
        }
    }
}

/// Options for a crop run
#[derive(Debug, Clone, PartialEq)]
pub struct CropOptions {
    /// Pages to crop
    pub pages: PageSelection,
    /// Fixed rectangle applied instead of detection
    pub override_rect: Option<PageRect>,
    /// Render resolution
    pub dpi: u32,
    /// Detector options
    pub detect: DetectOptions,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            pages: PageSelection::All,
            override_rect: None,
            dpi: DEFAULT_DPI,
            detect: DetectOptions::default(),
        }
    }
}

impl CropOptions {
    /// Create a new options builder
    pub fn builder() -> CropOptionsBuilder {
        CropOptionsBuilder::default()
    }
}

/// Builder for CropOptions
#[derive(Debug, Default)]
pub struct CropOptionsBuilder {
    options: CropOptions,
}

impl CropOptionsBuilder {
    #[must_use]
    pub fn pages(mut self, pages: PageSelection) -> Self {
        self.options.pages = pages;
        self
    }

    #[must_use]
    pub fn override_rect(mut self, rect: Option<PageRect>) -> Self {
        self.options.override_rect = rect;
        self
    }

    #[must_use]
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.options.dpi = dpi;
        self
    }

    #[must_use]
    pub fn detect(mut self, detect: DetectOptions) -> Self {
        self.options.detect = detect;
        self
    }

    #[must_use]
    pub fn build(self) -> CropOptions {
        self.options
    }
}

/// Where a page's new box came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropSource {
    /// Measured from the rendered page
    Detected(MarginDetection),
    /// Caller-supplied rectangle
    Override,
}

/// One applied page crop
#[derive(Debug, Clone, PartialEq)]
pub struct PageCrop {
    /// 1-based page number
    pub page: u32,
    /// MediaBox before cropping; unknown when an override was written to a
    /// page without a readable box
    pub previous: Option<PageRect>,
    /// MediaBox written to the page
    pub crop: PageRect,
    pub source: CropSource,
}

/// Result of a crop run
#[derive(Debug, Clone, Default)]
pub struct CropSummary {
    /// Pages in the document
    pub page_count: u32,
    /// Applied crops, in page order
    pub crops: Vec<PageCrop>,
}

/// Hooks for reporting crop progress
pub trait CropObserver {
    /// Called once before any page is touched
    fn on_document(&self, _page_count: u32) {}

    /// Called after each page's box has been replaced
    fn on_page(&self, _crop: &PageCrop) {}
}

/// Observer that reports nothing
pub struct SilentObserver;

impl CropObserver for SilentObserver {}

/// Crops document pages to their content
pub struct PageCropper {
    options: CropOptions,
}

impl PageCropper {
    pub fn new(options: CropOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CropOptions {
        &self.options
    }

    /// Crop the selected pages of `doc` in place
    pub fn crop<D, R>(
        &self,
        doc: &mut D,
        rasterizer: &R,
        observer: &dyn CropObserver,
    ) -> Result<CropSummary>
    where
        D: PageDocument + ?Sized,
        R: PageRasterizer + ?Sized,
    {
        if self.options.dpi == 0 {
            return Err(CropError::InvalidDpi(self.options.dpi));
        }

        let page_count = doc.page_count();
        observer.on_document(page_count);

        let pages = self.options.pages.pages(page_count);
        if let PageSelection::Single(page) = self.options.pages {
            if pages.is_empty() {
                warn!(page, page_count, "selected page is out of range, nothing to crop");
            }
        }

        let mut summary = CropSummary {
            page_count,
            crops: Vec::with_capacity(pages.len()),
        };

        for page in pages {
            let crop = self.crop_page(doc, rasterizer, page)?;
            observer.on_page(&crop);
            summary.crops.push(crop);
        }

        Ok(summary)
    }

    fn crop_page<D, R>(&self, doc: &mut D, rasterizer: &R, page: u32) -> Result<PageCrop>
    where
        D: PageDocument + ?Sized,
        R: PageRasterizer + ?Sized,
    {
        let (previous, crop, source) = match self.options.override_rect {
            Some(rect) => {
                let previous = match doc.media_box(page) {
                    Ok(media_box) => Some(media_box),
                    Err(e) => {
                        debug!(page, error = %e, "no readable MediaBox, writing override anyway");
                        None
                    }
                };
                (previous, rect, CropSource::Override)
            }
            None => {
                let media_box = doc.media_box(page)?;
                let bitmap = rasterizer.render_page(page, self.options.dpi)?;
                let detection = MarginDetector::detect(&bitmap, &self.options.detect);
                debug!(page, margins = ?detection.margins, blank = detection.blank, "margins detected");
                (
                    Some(media_box),
                    self.to_page_space(&detection, &media_box),
                    CropSource::Detected(detection),
                )
            }
        };

        doc.set_media_box(page, &crop)?;
        info!(page, previous = ?previous, %crop, "page cropped");

        Ok(PageCrop {
            page,
            previous,
            crop,
            source,
        })
    }

    /// Map a pixel-space detection onto the page's current box
    fn to_page_space(&self, detection: &MarginDetection, media_box: &PageRect) -> PageRect {
        if detection.blank {
            return *media_box;
        }

        let scale = POINTS_PER_INCH / f64::from(self.options.dpi);
        let pixels = detection.crop_rect();
        PageRect {
            x1: media_box.x1 + pixels.x1 * scale,
            y1: media_box.y1 + pixels.y1 * scale,
            x2: media_box.x1 + pixels.x2 * scale,
            y2: media_box.y1 + pixels.y2 * scale,
        }
        .clamp_to(media_box)
    }
}
