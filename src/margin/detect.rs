//! Ink bounding-box detection
//!
//! Four independent scans find the outermost ink row or column from each
//! side. Each returns `None` when the (unmasked) bitmap holds no ink.

use std::ops::Range;

use super::types::{Bitmap, MarginDetection, Margins, PageRect};
use super::DetectOptions;

/// Scans a bitmap for ink, honouring the header/footer mask
struct InkScanner<'a> {
    bitmap: &'a Bitmap,
    /// Rows that take part in detection; everything else is background
    rows: Range<u32>,
    threshold: u8,
}

impl<'a> InkScanner<'a> {
    fn new(bitmap: &'a Bitmap, options: &DetectOptions) -> Self {
        let height = bitmap.height();
        let rows = if options.mask_header_footer {
            let start = options.header_rows.min(height);
            let end = height.saturating_sub(options.footer_rows).max(start);
            start..end
        } else {
            0..height
        };

        Self {
            bitmap,
            rows,
            threshold: options.ink_threshold,
        }
    }

    #[inline]
    fn is_ink(&self, row: u32, col: u32) -> bool {
        self.bitmap.get(row, col) > self.threshold
    }

    fn row_has_ink(&self, row: u32) -> bool {
        (0..self.bitmap.width()).any(|col| self.is_ink(row, col))
    }

    fn col_has_ink(&self, col: u32) -> bool {
        self.rows.clone().any(|row| self.is_ink(row, col))
    }

    fn first_ink_row(&self) -> Option<u32> {
        self.rows.clone().find(|&row| self.row_has_ink(row))
    }

    fn last_ink_row(&self) -> Option<u32> {
        self.rows.clone().rev().find(|&row| self.row_has_ink(row))
    }

    fn first_ink_col(&self) -> Option<u32> {
        (0..self.bitmap.width()).find(|&col| self.col_has_ink(col))
    }

    fn last_ink_col(&self) -> Option<u32> {
        (0..self.bitmap.width())
            .rev()
            .find(|&col| self.col_has_ink(col))
    }
}

/// Detects the ink bounding box of a rasterized page
pub struct MarginDetector;

impl MarginDetector {
    /// Measure the blank margins around the ink on a bitmap
    ///
    /// A bitmap without ink is not an error: every margin stays 0 and the
    /// result is flagged `blank`.
    pub fn detect(bitmap: &Bitmap, options: &DetectOptions) -> MarginDetection {
        let width = bitmap.width();
        let height = bitmap.height();
        let scanner = InkScanner::new(bitmap, options);

        let top = scanner.first_ink_row();
        let left = scanner.first_ink_col();
        let bottom = scanner.last_ink_row().map(|row| height - row - 1);
        let right = scanner.last_ink_col().map(|col| width - col - 1);

        MarginDetection {
            margins: Margins {
                top: top.unwrap_or(0),
                bottom: bottom.unwrap_or(0),
                left: left.unwrap_or(0),
                right: right.unwrap_or(0),
            },
            image_size: (width, height),
            blank: top.is_none(),
        }
    }

    /// Ink bounding box in pixels, bottom-left origin
    pub fn detect_rect(bitmap: &Bitmap, options: &DetectOptions) -> PageRect {
        Self::detect(bitmap, options).crop_rect()
    }
}
