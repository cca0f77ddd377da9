//! Margin module core types
//!
//! Contains the bitmap, margin and rectangle types shared by the detector
//! and the page cropper.

use image::GrayImage;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================
// Error Types
// ============================================================

/// Margin detection error types
#[derive(Debug, Error)]
pub enum MarginError {
    #[error("Invalid bitmap: {0}")]
    InvalidBitmap(String),
}

pub type Result<T> = std::result::Result<T, MarginError>;

/// Error returned when a rectangle string cannot be parsed
#[derive(Debug, Error, PartialEq)]
pub enum ParseRectError {
    #[error("expected 4 numbers \"x1 y1 x2 y2\", got {0}")]
    WrongArity(usize),

    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    #[error("inverted rectangle: x1 must be <= x2 and y1 must be <= y2")]
    Inverted,
}

// ============================================================
// Bitmap
// ============================================================

/// Rasterized page in ink convention
///
/// Row-major, one byte per pixel. `0` is background; any other value is ink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Wrap raw pixel data, checking that it matches the dimensions
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MarginError::InvalidBitmap(format!(
                "empty dimensions {}x{}",
                width, height
            )));
        }

        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(MarginError::InvalidBitmap(format!(
                "{}x{} needs {} pixels, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// All-background bitmap
    pub fn blank(width: u32, height: u32) -> Result<Self> {
        Self::new(width, height, vec![0; width as usize * height as usize])
    }

    /// Convert a rendered grayscale page (white paper) to ink convention
    ///
    /// Intensities are inverted so that paper white becomes `0` and black
    /// text becomes `255`.
    pub fn from_grayscale(gray: &GrayImage) -> Result<Self> {
        let (width, height) = gray.dimensions();
        let data = gray.as_raw().iter().map(|&v| 255 - v).collect();
        Self::new(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel value at (row, col)
    #[inline]
    pub fn get(&self, row: u32, col: u32) -> u8 {
        self.data[row as usize * self.width as usize + col as usize]
    }

    /// Set pixel value at (row, col)
    #[inline]
    pub fn set(&mut self, row: u32, col: u32, value: u8) {
        let idx = row as usize * self.width as usize + col as usize;
        self.data[idx] = value;
    }

    /// Copy out a sub-region given in raster coordinates
    pub fn region(&self, left: u32, top: u32, width: u32, height: u32) -> Result<Self> {
        if left + width > self.width || top + height > self.height {
            return Err(MarginError::InvalidBitmap(format!(
                "region {}x{}+{}+{} outside {}x{}",
                width, height, left, top, self.width, self.height
            )));
        }

        let mut data = Vec::with_capacity(width as usize * height as usize);
        for row in top..top + height {
            let start = row as usize * self.width as usize + left as usize;
            data.extend_from_slice(&self.data[start..start + width as usize]);
        }
        Self::new(width, height, data)
    }
}

// ============================================================
// Margins
// ============================================================

/// Margin information in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Margins {
    /// Create uniform margins
    pub fn uniform(value: u32) -> Self {
        Self {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }

    /// Total horizontal margin
    pub fn total_horizontal(&self) -> u32 {
        self.left + self.right
    }

    /// Total vertical margin
    pub fn total_vertical(&self) -> u32 {
        self.top + self.bottom
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================================
// Page rectangle
// ============================================================

/// Rectangle in page space with a bottom-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl PageRect {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Clamp this rectangle so it lies inside `bounds`
    #[must_use]
    pub fn clamp_to(&self, bounds: &PageRect) -> PageRect {
        let x1 = self.x1.clamp(bounds.x1, bounds.x2);
        let y1 = self.y1.clamp(bounds.y1, bounds.y2);
        PageRect {
            x1,
            y1,
            x2: self.x2.clamp(x1, bounds.x2),
            y2: self.y2.clamp(y1, bounds.y2),
        }
    }
}

impl FromStr for PageRect {
    type Err = ParseRectError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.len() != 4 {
            return Err(ParseRectError::WrongArity(parts.len()));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ParseRectError::InvalidNumber(part.to_string()))?;
        }

        let [x1, y1, x2, y2] = values;
        if x1 > x2 || y1 > y2 {
            return Err(ParseRectError::Inverted);
        }
        Ok(PageRect { x1, y1, x2, y2 })
    }
}

impl fmt::Display for PageRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            format_g(self.x1),
            format_g(self.y1),
            format_g(self.x2),
            format_g(self.y2)
        )
    }
}

/// Format a number like C's `%g`: six significant digits, no trailing zeros
pub fn format_g(value: f64) -> String {
    const PRECISION: i32 = 6;

    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    // The exponent after rounding decides the notation, as in C
    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exp) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exp.parse().unwrap_or(0);

    if !(-4..PRECISION).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs());
    }

    let decimals = (PRECISION - 1 - exponent) as usize;
    trim_fraction(&format!("{:.*}", decimals, value)).to_string()
}

/// Drop trailing zeros (and a bare point) from a decimal string
fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

// ============================================================
// Detection result
// ============================================================

/// Margin detection result for one bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarginDetection {
    /// Margins around the ink, in pixels
    pub margins: Margins,
    /// Bitmap size (width, height)
    pub image_size: (u32, u32),
    /// No ink was found
    pub blank: bool,
}

impl MarginDetection {
    /// Content box in pixels with the vertical axis flipped to a
    /// bottom-left origin
    pub fn crop_rect(&self) -> PageRect {
        let (width, height) = self.image_size;
        PageRect {
            x1: f64::from(self.margins.left),
            y1: f64::from(self.margins.bottom),
            x2: f64::from(width - self.margins.right),
            y2: f64::from(height - self.margins.top),
        }
    }

    /// Size of the ink box in pixels
    pub fn content_size(&self) -> (u32, u32) {
        let (width, height) = self.image_size;
        (
            width - self.margins.total_horizontal(),
            height - self.margins.total_vertical(),
        )
    }
}
