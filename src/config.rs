//! Configuration file support
//!
//! Settings are read from TOML. Lookup order:
//!
//! 1. `./pdfclip.toml`
//! 2. `<config dir>/pdfclip/config.toml` (e.g. `~/.config/pdfclip/config.toml`)
//!
//! Command-line flags always win over file values.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::crop::{CropOptions, PageSelection};
use crate::margin::{
    DetectOptions, PageRect, DEFAULT_FOOTER_ROWS, DEFAULT_HEADER_ROWS, DEFAULT_INK_THRESHOLD,
};
use crate::raster::DEFAULT_DPI;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "pdfclip.toml";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Rendering settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Render resolution
    pub dpi: u32,
    /// Explicit `pdftoppm` binary; searched on `PATH` when unset
    pub pdftoppm: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            pdftoppm: None,
        }
    }
}

/// Detection settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    pub mask_header_footer: bool,
    pub header_rows: u32,
    pub footer_rows: u32,
    pub ink_threshold: u8,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            mask_header_footer: false,
            header_rows: DEFAULT_HEADER_ROWS,
            footer_rows: DEFAULT_FOOTER_ROWS,
            ink_threshold: DEFAULT_INK_THRESHOLD,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub detect: DetectConfig,
}

/// Values taken from the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    /// `-o`: force header/footer masking on
    pub mask_header_footer: bool,
    /// `-p`: 1-based page, `0` or unset for all
    pub page: Option<u32>,
    /// `-m`: fixed rectangle
    pub override_rect: Option<PageRect>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Config {
    /// Load from the first config file found, or defaults when there is none
    pub fn load() -> Result<Self> {
        match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Candidate config files, highest priority first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("pdfclip").join("config.toml"));
        }
        paths
    }

    /// Combine file settings with command-line values into crop options
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> CropOptions {
        let detect = DetectOptions::builder()
            .mask_header_footer(cli.mask_header_footer || self.detect.mask_header_footer)
            .header_rows(self.detect.header_rows)
            .footer_rows(self.detect.footer_rows)
            .ink_threshold(self.detect.ink_threshold)
            .build();

        CropOptions::builder()
            .pages(cli.page.map_or(PageSelection::All, PageSelection::from_page_number))
            .override_rect(cli.override_rect)
            .dpi(self.render.dpi)
            .detect(detect)
            .build()
    }
}
