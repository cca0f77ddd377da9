//! CLI argument definitions
//!
//! Short flags follow the historical getopt interface:
//! `pdfclip [-d] [-o] [-p page] [-m "x1 y1 x2 y2"] <infile> <outfile>`

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::CliOverrides;
use crate::margin::PageRect;

/// Auto-crop PDF pages to the bounding box of their content
#[derive(Parser, Debug)]
#[command(name = "pdfclip")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print debug output (repeat for more detail)
    #[arg(short = 'd', action = ArgAction::Count)]
    pub debug: u8,

    /// Ignore running headers and footers when detecting content
    #[arg(short = 'o')]
    pub mask_header_footer: bool,

    /// Crop only this page (1-based, 0 = all)
    #[arg(short = 'p', value_name = "page")]
    pub page: Option<u32>,

    /// Use this box for every page instead of detecting one
    #[arg(
        short = 'm',
        value_name = "x1 y1 x2 y2",
        allow_hyphen_values = true
    )]
    pub margin: Option<PageRect>,

    /// Config file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Input PDF
    pub input: PathBuf,

    /// Output PDF
    pub output: PathBuf,
}

impl Cli {
    pub fn debug_enabled(&self) -> bool {
        self.debug > 0
    }

    /// Command-line values that override the config file
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            mask_header_footer: self.mask_header_footer,
            page: self.page,
            override_rect: self.margin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_positional_only() {
        let cli = Cli::try_parse_from(["pdfclip", "in.pdf", "out.pdf"]).unwrap();

        assert_eq!(cli.input, PathBuf::from("in.pdf"));
        assert_eq!(cli.output, PathBuf::from("out.pdf"));
        assert_eq!(cli.debug, 0);
        assert!(!cli.debug_enabled());
        assert!(!cli.mask_header_footer);
        assert_eq!(cli.page, None);
        assert_eq!(cli.margin, None);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_all_short_flags() {
        let cli = Cli::try_parse_from([
            "pdfclip", "-d", "-o", "-p", "3", "-m", "10 20 300 400", "in.pdf", "out.pdf",
        ])
        .unwrap();

        assert!(cli.debug_enabled());
        assert!(cli.mask_header_footer);
        assert_eq!(cli.page, Some(3));
        assert_eq!(cli.margin, Some(PageRect::new(10.0, 20.0, 300.0, 400.0)));

        let overrides = cli.overrides();
        assert!(overrides.mask_header_footer);
        assert_eq!(overrides.page, Some(3));
        assert_eq!(overrides.override_rect, cli.margin);
    }

    #[test]
    fn test_debug_is_a_counter() {
        let cli = Cli::try_parse_from(["pdfclip", "-d", "-d", "-dd", "a.pdf", "b.pdf"]).unwrap();
        assert_eq!(cli.debug, 4);
    }

    #[test]
    fn test_attached_values() {
        let cli = Cli::try_parse_from(["pdfclip", "-p7", "a.pdf", "b.pdf"]).unwrap();
        assert_eq!(cli.page, Some(7));
    }

    #[test]
    fn test_negative_override_coordinates() {
        let cli = Cli::try_parse_from(["pdfclip", "-m", "-10 -20 300 400", "a.pdf", "b.pdf"])
            .unwrap();
        assert_eq!(cli.margin, Some(PageRect::new(-10.0, -20.0, 300.0, 400.0)));
    }

    #[test]
    fn test_missing_output_is_error() {
        let err = Cli::try_parse_from(["pdfclip", "in.pdf"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_missing_both_positionals_is_error() {
        let err = Cli::try_parse_from(["pdfclip", "-d"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_bad_override_rect() {
        let err = Cli::try_parse_from(["pdfclip", "-m", "1 2 3", "a.pdf", "b.pdf"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_bad_page_number() {
        let err = Cli::try_parse_from(["pdfclip", "-p", "two", "a.pdf", "b.pdf"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_config_flag() {
        let cli =
            Cli::try_parse_from(["pdfclip", "--config", "crop.toml", "a.pdf", "b.pdf"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("crop.toml")));
    }
}
