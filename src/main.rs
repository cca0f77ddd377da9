//! pdfclip - Auto-crop PDF pages
//!
//! CLI entry point

use clap::Parser;
use pdfclip::{
    exit_codes,
    // CLI
    Cli,
    // Config
    Config,
    // Cropping
    CropObserver, PageCrop, PageCropper,
    // Collaborators
    PdfDocument, PdftoppmRasterizer,
};
use std::fmt;
use std::path::Path;
use tracing::Level;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    std::process::exit(match run(&cli) {
        Ok(()) => exit_codes::SUCCESS,
        Err(failure) => {
            eprintln!("{}", failure);
            failure.exit_code()
        }
    });
}

fn init_logging(debug: u8) {
    let level = match debug {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

// ============ Failure Classes ============

/// Terminal failure, one per exit status
enum Failure {
    Open(anyhow::Error),
    Crop(anyhow::Error),
    Save(anyhow::Error),
}

impl Failure {
    fn exit_code(&self) -> i32 {
        match self {
            Failure::Open(_) => exit_codes::OPEN_ERROR,
            Failure::Crop(_) => exit_codes::CROP_ERROR,
            Failure::Save(_) => exit_codes::SAVE_ERROR,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Open(e) => write!(f, "pdf open error: {:#}", e),
            Failure::Crop(e) => write!(f, "crop failed: {:#}", e),
            Failure::Save(e) => write!(f, "save failed: {:#}", e),
        }
    }
}

// ============ Debug Output ============

/// Prints the page count and one line per cropped page
struct DebugPrinter {
    enabled: bool,
}

impl CropObserver for DebugPrinter {
    fn on_document(&self, page_count: u32) {
        if self.enabled {
            println!("Page Num: {}", page_count);
        }
    }

    fn on_page(&self, crop: &PageCrop) {
        if self.enabled {
            match &crop.previous {
                Some(previous) => println!(
                    "page={}, box=[{}], crop=[{}]",
                    crop.page, previous, crop.crop
                ),
                None => println!("page={}, crop=[{}]", crop.page, crop.crop),
            }
        }
    }
}

// ============ Crop Command ============

fn run(cli: &Cli) -> Result<(), Failure> {
    let config = load_config(cli.config.as_deref());
    let options = config.merge_with_cli(&cli.overrides());

    if cli.debug_enabled() {
        println!("Input File: {}", cli.input.display());
        println!("Output File: {}", cli.output.display());
    }

    let mut doc = PdfDocument::open(&cli.input).map_err(|e| Failure::Open(e.into()))?;

    let rasterizer = match &config.render.pdftoppm {
        Some(program) => PdftoppmRasterizer::with_program(&cli.input, program),
        None => PdftoppmRasterizer::new(&cli.input),
    };

    let printer = DebugPrinter {
        enabled: cli.debug_enabled(),
    };
    let summary = PageCropper::new(options)
        .crop(&mut doc, &rasterizer, &printer)
        .map_err(|e| Failure::Crop(e.into()))?;
    tracing::info!(
        pages = summary.page_count,
        cropped = summary.crops.len(),
        "crop complete"
    );

    doc.save(&cli.output).map_err(|e| Failure::Save(e.into()))?;

    Ok(())
}

/// Load the config file, falling back to defaults on any problem
fn load_config(explicit: Option<&Path>) -> Config {
    match explicit {
        Some(path) => match Config::load_from_path(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {}", e);
                Config::default()
            }
        },
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable config file");
            Config::default()
        }),
    }
}
