//! # escpos-raster CLI
//!
//! Command-line interface for printing photos on ESC/POS thermal printers.
//!
//! ## Usage
//!
//! ```bash
//! # Print a photo on a 58 mm printer
//! escpos-raster print photo.jpg --dev /dev/ttyUSB0 --width 384
//!
//! # Write the byte stream to a file instead of printing
//! escpos-raster print photo.jpg --width 384 --dry-run job.bin --preview preview.png
//!
//! # Unstick a printer, or check the link
//! escpos-raster cancel /dev/ttyUSB0
//! escpos-raster hello /dev/ttyUSB0 --baud 19200
//!
//! # Print with options exported from a photo-booth host
//! escpos-raster job photo.jpg --options esc_pos.json --copies 2
//! ```
//!
//! Set `RUST_LOG=debug` for per-band progress.
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 2 | Usage error |
//! | 3 | Image not found |
//! | 10 | Serial open or link error |
//! | 11 | Write timeout |
//! | 12 | Anything else |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use escpos_raster::{
    Diagnostics, LogDiagnostics, Maintenance, PrintError, PrintParameters, job,
    options::RawOptions, transport::serial::DEFAULT_BAUD,
};

/// escpos-raster - Photo printing for ESC/POS thermal printers
#[derive(Parser, Debug)]
#[command(name = "escpos-raster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print an image
    Print {
        /// Image file to print
        image: PathBuf,

        /// Serial device (optional with --dry-run)
        #[arg(long, value_name = "DEV")]
        dev: Option<String>,

        /// Print width in dots
        #[arg(long, value_name = "PX")]
        width: u32,

        /// Serial speed
        #[arg(long, default_value_t = DEFAULT_BAUD)]
        baud: u32,

        /// Cancel and reset the printer before printing
        #[arg(long)]
        pre_cancel: bool,

        /// Write the ESC/POS stream to FILE instead of printing
        #[arg(long, value_name = "FILE")]
        dry_run: Option<PathBuf>,

        /// Save the 1-bit image to FILE
        #[arg(long, value_name = "FILE")]
        preview: Option<PathBuf>,

        /// Use a fixed threshold instead of dithering
        #[arg(long)]
        no_dither: bool,

        /// Threshold for --no-dither
        #[arg(long, default_value_t = 128)]
        threshold: u8,

        /// Contrast factor, 1.0 = unchanged
        #[arg(long, default_value_t = 1.3)]
        contrast: f32,

        /// Gamma, 1.0 = unchanged
        #[arg(long, default_value_t = 1.0)]
        gamma: f32,

        /// Swap black and white in the sent data
        #[arg(long)]
        invert: bool,

        /// Print at most N rows
        #[arg(long, value_name = "N")]
        limit_lines: Option<u32>,

        /// Keep landscape images landscape
        #[arg(long)]
        no_autorotate: bool,

        /// Largest single serial write in bytes
        #[arg(long, default_value_t = 4096, value_parser = clap::value_parser!(u32).range(1..))]
        chunk: u32,

        /// Pause after each band, in seconds
        #[arg(long, default_value_t = 0.02)]
        line_sleep: f64,
    },

    /// Cancel the current job and reset the printer
    Cancel {
        /// Serial device
        dev: String,

        #[arg(long, default_value_t = DEFAULT_BAUD)]
        baud: u32,
    },

    /// Print a test line
    Hello {
        /// Serial device
        dev: String,

        #[arg(long, default_value_t = DEFAULT_BAUD)]
        baud: u32,
    },

    /// Print using a JSON file of host options
    Job {
        /// Image file to print
        image: PathBuf,

        /// JSON options file
        #[arg(long, value_name = "FILE")]
        options: PathBuf,

        /// Number of copies
        #[arg(long, default_value_t = 1)]
        copies: u32,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<(), PrintError> {
    let cli = Cli::parse();
    let diag = LogDiagnostics;

    match cli.command {
        Commands::Print {
            image,
            dev,
            width,
            baud,
            pre_cancel,
            dry_run,
            preview,
            no_dither,
            threshold,
            contrast,
            gamma,
            invert,
            limit_lines,
            no_autorotate,
            chunk,
            line_sleep,
        } => {
            if dev.is_none() && dry_run.is_none() {
                return Err(PrintError::Usage(
                    "--dev <DEV> is required unless --dry-run is given".to_string(),
                ));
            }
            let line_sleep = Duration::try_from_secs_f64(line_sleep)
                .map_err(|e| PrintError::invalid("line_sleep", line_sleep, e.to_string()))?;

            let params = PrintParameters {
                image,
                device: dev,
                target_width: width,
                baud,
                autorotate: !no_autorotate,
                pre_cancel,
                invert,
                dither: !no_dither,
                threshold,
                contrast,
                gamma,
                chunk_size: chunk as usize,
                line_sleep,
                row_limit: limit_lines,
                preview,
                dry_run,
            };
            job::run(&params, &diag)
        }

        Commands::Cancel { dev, baud } => Maintenance::new(dev, baud).cancel(&diag),

        Commands::Hello { dev, baud } => Maintenance::new(dev, baud).hello(&diag),

        Commands::Job {
            image,
            options,
            copies,
        } => {
            if !image.exists() {
                diag.warn("No photo to print (missing file)");
                return Ok(());
            }

            let params = RawOptions::load(&options)?.resolve(image, &diag);
            diag.info(&format!("Image: {}", params.image.display()));
            diag.info(&format!(
                "Serial: {} | Width: {} px",
                params.device.as_deref().unwrap_or("-"),
                params.target_width
            ));

            for copy in 1..=copies {
                diag.info(&format!("Start copy {}/{}", copy, copies));
                job::run(&params, &diag)?;
                diag.info(&format!("Copy {}/{} finished", copy, copies));
            }
            Ok(())
        }
    }
}
