//! # ptouch CLI
//!
//! Command-line interface for Brother P-touch label printers.
//!
//! ## Usage
//!
//! ```bash
//! # List attached printers
//! ptouch list
//!
//! # Show the loaded tape
//! ptouch status
//!
//! # Print an image (height runs across the tape)
//! ptouch print label.png
//!
//! # Print without cutting, dithering a photo
//! ptouch print --no-cut --dither fs photo.png
//!
//! # Write the raw command stream for a model to a file
//! ptouch encode --model PT-P700 --output job.bin label.png
//! ```

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use ptouch::{
    MemoryTransport, ProtocolSession, PtouchError,
    discovery::{self, UsbSession},
    printer::registry,
    render::{self, Bitmap, MonoBitmap, dither::DitheringAlgorithm},
    session::{PollConfig, SessionConfig, config::DEFAULT_TRANSFER_TIMEOUT_MS},
    transport::BulkTransport,
};

/// ptouch - Brother P-touch label printer utility
#[derive(Parser, Debug)]
#[command(name = "ptouch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Status reads before giving up
    #[arg(long, global = true, env = "PTOUCH_STATUS_ATTEMPTS", default_value_t = 10)]
    status_attempts: u32,

    /// Pause before each status read, in milliseconds
    #[arg(long, global = true, env = "PTOUCH_STATUS_INTERVAL_MS", default_value_t = 500)]
    status_interval_ms: u64,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List attached supported printers
    List,

    /// Show the tape loaded in the first printer
    Status {
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print an image on the first printer
    Print {
        /// Image file; its height runs across the tape
        image: PathBuf,

        /// Advance the tape without cutting
        #[arg(long)]
        no_cut: bool,

        /// Grayscale conversion: threshold, bayer or floyd-steinberg
        #[arg(long, default_value = "threshold")]
        dither: DitheringAlgorithm,

        /// Do not query the loaded tape before printing
        #[arg(long)]
        skip_status: bool,
    },

    /// Write a print job's raw command stream to a file
    Encode {
        /// Image file; its height runs across the tape
        image: PathBuf,

        /// Printer model, e.g. PT-P700
        #[arg(long)]
        model: String,

        /// Output file
        #[arg(long, short, value_name = "FILE")]
        output: PathBuf,

        /// Advance the tape without cutting
        #[arg(long)]
        no_cut: bool,

        /// Grayscale conversion: threshold, bayer or floyd-steinberg
        #[arg(long, default_value = "threshold")]
        dither: DitheringAlgorithm,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), PtouchError> {
    let config = SessionConfig {
        poll: PollConfig {
            max_attempts: cli.status_attempts,
            interval_ms: cli.status_interval_ms,
        },
        transfer_timeout_ms: DEFAULT_TRANSFER_TIMEOUT_MS,
    };

    match cli.command {
        Commands::List => {
            let printers = discovery::list_printers(config)?;
            if printers.is_empty() {
                println!("No supported printers found.");
                println!("\nSupported models:");
                for model in discovery::supported_models() {
                    println!(
                        "  {:<24} {:04x}:{:04x}",
                        model.name, model.vendor_id, model.product_id
                    );
                }
                return Ok(());
            }
            for printer in &printers {
                println!("{}", printer.describe());
            }
        }

        Commands::Status { json } => {
            let mut printer = open_first(config)?;
            printer.init()?;
            let status = printer.printer_status()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("{}", printer.describe());
                println!("Detected tape: {}", status);
                println!(
                    "Printable height: {:.1}mm ({} px)",
                    status.tape.printable_mm(),
                    status.tape.width_px
                );
                if !status.errors.is_empty() {
                    println!("Errors: {:?}", status.errors);
                }
            }
        }

        Commands::Print {
            image,
            no_cut,
            dither,
            skip_status,
        } => {
            let bitmap = load_bitmap(&image, dither)?;
            let mut printer = open_first(config)?;
            printer.init()?;

            if !skip_status {
                let status = printer.printer_status()?;
                println!("Detected tape: {}", status);
                if bitmap.height() > status.tape.width_px as usize {
                    warn!(
                        image_height = bitmap.height(),
                        tape_px = status.tape.width_px,
                        printable_mm = status.tape.printable_mm(),
                        "image is taller than the printable tape width"
                    );
                }
            }

            println!("Printing {}x{} label...", bitmap.width(), bitmap.height());
            printer.print_image(&bitmap, !no_cut)?;
            println!("Printed successfully!");
        }

        Commands::Encode {
            image,
            model,
            output,
            no_cut,
            dither,
        } => {
            let device = registry::by_name(&model).ok_or_else(|| {
                PtouchError::InvalidCommand(format!(
                    "Unknown model '{}'. Run `ptouch list` to see supported models.",
                    model
                ))
            })?;
            let bitmap = load_bitmap(&image, dither)?;

            let mut session = ProtocolSession::new(MemoryTransport::new(), device, config);
            session.init()?;
            session.print_image(&bitmap, !no_cut)?;

            let data = session.into_transport().written_bytes();
            std::fs::write(&output, &data)?;
            println!("Wrote {} bytes to {}", data.len(), output.display());
        }
    }

    Ok(())
}

fn open_first(config: SessionConfig) -> Result<UsbSession, PtouchError> {
    let printer = discovery::first_printer(config)?.ok_or(PtouchError::NoPrinter)?;
    tracing::info!(printer = %printer.transport().describe(), "using printer");
    Ok(printer)
}

fn load_bitmap(path: &Path, algorithm: DitheringAlgorithm) -> Result<MonoBitmap, PtouchError> {
    let img = render::load_gray(path)?;
    Ok(render::dither::dither(&img, algorithm))
}
