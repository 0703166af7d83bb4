//! Command-line entry point: tesselate images into thermal-printer strips
//! and print strip folders with tear-off pacing.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use strip_pipeline::config::{DitherMode, FeedDirection, FitMode, RenderConfig, din_size_mm};
use strip_printer::sequencer::{self, ConsoleAck, PrintJob};
use strip_printer::transport::StripTransport;
use strip_printer::{SpoolerQueue, UsbPrinter, spooler};

#[derive(Parser, Debug)]
#[command(name = "tessella")]
#[command(about = "Tesselate images into strips for thermal/art printing")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tesselate a source image into printable strips
    Tesselate {
        /// Source image file or HTTP(S) URL
        source: String,

        /// Folder the strip files are written into
        #[arg(long, default_value = "tesselated_strips")]
        output_folder: PathBuf,

        /// DIN paper size (A0..A6)
        #[arg(long)]
        din: Option<String>,

        /// Custom width in centimeters (requires --height-cm)
        #[arg(long)]
        width_cm: Option<f64>,

        /// Custom height in centimeters (requires --width-cm)
        #[arg(long)]
        height_cm: Option<f64>,

        /// Printer dot density in dots per millimeter
        #[arg(long, default_value_t = 8)]
        dots_per_mm: u32,

        /// Maximum strip length in millimeters
        #[arg(long, default_value_t = 60.0)]
        strip_mm: f64,

        /// Geometry fit mode: fill, stretch, or fit
        #[arg(long, default_value = "fit")]
        mode: String,

        /// Dithering: floyd, halftone, or none
        #[arg(long, default_value = "floyd")]
        dither_mode: String,

        /// Halftone cell edge length in pixels
        #[arg(long, default_value_t = 8)]
        halftone_cell_size: u32,

        /// Invert the image before binarization
        #[arg(long)]
        invert: bool,

        /// Strip direction: vertical or horizontal
        #[arg(long, default_value = "vertical")]
        direction: String,
    },

    /// Print all image strips in a folder, pausing for tear-off in between
    Print {
        /// Folder of strips to print
        folder: PathBuf,

        /// Printer queue name for the spooler fallback
        #[arg(long, default_value = spooler::DEFAULT_QUEUE)]
        printer_name: String,

        /// USB vendor id (decimal or 0x-prefixed hex)
        #[arg(long, default_value = "0x04b8", value_parser = parse_usb_id)]
        vendor_id: u16,

        /// USB product id (decimal or 0x-prefixed hex)
        #[arg(long, default_value = "0x0202", value_parser = parse_usb_id)]
        product_id: u16,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Command::Tesselate {
            source,
            output_folder,
            din,
            width_cm,
            height_cm,
            dots_per_mm,
            strip_mm,
            mode,
            dither_mode,
            halftone_cell_size,
            invert,
            direction,
        } => {
            let (width_mm, height_mm) = resolve_size_mm(din.as_deref(), width_cm, height_cm)?;
            let config = RenderConfig::new()
                .with_size_mm(width_mm, height_mm)
                .with_dots_per_mm(dots_per_mm)
                .with_strip_mm(strip_mm)
                .with_fit_mode(parse_fit_mode(&mode)?)
                .with_dither_mode(parse_dither_mode(&dither_mode)?)
                .with_halftone_cell_size(halftone_cell_size)
                .with_invert(invert)
                .with_direction(parse_direction(&direction)?);

            let files = strip_pipeline::tesselate(&source, &output_folder, &config)
                .context("tesselation failed")?;
            println!(
                "Wrote {} strips to {}",
                files.len(),
                output_folder.display()
            );
        }

        Command::Print {
            folder,
            printer_name,
            vendor_id,
            product_id,
        } => {
            tracing::info!(folder = %folder.display(), "Starting print run");
            let job = PrintJob::scan(&folder)
                .with_context(|| format!("cannot read strip folder {}", folder.display()))?;
            let mut transports: Vec<Box<dyn StripTransport>> = vec![
                Box::new(UsbPrinter::new(vendor_id, product_id)),
                Box::new(SpoolerQueue::new(printer_name)),
            ];
            let mut ack = ConsoleAck;
            sequencer::run(&job, &mut transports, &mut ack);
        }
    }

    Ok(())
}

/// Resolve the physical target size: an explicit centimeter pair wins,
/// then a DIN name, then the A4 default.
fn resolve_size_mm(
    din: Option<&str>,
    width_cm: Option<f64>,
    height_cm: Option<f64>,
) -> anyhow::Result<(f64, f64)> {
    match (width_cm, height_cm) {
        (Some(w), Some(h)) => Ok((w * 10.0, h * 10.0)),
        (Some(_), None) | (None, Some(_)) => {
            bail!("--width-cm and --height-cm must be given together")
        }
        (None, None) => match din {
            Some(name) => {
                din_size_mm(name).ok_or_else(|| anyhow::anyhow!("unknown DIN size: {name}"))
            }
            // A4 default
            None => Ok((210.0, 297.0)),
        },
    }
}

fn parse_fit_mode(value: &str) -> anyhow::Result<FitMode> {
    match value.to_ascii_lowercase().as_str() {
        "fill" => Ok(FitMode::Fill),
        "stretch" => Ok(FitMode::Stretch),
        "fit" => Ok(FitMode::Fit),
        _ => bail!("invalid fit mode: {value}. Use: fill, stretch, fit"),
    }
}

fn parse_dither_mode(value: &str) -> anyhow::Result<DitherMode> {
    match value.to_ascii_lowercase().as_str() {
        "floyd" => Ok(DitherMode::Floyd),
        "halftone" => Ok(DitherMode::Halftone),
        "none" => Ok(DitherMode::None),
        _ => bail!("invalid dither mode: {value}. Use: floyd, halftone, none"),
    }
}

fn parse_direction(value: &str) -> anyhow::Result<FeedDirection> {
    match value.to_ascii_lowercase().as_str() {
        "vertical" => Ok(FeedDirection::Vertical),
        "horizontal" => Ok(FeedDirection::Horizontal),
        _ => bail!("invalid direction: {value}. Use: vertical, horizontal"),
    }
}

/// Parse a USB id given as decimal or with a `0x` hex prefix.
fn parse_usb_id(value: &str) -> Result<u16, String> {
    let parsed = if let Some(hex) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        u16::from_str_radix(hex, 16)
    } else {
        value.parse()
    };
    parsed.map_err(|_| format!("invalid USB id: {value}"))
}
