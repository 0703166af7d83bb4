//! Strip dispatch for continuous-feed thermal printers.
//!
//! Provides ESC/POS raster command encoding, a USB device transport with a
//! host-spooler fallback, and a sequencer that walks a folder of strip
//! files in order, pausing for manual tear-off between strips.

pub mod escpos;
pub mod sequencer;
pub mod spooler;
pub mod transport;
pub mod usb;

// Re-exports for convenience
pub use sequencer::{ConsoleAck, PrintJob, TearOffAck};
pub use spooler::SpoolerQueue;
pub use transport::StripTransport;
pub use usb::UsbPrinter;

/// Errors that can occur while dispatching a strip.
///
/// All of these are per-strip and recoverable: the sequencer falls through
/// to the next transport, or skips the strip and continues the run.
#[derive(Debug, thiserror::Error)]
pub enum PrinterError {
    #[error("No USB device {vendor_id:04x}:{product_id:04x} found")]
    DeviceUnavailable { vendor_id: u16, product_id: u16 },

    #[error("No bulk OUT endpoint on USB device")]
    MissingEndpoint,

    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),

    #[error("Spooler invocation failed: {0}")]
    SpoolerUnavailable(std::io::Error),

    #[error("Spooler rejected the job: {0}")]
    SpoolerFailed(std::process::ExitStatus),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for printer operations.
pub type Result<T> = std::result::Result<T, PrinterError>;
