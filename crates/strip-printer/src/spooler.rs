//! Host print-spooler fallback transport.
//!
//! Submits the strip file to a named queue via `lpr -P`. Used when the
//! direct USB transport fails.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::transport::StripTransport;
use crate::{PrinterError, Result};

/// Queue name used when none is configured.
pub const DEFAULT_QUEUE: &str = "_0_0_0_0";

/// Transport that hands strips to the host spooler.
#[derive(Debug, Clone)]
pub struct SpoolerQueue {
    queue: String,
}

impl SpoolerQueue {
    pub fn new(queue: impl Into<String>) -> Self {
        Self {
            queue: queue.into(),
        }
    }
}

impl Default for SpoolerQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE)
    }
}

impl StripTransport for SpoolerQueue {
    fn name(&self) -> &str {
        "spooler"
    }

    fn send(&mut self, strip: &Path) -> Result<()> {
        debug!(queue = %self.queue, strip = %strip.display(), "Submitting strip to spooler");
        let status = Command::new("lpr")
            .arg("-P")
            .arg(&self.queue)
            .arg(strip)
            .status()
            .map_err(PrinterError::SpoolerUnavailable)?;

        if status.success() {
            Ok(())
        } else {
            Err(PrinterError::SpoolerFailed(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_queue_name() {
        let spooler = SpoolerQueue::default();
        assert_eq!(spooler.queue, DEFAULT_QUEUE);
        assert_eq!(StripTransport::name(&spooler), "spooler");
    }
}
