//! Transport seam for strip dispatch.

use std::path::Path;

use crate::Result;

/// A strategy for getting one strip file onto paper.
///
/// The sequencer holds an ordered list of transports and tries them in
/// sequence per strip; the first success wins. Implementations must be
/// independently usable so the retry policy stays testable without real
/// hardware or a live spooler.
pub trait StripTransport {
    /// Short transport name for log output.
    fn name(&self) -> &str;

    /// Dispatch the strip at `strip` to this transport's sink.
    fn send(&mut self, strip: &Path) -> Result<()>;
}
