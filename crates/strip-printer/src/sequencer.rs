//! Print sequencing: walk a folder of strip files in sorted order, dispatch
//! each through an ordered transport list, and pace the run with manual
//! tear-off acknowledgments between strips.
//!
//! Printing is best-effort once started: a strip for which every transport
//! fails is logged and skipped, never aborting the run, since strips
//! already dispensed cannot be un-printed.

use std::ffi::OsStr;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::Result;
use crate::transport::StripTransport;

/// Filename extensions recognized as printable strips (case-insensitive).
const STRIP_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Operator acknowledgment between strips, modeling the physical tear-off
/// on continuous paper. Injected so pacing is testable without console I/O.
pub trait TearOffAck {
    /// Block until the operator confirms strip `printed` of `total` has
    /// been torn off.
    fn wait(&mut self, printed: usize, total: usize);
}

/// Acknowledgment source that blocks on a console line read.
#[derive(Debug, Default)]
pub struct ConsoleAck;

impl TearOffAck for ConsoleAck {
    fn wait(&mut self, printed: usize, total: usize) {
        println!("Tear off strip {printed}/{total} and press Enter to print the next one...");
        let mut line = String::new();
        let _ = std::io::stdin().lock().read_line(&mut line);
    }
}

/// An ordered print job built from a directory listing at print time.
///
/// The strip folder is the sole handoff artifact between tesselation and
/// printing: whatever matching files exist there, sorted by name, is the
/// job, independent of any in-memory tesselation result.
#[derive(Debug)]
pub struct PrintJob {
    strips: Vec<PathBuf>,
}

impl PrintJob {
    /// Scan `folder` for strip files, sorted lexicographically.
    pub fn scan(folder: &Path) -> Result<Self> {
        let mut strips: Vec<PathBuf> = std::fs::read_dir(folder)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_strip_file(path))
            .collect();
        strips.sort();

        debug!(folder = %folder.display(), count = strips.len(), "Scanned strip folder");
        Ok(Self { strips })
    }

    pub fn len(&self) -> usize {
        self.strips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strips.is_empty()
    }

    pub fn strips(&self) -> &[PathBuf] {
        &self.strips
    }
}

fn is_strip_file(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| {
            STRIP_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Print every strip of `job` in order.
///
/// Transports are tried strictly in sequence per strip; the first success
/// wins. Between any two non-final strips the run blocks on `ack`. An
/// empty job reports and returns without touching any transport.
pub fn run(job: &PrintJob, transports: &mut [Box<dyn StripTransport>], ack: &mut dyn TearOffAck) {
    if job.is_empty() {
        info!("No strips found in the folder");
        return;
    }

    let total = job.len();
    info!(total, "Found strips, ready to print");

    for (idx, strip) in job.strips().iter().enumerate() {
        info!(n = idx + 1, total, strip = %strip.display(), "Printing strip");
        dispatch(strip, transports);

        if idx + 1 < total {
            ack.wait(idx + 1, total);
        }
    }
}

/// Try each transport in order; skip the strip if all fail.
fn dispatch(strip: &Path, transports: &mut [Box<dyn StripTransport>]) {
    for transport in transports.iter_mut() {
        match transport.send(strip) {
            Ok(()) => {
                debug!(transport = transport.name(), "Strip dispatched");
                return;
            }
            Err(err) => {
                warn!(
                    transport = transport.name(),
                    error = %err,
                    "Transport failed, trying next"
                );
            }
        }
    }
    error!(strip = %strip.display(), "All transports failed, skipping strip");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrinterError;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Transport that always fails, counting attempts.
    struct FailingTransport {
        calls: Rc<RefCell<usize>>,
    }

    impl StripTransport for FailingTransport {
        fn name(&self) -> &str {
            "failing"
        }

        fn send(&mut self, _strip: &Path) -> Result<()> {
            *self.calls.borrow_mut() += 1;
            Err(PrinterError::DeviceUnavailable {
                vendor_id: 0,
                product_id: 0,
            })
        }
    }

    /// Transport that always succeeds, recording the strips it saw.
    struct RecordingTransport {
        sent: Rc<RefCell<Vec<PathBuf>>>,
    }

    impl StripTransport for RecordingTransport {
        fn name(&self) -> &str {
            "recording"
        }

        fn send(&mut self, strip: &Path) -> Result<()> {
            self.sent.borrow_mut().push(strip.to_path_buf());
            Ok(())
        }
    }

    /// Acknowledgment source that counts waits instead of blocking.
    struct CountingAck {
        waits: usize,
    }

    impl TearOffAck for CountingAck {
        fn wait(&mut self, _printed: usize, _total: usize) {
            self.waits += 1;
        }
    }

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"strip").unwrap();
    }

    #[test]
    fn test_scan_filters_and_sorts_by_name() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "vstrip_02.png");
        touch(dir.path(), "vstrip_01.png");
        touch(dir.path(), "vstrip_03.JPG");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "preview.bmp");

        let job = PrintJob::scan(dir.path()).unwrap();
        let names: Vec<_> = job
            .strips()
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["vstrip_01.png", "vstrip_02.png", "vstrip_03.JPG"]);
    }

    #[test]
    fn test_fallback_used_for_every_strip_with_failing_primary() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "vstrip_01.png");
        touch(dir.path(), "vstrip_02.png");
        touch(dir.path(), "vstrip_03.png");

        let primary_calls = Rc::new(RefCell::new(0));
        let fallback_sent = Rc::new(RefCell::new(Vec::new()));
        let mut transports: Vec<Box<dyn StripTransport>> = vec![
            Box::new(FailingTransport {
                calls: primary_calls.clone(),
            }),
            Box::new(RecordingTransport {
                sent: fallback_sent.clone(),
            }),
        ];
        let mut ack = CountingAck { waits: 0 };

        let job = PrintJob::scan(dir.path()).unwrap();
        run(&job, &mut transports, &mut ack);

        // Primary tried and fallback invoked once per strip
        assert_eq!(*primary_calls.borrow(), 3);
        assert_eq!(fallback_sent.borrow().len(), 3);
        // Tear-off wait after strips 1 and 2, not after the last
        assert_eq!(ack.waits, 2);
    }

    #[test]
    fn test_successful_primary_skips_fallback() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "vstrip_01.png");
        touch(dir.path(), "vstrip_02.png");

        let primary_sent = Rc::new(RefCell::new(Vec::new()));
        let fallback_calls = Rc::new(RefCell::new(0));
        let mut transports: Vec<Box<dyn StripTransport>> = vec![
            Box::new(RecordingTransport {
                sent: primary_sent.clone(),
            }),
            Box::new(FailingTransport {
                calls: fallback_calls.clone(),
            }),
        ];
        let mut ack = CountingAck { waits: 0 };

        let job = PrintJob::scan(dir.path()).unwrap();
        run(&job, &mut transports, &mut ack);

        assert_eq!(primary_sent.borrow().len(), 2);
        assert_eq!(*fallback_calls.borrow(), 0);
        assert_eq!(ack.waits, 1);
    }

    #[test]
    fn test_all_transports_failing_still_completes_run() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "vstrip_01.png");
        touch(dir.path(), "vstrip_02.png");

        let calls = Rc::new(RefCell::new(0));
        let mut transports: Vec<Box<dyn StripTransport>> = vec![Box::new(FailingTransport {
            calls: calls.clone(),
        })];
        let mut ack = CountingAck { waits: 0 };

        let job = PrintJob::scan(dir.path()).unwrap();
        run(&job, &mut transports, &mut ack);

        // Both strips attempted, both skipped, run finished with pacing intact
        assert_eq!(*calls.borrow(), 2);
        assert_eq!(ack.waits, 1);
    }

    #[test]
    fn test_empty_folder_makes_no_transport_calls() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "readme.md");

        let calls = Rc::new(RefCell::new(0));
        let mut transports: Vec<Box<dyn StripTransport>> = vec![Box::new(FailingTransport {
            calls: calls.clone(),
        })];
        let mut ack = CountingAck { waits: 0 };

        let job = PrintJob::scan(dir.path()).unwrap();
        run(&job, &mut transports, &mut ack);

        assert!(job.is_empty());
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(ack.waits, 0);
    }

    #[test]
    fn test_single_strip_has_no_tear_off_wait() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "vstrip_01.png");

        let sent = Rc::new(RefCell::new(Vec::new()));
        let mut transports: Vec<Box<dyn StripTransport>> =
            vec![Box::new(RecordingTransport { sent: sent.clone() })];
        let mut ack = CountingAck { waits: 0 };

        let job = PrintJob::scan(dir.path()).unwrap();
        run(&job, &mut transports, &mut ack);

        assert_eq!(sent.borrow().len(), 1);
        assert_eq!(ack.waits, 0);
    }

    #[test]
    fn test_scan_missing_folder_is_io_error() {
        let err = PrintJob::scan(Path::new("/nonexistent/strips")).unwrap_err();
        assert!(matches!(err, PrinterError::Io(_)));
    }
}
