use std::io::{self, Write};

use indicatif::ProgressBar;
use tracing_subscriber::{EnvFilter, fmt::MakeWriter};

pub(crate) fn init(verbosity: u8, progress: ProgressBar) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    // Only fails when a global subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(ProgressAwareStderr { progress })
        .try_init();
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Hands out stderr writers that hide the progress bar while a log line is
/// written, so the two never interleave on the terminal.
struct ProgressAwareStderr {
    progress: ProgressBar,
}

impl<'a> MakeWriter<'a> for ProgressAwareStderr {
    type Writer = SuspendedLine;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendedLine {
            progress: self.progress.clone(),
            buffer: Vec::new(),
        }
    }
}

/// Buffers one formatted event and writes it on flush or drop.
struct SuspendedLine {
    progress: ProgressBar,
    buffer: Vec<u8>,
}

impl Write for SuspendedLine {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let buffer = std::mem::take(&mut self.buffer);
        self.progress
            .suspend(|| io::stderr().lock().write_all(&buffer))
    }
}

impl Drop for SuspendedLine {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
