use std::io::{self, Write};
use tokio::sync::broadcast;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber.
///
/// Formatted events go to stdout and, one line per message, to `lines` so
/// connected browsers can show them. Honours `RUST_LOG`, defaulting to
/// `info`.
///
/// ```no_run
/// use tokio::sync::broadcast;
///
/// let (lines, _rx) = broadcast::channel(100);
/// face::init_logging(lines).expect("logging");
/// ```
pub fn init_logging(lines: broadcast::Sender<String>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(move || LogTee {
            stdout: io::stdout(),
            lines: lines.clone(),
        })
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

struct LogTee {
    stdout: io::Stdout,
    lines: broadcast::Sender<String>,
}

impl Write for LogTee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.stdout.write(buf)?;
        let text = String::from_utf8_lossy(&buf[..n]);
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let _ = self.lines.send(line.to_string());
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}
