// ABOUTME: User-facing output sink with an informational and a fatal channel.
// ABOUTME: The console implementation prints; diagnostics go through tracing separately.

use std::io::Write;

/// Destination for user-facing output. Each call is one entry.
pub trait Logger: Send + Sync {
    /// Informational output, e.g. an exported document or a confirmation.
    fn log(&self, message: &str);

    /// A failure the user needs to see.
    fn fatal(&self, message: &str);
}

/// Prints `log` entries to stdout and `fatal` entries to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        let mut stdout = std::io::stdout().lock();
        // Serialized documents already end with a newline.
        let result = if message.ends_with('\n') {
            stdout.write_all(message.as_bytes())
        } else {
            writeln!(stdout, "{message}")
        };
        if let Err(e) = result.and_then(|_| stdout.flush()) {
            tracing::warn!("failed to write to stdout: {}", e);
        }
    }

    // Not mirrored through tracing: the subscriber also writes to stderr.
    fn fatal(&self, message: &str) {
        eprintln!("{message}");
    }
}
