//! Structured logging setup
//!
//! Level comes from RUST_LOG (default: info). The TUI owns stdout, so it logs
//! to a file; the CLI tools log to stderr.

use anyhow::Context;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to the given file
    File(String),
    /// Drop everything (TUI without a configured log file)
    Discard,
}

impl LogTarget {
    pub fn from_option(file: Option<&str>) -> Self {
        match file {
            Some(path) => LogTarget::File(path.to_string()),
            None => LogTarget::Discard,
        }
    }
}

/// Install the global tracing subscriber
pub fn init_logging(target: &LogTarget, json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = match target {
        LogTarget::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        LogTarget::Discard => BoxMakeWriter::new(std::io::sink),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_ansi(matches!(target, LogTarget::Stderr))
        .with_writer(writer);

    let result = if json { builder.json().try_init() } else { builder.try_init() };
    result.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_target_from_option() {
        assert_eq!(LogTarget::from_option(None), LogTarget::Discard);
        assert_eq!(
            LogTarget::from_option(Some("form.log")),
            LogTarget::File("form.log".to_string())
        );
    }

    #[test]
    fn test_init_logging_rejects_unwritable_file() {
        let err = init_logging(&LogTarget::File("/nonexistent-dir/form.log".to_string()), false)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open log file"));
    }
}
