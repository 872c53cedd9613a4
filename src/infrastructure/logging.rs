use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// Events go to `file` because the terminal is owned by the UI. `RUST_LOG`
/// takes precedence over `level` when set. Returns `false` when a subscriber
/// was already installed, in which case the existing one keeps receiving
/// events.
pub fn init_logging(level: &str, file: &Path) -> std::io::Result<bool> {
    let writer = OpenOptions::new().create(true).append(true).open(file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(writer))
        .try_init();

    match result {
        Ok(()) => Ok(true),
        Err(error) => {
            warn!(%error, path = %file.display(), "tracing subscriber already installed; log file not attached");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_existing_subscriber() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.log");
        let second = dir.path().join("second.log");

        let _ = init_logging("debug", &first).unwrap();

        assert!(!init_logging("debug", &second).unwrap());
        assert!(second.exists());
    }
}
