//! Logging setup.

use std::path::Path;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log file path: {0}")]
    Path(String),

    #[error("Failed to install subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Setup logging with the given level.
///
/// `RUST_LOG` overrides `level`. Console output goes to stderr so JSON
/// reports on stdout stay clean. When `file` is set, a plain-text copy is
/// appended there; keep the returned guard alive until exit so it flushes.
pub fn setup_logging(
    level: &str,
    json: bool,
    file: Option<&str>,
) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match file {
        Some(path) => {
            let path = Path::new(path);
            let name = path
                .file_name()
                .ok_or_else(|| LoggingError::Path(path.display().to_string()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));

            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(guard)
}
