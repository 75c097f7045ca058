//! Console and file logging setup.
//!
//! A thin wrapper over `tracing-subscriber`: one call installs a global
//! subscriber writing human-readable events to stderr and a plain-text copy
//! to a per-run log file.

use std::{fs, io, path::Path};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{SegUtilError, SegUtilResult};

/// Installs the global logging subscriber.
///
/// Events are filtered through `RUST_LOG` (defaulting to `info`), printed to
/// stderr, and appended to `<log_dir>/<name>.log` through a non-blocking
/// writer. The returned guard must be held for the lifetime of the program;
/// dropping it flushes and closes the log file.
///
/// # Errors
///
/// Returns [`SegUtilError::LogSetupFailed`] if the log directory cannot be
/// created or a global subscriber is already installed.
pub fn init_logging(log_dir: impl AsRef<Path>, name: &str) -> SegUtilResult<WorkerGuard> {
    let log_dir = log_dir.as_ref();
    fs::create_dir_all(log_dir).map_err(|source| SegUtilError::LogSetupFailed {
        reason: format!(
            "failed to create log directory '{}': {source}",
            log_dir.display()
        ),
    })?;

    let file_appender = tracing_appender::rolling::never(log_dir, format!("{name}.log"));
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init()
        .map_err(|source| SegUtilError::LogSetupFailed {
            reason: source.to_string(),
        })?;

    Ok(guard)
}
