//! Tracing setup.
//!
//! Logs go to a daily rolling file under the logs directory and, on request,
//! to stderr. The filter comes from `NXB_LOG` (default `info`).

use std::path::PathBuf;

use nxb_core::{BrowserError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::paths::NxbPaths;

pub const LOG_ENV_VAR: &str = "NXB_LOG";
const LOG_FILE_PREFIX: &str = "nxb.log";

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory of the rolling log file; `None` disables file logging.
    pub dir: Option<PathBuf>,
    pub stderr: bool,
    /// Used when `NXB_LOG` is unset or invalid.
    pub default_directive: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: NxbPaths::logs_dir().ok(),
            stderr: false,
            default_directive: "info".to_string(),
        }
    }
}

impl LogConfig {
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(&self.default_directive))
    }
}

/// Installs the global subscriber.
///
/// Keep the returned guard alive for the whole run; dropping it flushes and
/// stops the file writer.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match &config.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .with_filter(config.filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stderr_layer = config.stderr.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(config.filter())
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| BrowserError::internal(format!("Failed to install logger: {e}")))?;

    Ok(guard)
}
