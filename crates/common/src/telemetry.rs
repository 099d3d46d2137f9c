//! Tracing subscriber setup
//!
//! The log sink is chosen explicitly from [`ObservabilityConfig`]; nothing is
//! initialised implicitly when the library is loaded.

use crate::config::ObservabilityConfig;
use crate::errors::{AppError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Log file name inside `log_dir`
pub const LOG_FILE_NAME: &str = "authormaps.log";

/// Keeps the non-blocking file writer flushing until dropped
pub struct TelemetryGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber: stderr always, JSON file when `log_dir` is set.
///
/// `RUST_LOG` takes precedence over `log_level`.
pub fn init(config: &ObservabilityConfig) -> Result<TelemetryGuard> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };

    let stderr_layer = if config.json_logging {
        fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(filter())
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(filter())
            .boxed()
    };

    let (file_layer, file_guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(filter())
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::Configuration {
            message: format!("Failed to install tracing subscriber: {}", e),
        })?;

    Ok(TelemetryGuard {
        _file_guard: file_guard,
    })
}
