use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;
use crate::error::{AppError, AppResult};

/// Installs the global subscriber.
///
/// The terminal front-end owns stdout/stderr while it runs, so log output only
/// goes to `logging.file`. Without a file the filter is still installed so
/// `tracing` macros stay cheap.
pub fn init_tracing(config: &LoggingConfig) -> AppResult<()> {
    let filter = build_filter(&config.filter);

    match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| {
                    AppError::io_with_context(
                        source,
                        format!("failed to open log file: {}", path.display()),
                    )
                })?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
                .map_err(|err| AppError::unsupported(format!("tracing already set: {err}")))
        }
        None => tracing_subscriber::registry()
            .with(filter)
            .try_init()
            .map_err(|err| AppError::unsupported(format!("tracing already set: {err}"))),
    }
}

fn build_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| configured_filter(configured))
}

fn configured_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_new(configured).unwrap_or_else(|_| EnvFilter::new("ncpr=info"))
}
