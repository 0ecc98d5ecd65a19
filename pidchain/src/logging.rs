use anyhow::Result;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::filter::EnvFilter;

static INIT_GUARD: OnceLock<()> = OnceLock::new();

/// Install the global subscriber.
///
/// Diagnostics go to stderr, or to `log_file` when one is given, so stdout
/// only ever carries the chain. `RUST_LOG` takes precedence over the
/// default level picked from `verbose`.
pub fn initialize_logging(log_file: Option<&Path>, verbose: bool) -> Result<()> {
    if INIT_GUARD.set(()).is_err() {
        return Ok(());
    }

    let default_level = if verbose { "debug" } else { "warn" };
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let maybe_log_file = log_file.map(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
    });

    match maybe_log_file {
        Some(Ok(file)) => {
            let _ = tracing_subscriber::fmt()
                .with_writer(Mutex::new(file))
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .with_ansi(false)
                .with_env_filter(filter())
                .try_init();
        }
        Some(Err(e)) => {
            // Fall back to stderr but say why
            let _ = tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_env_filter(filter())
                .try_init();
            if let Some(path) = log_file {
                tracing::warn!("Cannot open log file {}: {}", path.display(), e);
            }
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_env_filter(filter())
                .try_init();
        }
    }

    Ok(())
}
