use crate::config::LogConfig;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::{Mutex, Once};
use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

/// Builds the filter: `RUST_LOG` when set, the configured directive otherwise.
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs the global subscriber once, appending to `file`. The terminal
/// belongs to the wizard UI, so nothing is logged to stdout.
pub fn init_tracing(config: &LogConfig, file: &Path) -> io::Result<()> {
    if let Some(dir) = file.parent() {
        fs::create_dir_all(dir)?;
    }
    let writer = OpenOptions::new().create(true).append(true).open(file)?;
    let filter = env_filter(config);

    TRACING_INIT.call_once(|| {
        use tracing_subscriber::fmt;

        fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(writer))
            .with_ansi(false)
            .with_target(true)
            .init();
    });
    Ok(())
}
