//! Console and optional file logging for the `nest-fork` binary.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Create `dir` if needed and open a new log file named after the current
/// Unix time.
pub fn create_log_file(dir: &Path) -> anyhow::Result<(PathBuf, File)> {
    std::fs::create_dir_all(dir)?;
    let secs = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let path = dir.join(format!("nest-fork-{secs}.log"));
    let file = File::create(&path)?;
    Ok((path, file))
}

/// Install the global subscriber.
///
/// The console follows `RUST_LOG` and defaults to `info`. With `log_dir`,
/// every event at DEBUG and above is also written to a timestamped file in
/// that directory, whose path is returned.
pub fn init_logging(log_dir: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    let console = fmt::layer().with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );

    let (file_layer, path) = match log_dir {
        Some(dir) => {
            let (path, file) = create_log_file(dir)?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .with_filter(LevelFilter::DEBUG);
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();
    Ok(path)
}
