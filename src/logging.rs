use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Initialise logging. The level is `info` unless `debug` is set, in which
/// case `RUST_LOG` may override the `debug` default. With `log_file` the output
/// goes to that file instead of stdout. Calling this twice keeps the first
/// subscriber.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    // Without debug logging we ignore RUST_LOG so a stray variable in the
    // user's environment cannot turn on verbose output.
    let level = if debug { "debug" } else { "info" };
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let file = log_file.and_then(|path| {
        let dir = path.parent().map(PathBuf::from).unwrap_or_default();
        let name = path.file_name()?.to_string_lossy().into_owned();
        RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(name)
            .build(dir)
            .map_err(|e| eprintln!("failed to open log file {}: {e}", path.display()))
            .ok()
    });

    let _ = match file {
        Some(appender) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(appender)
            .try_init(),
        None => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };
}
