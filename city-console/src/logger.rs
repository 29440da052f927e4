//! Logging setup
//!
//! `RUST_LOG` wins when set, then `LOG_LEVEL`, then the crate defaults.
//! With a log directory the output goes to a daily rolling file instead of
//! stderr.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor a level is given
pub const DEFAULT_FILTER: &str = "city_console=info,city_client=info";

/// Initialize the logger with optional level and file output
pub fn init_logger(log_level: Option<&str>, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match log_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        None => EnvFilter::new(DEFAULT_FILTER),
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if std::fs::create_dir_all(log_path).is_ok() {
            let file_appender = tracing_appender::rolling::daily(log_path, "city-console");
            subscriber.with_ansi(false).with_writer(file_appender).init();
            return;
        }
    }

    subscriber.with_writer(std::io::stderr).init();
}
