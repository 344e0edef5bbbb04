use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logs to stdout and to a daily rotating `logs/podium.log`.
///
/// `RUST_LOG` overrides the default filter, which is `info` for every
/// crate and `debug` for our own.
pub fn setup_logging() {
    let file_appender = tracing_appender::rolling::daily("logs", "podium.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_thread_ids(true)
        .with_target(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true);

    let default_filter = "info,podium=debug";

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    // The file writer stops flushing once the guard is dropped.
    std::mem::forget(guard);
}
