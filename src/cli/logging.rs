//! Logging initialization

/// Filter used when `--debug` is given and RUST_LOG is unset
pub fn default_filter(debug: bool) -> &'static str {
    if debug { "debug" } else { "warn" }
}

/// Initialize logging to stderr so stdout carries only the report
///
/// RUST_LOG takes precedence over the `--debug` flag.
pub fn init_logging(debug: bool) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter(debug))),
        )
        .with_target(debug)
        .init();

    if debug {
        tracing::debug!("Debug logging enabled");
    }
}
