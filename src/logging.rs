use tracing_subscriber::{fmt, EnvFilter};

/// Installs a stderr subscriber filtered by `RUST_LOG`, then `LOG_LEVEL`,
/// then `default_level`.
///
/// Only binaries should call this; the library never installs a subscriber.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("RUST_LOG")
        .or_else(|_| EnvFilter::try_from_env("LOG_LEVEL"))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
