//! Shared command-line plumbing for the `prepare_dataset` and `infer` binaries.

pub mod config;

/// Install the `tracing` subscriber (`RUST_LOG`, default `info`, written to
/// stderr) and load `.env`.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let _ = dotenv::dotenv();
}
