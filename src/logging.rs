use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process. Respects `RUST_LOG`; defaults to
/// `info`. Safe to call more than once (later calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init();

    tracing::debug!(target: "system", "logging initialized");
}
