use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "flexora=info";

/// Installs the global `fmt` subscriber. `RUST_LOG` overrides the default filter;
/// calling this more than once keeps the first subscriber.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
