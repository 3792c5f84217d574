use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init() {
    init_with_default("info");
}

/// Like [`init`], but with a different filter when `RUST_LOG` is unset.
pub fn init_with_default(directives: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}
