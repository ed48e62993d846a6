//! Log setup shared by the binaries.

use tracing_subscriber::EnvFilter;

/// Install a compact stderr subscriber. `RUST_LOG` overrides `default_filter`.
///
/// Logs go to stderr so they never interleave with story text on stdout.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
