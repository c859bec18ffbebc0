use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Initialize structured JSON logging on stderr.
///
/// `RUST_LOG` takes precedence when set. Otherwise quiet mode logs `warn`
/// and above, verbose mode logs `info` and above.
pub fn init_logging(quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(quiet)));

    let layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}

fn default_directive(quiet: bool) -> &'static str {
    if quiet { "warn" } else { "info" }
}
