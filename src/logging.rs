//! Log setup shared by the binaries.
//!
//! Logs go to stderr so console and replay output on stdout stay clean.

use tracing_subscriber::EnvFilter;

/// Level used when neither `--log` nor `RUST_LOG` gives a usable filter.
pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter: explicit directives win over `RUST_LOG`, and anything
/// unparseable falls back to [`DEFAULT_FILTER`].
pub fn env_filter(directives: Option<&str>) -> EnvFilter {
    let parsed = match directives {
        Some(directives) => EnvFilter::try_new(directives).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    };
    parsed.unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global fmt subscriber.
pub fn init(directives: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(directives))
        .with_writer(std::io::stderr)
        .init();
}
