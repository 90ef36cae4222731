// src/logging.rs

use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Filter from `RUST_LOG`, falling back to `info`. A set `LOG_LEVEL` is added
/// on top as a global directive.
pub fn build_filter(rust_log: Option<&str>, log_level: Option<&str>) -> EnvFilter {
    let filter = rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    match log_level.and_then(|l| l.trim().parse::<Directive>().ok()) {
        Some(directive) => filter.add_directive(directive),
        None => filter,
    }
}

/// Install the stderr subscriber. Stdout stays free for the preview table.
pub fn init() {
    let rust_log = std::env::var("RUST_LOG").ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    fmt()
        .with_env_filter(build_filter(rust_log.as_deref(), log_level.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}
