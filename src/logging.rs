use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g.
/// `FANCY_CLOCK_LOG=fancy_clock=debug`.
pub(crate) const LOG_ENV: &str = "FANCY_CLOCK_LOG";
const DEFAULT_FILTER: &str = "fancy_clock=info";

/// Resolve the filter directive. Unset or blank means the default.
pub(crate) fn filter_directive(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => DEFAULT_FILTER,
    }
}

/// Install the stderr subscriber. Call once, before the window opens.
pub(crate) fn init() {
    let raw = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(raw.as_deref());
    let (filter, rejected) = match EnvFilter::try_new(directive) {
        Ok(f) => (f, None),
        Err(e) => (EnvFilter::new(DEFAULT_FILTER), Some(e)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Some(e) = rejected {
        tracing::warn!("ignoring invalid {LOG_ENV}={directive:?}: {e}");
    }
}
