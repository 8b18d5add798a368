//! Logging integration for enumfields.
//!
//! Provides a helper for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings). The crates only emit events; an
//! application that already installs a subscriber does not need this.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level`. In debug mode a pretty,
/// human-readable format is used; otherwise a structured JSON format is used.
/// Installing a second subscriber is silently ignored.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a span covering the construction of one model field.
///
/// # Examples
///
/// ```
/// use enumfields_core::logging::field_span;
///
/// let span = field_span("color");
/// let _guard = span.enter();
/// tracing::debug!("building field");
/// ```
pub fn field_span(field_name: &str) -> tracing::Span {
    tracing::debug_span!("enum_field", name = field_name)
}
