//! Logging configuration for the back office
//!
//! Structured logging setup with appropriate levels and formatting.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::Config;

/// Filter applied when `RUST_LOG` is not set
fn default_filter(level: &str) -> String {
    format!("autoescuela_crm={level},tower_http={level},axum::rejection=trace")
}

/// Initialize the application logging system
///
/// `RUST_LOG` wins over the configured level. Calling this twice is harmless.
pub fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.log_level)));

    let layer = if config.json_logs {
        json_layer().boxed()
    } else {
        console_layer().boxed()
    };

    let result = Registry::default().with(layer.with_filter(env_filter)).try_init();

    if result.is_ok() {
        tracing::info!("Logging system initialized");
    }
}

/// JSON logging layer for production
fn json_layer() -> impl Layer<Registry> {
    fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
}

/// Console logging layer for development
fn console_layer() -> impl Layer<Registry> {
    fmt::layer().with_target(false).compact().with_ansi(true)
}

/// Log application startup
pub fn log_startup() {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Autoescuela CRM starting up");
}

/// Log a record created or replaced through a form
pub fn log_record_saved(kind: &str, id: &str, created: bool) {
    tracing::info!(
        kind = %kind,
        id = %id,
        operation = if created { "create" } else { "update" },
        "Record saved"
    );
}

/// Log a record removed from its collection
pub fn log_record_deleted(kind: &str, id: &str) {
    tracing::info!(kind = %kind, id = %id, "Record deleted");
}

/// Log authentication event
pub fn log_authentication_event(event: &str, login: Option<&str>, success: bool) {
    if success {
        tracing::info!(event = %event, login = ?login, "Authentication successful");
    } else {
        tracing::warn!(event = %event, login = ?login, "Authentication failed");
    }
}

/// Log a completed write of the data file
pub fn log_persisted(operation: &str, duration_ms: u128) {
    tracing::debug!(operation = %operation, duration_ms = %duration_ms, "Data file written");
}
