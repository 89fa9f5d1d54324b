/*!
 * Tracing
 * Subscriber setup and timed operation spans
 */

use std::time::Instant;
use tracing::{debug, info, span, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - VFS_TRACE_JSON: Enable JSON output (default: false)
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("VFS_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        debug!(json = use_json, "Tracing initialized");
    }
}

/// Span around one file operation, logging its duration when dropped
pub struct OperationSpan {
    span: Span,
    start: Instant,
    operation: &'static str,
}

impl OperationSpan {
    /// `target` should be a locator rendered without credentials
    pub fn new(operation: &'static str, target: &str) -> Self {
        let span = span!(
            Level::INFO,
            "operation",
            operation,
            target,
            items = tracing::field::Empty,
            error = tracing::field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
            operation,
        }
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }

    pub fn record_items(&self, count: usize) {
        self.span.record("items", count);
    }

    pub fn record_error(&self, error: &dyn std::fmt::Display) {
        self.span.record("error", tracing::field::display(error));
    }
}

impl Drop for OperationSpan {
    fn drop(&mut self) {
        let _entered = self.span.enter();
        info!(
            operation = self.operation,
            duration_ms = self.start.elapsed().as_millis() as u64,
            "Operation finished"
        );
    }
}

/// Helper to create an operation span
#[inline]
pub fn span_operation(operation: &'static str, target: &str) -> OperationSpan {
    OperationSpan::new(operation, target)
}
