//! Observability for chatgate: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;

pub use tracing_setup::{LogOptions, default_filter, init_tracing, shutdown_tracing};
