//! Observability for Axis: subscriber setup and shared span field names.

pub mod span_attrs;
pub mod tracing_setup;
