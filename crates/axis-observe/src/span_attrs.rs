//! Span field names recorded by the request pipeline.
//!
//! Field names in `tracing::info_span!` must be literals, so spans declare
//! these fields as `tracing::field::Empty` and record them through the
//! constants below.

/// Logical operation name (e.g. "chat", "history").
pub const OPERATION: &str = "operation";

pub const HTTP_METHOD: &str = "http.method";
pub const HTTP_ROUTE: &str = "http.route";

// --- Pipeline phases ---

/// [`STATUS_SUCCESS`] or [`STATUS_FAILED`].
pub const VALIDATION_STATUS: &str = "validation.status";
pub const VALIDATION_DURATION_MS: &str = "validation.duration_ms";

/// [`STATUS_SUCCESS`] or [`STATUS_FAILED`].
pub const HANDLER_STATUS: &str = "handler.status";
pub const HANDLER_DURATION_MS: &str = "handler.duration_ms";

pub const TOTAL_DURATION_MS: &str = "total.duration_ms";

// --- Failure reporting ---

/// Set to [`STATUS_ERROR`] when the request fails.
pub const OTEL_STATUS_CODE: &str = "otel.status_code";
pub const ERROR_MESSAGE: &str = "error.message";

// --- Values ---

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILED: &str = "failed";
pub const STATUS_ERROR: &str = "ERROR";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_status_values() {
        assert_eq!(STATUS_SUCCESS, "success");
        assert_eq!(STATUS_FAILED, "failed");
        assert_ne!(STATUS_FAILED, STATUS_ERROR);
    }
}
