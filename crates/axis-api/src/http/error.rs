//! Outermost error translation.
//!
//! Every failure leaving a handler, middleware, or router fallback becomes
//! an [`AppError`] and is rendered here as exactly one JSON envelope.

use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axis_types::error::{FieldError, HttpError, RepositoryError, ServiceError};
use tracing::error;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Already classified for clients.
    Http(HttpError),
    /// Storage failure awaiting classification.
    Repository(RepositoryError),
    /// Anything else. The message is logged, never returned.
    Internal(String),
}

impl From<HttpError> for AppError {
    fn from(e: HttpError) -> Self {
        AppError::Http(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Http(e) => AppError::Http(e),
            ServiceError::Repository(e) => AppError::Repository(e),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Http(e) => write!(f, "{e}"),
            AppError::Repository(e) => write!(f, "storage error: {e}"),
            AppError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl AppError {
    /// The envelope sent to the client.
    pub fn to_http_error(&self) -> HttpError {
        match self {
            AppError::Http(e) => e.clone(),
            AppError::Repository(e) => classify_storage(e),
            AppError::Internal(_) => HttpError::internal(),
        }
    }
}

/// Map a storage failure onto the client-facing taxonomy.
///
/// Constraint violations are the caller's fault; connectivity, timeouts,
/// and query failures are not and keep their cause server-side.
pub fn classify_storage(err: &RepositoryError) -> HttpError {
    match err {
        RepositoryError::Conflict {
            field: Some(field), ..
        } => HttpError::validation(
            format!("{field} already exists"),
            vec![FieldError::new(field.clone(), "already exists")],
        ),
        RepositoryError::Conflict { field: None, .. } => {
            HttpError::validation("resource already exists", Vec::new())
        }
        RepositoryError::Constraint(_) => {
            HttpError::validation("request violates a data constraint", Vec::new())
        }
        RepositoryError::NotFound => HttpError::not_found("resource not found"),
        RepositoryError::Connection
        | RepositoryError::Query(_)
        | RepositoryError::Timeout
        | RepositoryError::NoRowsAffected => HttpError::internal(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let envelope = self.to_http_error();
        let status =
            StatusCode::from_u16(envelope.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        error!(
            status = status.as_u16(),
            code = envelope.code(),
            error = %self,
            "request failed"
        );

        (status, Json(envelope)).into_response()
    }
}

/// Fallback for unmatched routes.
pub async fn route_not_found() -> AppError {
    HttpError::not_found("Route not found").into()
}

/// Fallback for a known route hit with an unsupported method.
pub async fn method_not_allowed() -> AppError {
    HttpError::method_not_allowed().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axis_types::error::ErrorKind;

    #[test]
    fn test_unique_violation_names_field() {
        let err = classify_storage(&RepositoryError::Conflict {
            field: Some("email".into()),
            detail: "UNIQUE constraint failed: users.email".into(),
        });
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.errors(), &[FieldError::new("email", "already exists")]);
    }

    #[test]
    fn test_constraint_is_validation() {
        let err = classify_storage(&RepositoryError::Constraint("FOREIGN KEY".into()));
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_infrastructure_failures_are_internal() {
        for err in [
            RepositoryError::Connection,
            RepositoryError::Timeout,
            RepositoryError::NoRowsAffected,
            RepositoryError::Query("syntax error".into()),
        ] {
            let http = classify_storage(&err);
            assert_eq!(http.kind(), ErrorKind::Internal);
            assert_eq!(http.message(), "Internal Server Error");
        }
    }

    #[test]
    fn test_not_found() {
        assert_eq!(classify_storage(&RepositoryError::NotFound).status(), 404);
    }

    #[test]
    fn test_internal_hides_message() {
        let response = AppError::Internal("db exploded".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_service_error_conversion() {
        let app: AppError = ServiceError::Repository(RepositoryError::Timeout).into();
        assert!(matches!(app, AppError::Repository(RepositoryError::Timeout)));
    }
}
