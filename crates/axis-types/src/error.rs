//! Error taxonomy shared by every layer.
//!
//! Every failure that reaches a client is an [`HttpError`]: a fixed kind with
//! a fixed HTTP status, an UPPER_SNAKE_CASE code, a client-facing message and
//! optional field-level detail. Storage errors travel as [`RepositoryError`]
//! until the outermost translation classifies them.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message carried by every internal error. Root causes are logged, never sent.
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

/// Sub-code for a chat request naming an alias that is not in the catalog.
pub const INVALID_MODEL_NAME: &str = "INVALID_MODEL_NAME";

/// Kind of client-facing failure. Each kind maps to exactly one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this kind.
    pub fn status(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::MethodNotAllowed => 405,
            ErrorKind::Internal => 500,
        }
    }

    /// Default machine-readable code: the status reason in UPPER_SNAKE_CASE.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Validation => "BAD_REQUEST",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ErrorKind::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single field that failed binding or validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub error: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            error: error.into(),
        }
    }
}

/// What the client should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Redirect,
    Reauthenticate,
    Retry,
}

/// Remediation hint attached to an error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub message: String,
    pub value: String,
}

/// A client-facing error and its serialized envelope.
///
/// Serializes as `{code, message, status, override, errors?, action?}`.
/// The retryable flag is advisory and stays server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{code}: {message}")]
pub struct HttpError {
    code: String,
    message: String,
    status: u16,
    #[serde(rename = "override")]
    override_message: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<Action>,
    #[serde(skip)]
    kind: ErrorKind,
    #[serde(skip)]
    retryable: bool,
}

impl HttpError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            code: kind.code().to_owned(),
            message: message.into(),
            status: kind.status(),
            override_message: false,
            errors: None,
            action: None,
            kind,
            retryable: matches!(kind, ErrorKind::Internal),
        }
    }

    /// 400 with per-field detail. An empty field list omits `errors`.
    pub fn validation(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        let mut err = Self::new(ErrorKind::Validation, message);
        if !errors.is_empty() {
            err.errors = Some(errors);
        }
        err
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// 404 with a domain sub-code such as [`INVALID_MODEL_NAME`].
    pub fn not_found_with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        let mut err = Self::new(ErrorKind::NotFound, message);
        err.code = code.into();
        err.override_message = true;
        err
    }

    pub fn method_not_allowed() -> Self {
        Self::new(ErrorKind::MethodNotAllowed, "Method not allowed")
    }

    /// 500 with the fixed generic message.
    pub fn internal() -> Self {
        Self::new(ErrorKind::Internal, INTERNAL_SERVER_ERROR_MESSAGE)
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Tell clients to show `message` verbatim instead of a generic text.
    pub fn with_override(mut self, override_message: bool) -> Self {
        self.override_message = override_message;
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn errors(&self) -> &[FieldError] {
        self.errors.as_deref().unwrap_or_default()
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    pub fn overrides_message(&self) -> bool {
        self.override_message
    }
}

/// Errors from repository operations (used by trait definitions in axis-core).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    /// Unique constraint violated. `field` names the column when known.
    #[error("conflict: {detail}")]
    Conflict { field: Option<String>, detail: String },

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("storage operation timed out")]
    Timeout,

    #[error("no rows affected")]
    NoRowsAffected,
}

/// Errors from password hashing.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Errors from issuing or verifying access tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Error returned by core services: either already classified for clients,
/// or a storage error awaiting classification at the boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_kind_has_one_status() {
        let cases = [
            (HttpError::validation("bad", vec![]), 400, "BAD_REQUEST"),
            (HttpError::unauthorized("who"), 401, "UNAUTHORIZED"),
            (HttpError::forbidden("no"), 403, "FORBIDDEN"),
            (HttpError::not_found("gone"), 404, "NOT_FOUND"),
            (HttpError::method_not_allowed(), 405, "METHOD_NOT_ALLOWED"),
            (HttpError::internal(), 500, "INTERNAL_SERVER_ERROR"),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status(), status);
            assert_eq!(err.status(), err.kind().status());
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn test_only_internal_is_retryable() {
        assert!(HttpError::internal().is_retryable());
        assert!(!HttpError::unauthorized("x").is_retryable());
        assert!(!HttpError::not_found_with_code("x", INVALID_MODEL_NAME).is_retryable());
    }

    #[test]
    fn test_internal_message_is_fixed() {
        assert_eq!(HttpError::internal().message(), "Internal Server Error");
    }

    #[test]
    fn test_envelope_serialization() {
        let err = HttpError::validation(
            "validation failed",
            vec![FieldError::new("message", "message is required")],
        );
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "BAD_REQUEST");
        assert_eq!(json["status"], 400);
        assert_eq!(json["override"], false);
        assert_eq!(json["errors"][0]["field"], "message");
        assert!(json.get("action").is_none());
        assert!(json.get("retryable").is_none());
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_empty_field_list_omits_errors() {
        let json = serde_json::to_value(HttpError::validation("bad", vec![])).unwrap();
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_sub_code_keeps_not_found_status() {
        let err = HttpError::not_found_with_code("no such model found: gpt-9", INVALID_MODEL_NAME);
        assert_eq!(err.status(), 404);
        assert_eq!(err.code(), "INVALID_MODEL_NAME");
        assert!(err.overrides_message());
    }

    #[test]
    fn test_action_serializes_type_key() {
        let err = HttpError::forbidden("expired").with_action(Action {
            action_type: ActionType::Reauthenticate,
            message: "sign in again".into(),
            value: "/api/v1/auth/login".into(),
        });
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["action"]["type"], "reauthenticate");
        assert_eq!(json["action"]["value"], "/api/v1/auth/login");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
