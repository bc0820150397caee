//! Validation contract for bound request types.
//!
//! A request type is usable by the request pipeline when it implements
//! [`Validatable`]: check declarative constraints (via `validator`) and then
//! replace omitted optional fields with their defaults, so the handler never
//! sees an un-defaulted value.

use axis_types::chat::{ChatRequest, ModelsQuery};
use axis_types::error::{FieldError, HttpError};
use axis_types::pagination::HistoryQuery;
use axis_types::user::{LoginRequest, RegisterRequest};
use validator::{Validate, ValidationErrors};

/// Message of every validation failure raised by the pipeline.
pub const VALIDATION_FAILED: &str = "request validation failed";

/// Validate a bound request and fill in defaults.
pub trait Validatable {
    fn validate_request(&mut self) -> Result<(), HttpError>;
}

/// Run the derived `validator` checks and convert failures to the taxonomy.
pub fn check<T: Validate>(value: &T) -> Result<(), HttpError> {
    value
        .validate()
        .map_err(|errors| HttpError::validation(VALIDATION_FAILED, field_errors(&errors)))
}

/// Flatten `validator` errors into `{field, error}` pairs, sorted by field.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed '{}' check", err.code));
                FieldError::new(field.clone(), message)
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

impl Validatable for ChatRequest {
    fn validate_request(&mut self) -> Result<(), HttpError> {
        check(self)?;
        self.apply_defaults();
        Ok(())
    }
}

impl Validatable for HistoryQuery {
    fn validate_request(&mut self) -> Result<(), HttpError> {
        check(self)?;
        self.apply_defaults();
        Ok(())
    }
}

impl Validatable for ModelsQuery {
    fn validate_request(&mut self) -> Result<(), HttpError> {
        Ok(())
    }
}

impl Validatable for RegisterRequest {
    fn validate_request(&mut self) -> Result<(), HttpError> {
        check(self)
    }
}

impl Validatable for LoginRequest {
    fn validate_request(&mut self) -> Result<(), HttpError> {
        check(self)
    }
}

/// Requests with no fields (e.g. health probes routed through the pipeline).
impl Validatable for () {
    fn validate_request(&mut self) -> Result<(), HttpError> {
        Ok(())
    }
}
