//! Collects every failed field rule of a request instead of stopping at the first.

use models::errors::ModelError;

use crate::errors::{FieldError, ServiceError};

#[derive(Debug, Default)]
pub struct Violations(Vec<FieldError>);

impl Violations {
    pub fn new() -> Self { Self::default() }

    pub fn check(&mut self, outcome: Result<(), ModelError>) {
        match outcome {
            Ok(()) => {}
            Err(ModelError::Validation { field, message }) => self.0.push(FieldError { field, message }),
            Err(other) => self.0.push(FieldError { field: "record", message: other.to_string() }),
        }
    }

    /// Run `rule` only when the field is present.
    pub fn check_present<T: ?Sized>(&mut self, value: Option<&T>, rule: impl FnOnce(&T) -> Result<(), ModelError>) {
        if let Some(v) = value {
            self.check(rule(v));
        }
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn finish(self) -> Result<(), ServiceError> {
        if self.0.is_empty() { Ok(()) } else { Err(ServiceError::Validation(self.0)) }
    }
}
