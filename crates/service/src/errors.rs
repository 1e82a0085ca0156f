use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// One failed field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict on {field}: {message}")]
    Conflict { field: &'static str, message: String },
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn conflict(field: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict { field, message: message.into() }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::Conflict { .. } => 1002,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Unauthenticated(_) => 1004,
            ServiceError::Forbidden(_) => 1005,
            ServiceError::InvariantViolation(_) => 1006,
            ServiceError::Internal(_) => 1200,
        }
    }

    /// Short machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation_failed",
            ServiceError::Conflict { .. } => "conflict",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Unauthenticated(_) => "unauthenticated",
            ServiceError::Forbidden(_) => "forbidden",
            ServiceError::InvariantViolation(_) => "invariant_violation",
            ServiceError::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation { field } => Self::conflict(field, format!("{field} already exists")),
            StoreError::Backend(msg) => Self::Internal(msg),
        }
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation { field, message } => Self::Validation(vec![FieldError { field, message }]),
            models::errors::ModelError::Db(msg) => Self::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_unique_violation_becomes_conflict() {
        let e: ServiceError = StoreError::UniqueViolation { field: "employee_code" }.into();
        match e {
            ServiceError::Conflict { field, .. } => assert_eq!(field, "employee_code"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn store_backend_becomes_internal() {
        let e: ServiceError = StoreError::Backend("connection reset".into()).into();
        assert_eq!(e.kind(), "internal");
        assert_eq!(e.code(), 1200);
    }
}
