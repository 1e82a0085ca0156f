//! Storage-port error type and the translation from SeaORM failures.

use sea_orm::{DatabaseTransaction, DbErr, SqlErr, TransactionTrait};
use thiserror::Error;
use tracing::warn;

/// Failure reported by a repository implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The engine rejected the write because a unique constraint on `field` was hit.
    #[error("unique constraint violated on {field}")]
    UniqueViolation { field: &'static str },
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Map a database error to a [`StoreError`]. `constraints` pairs unique index
/// names with the logical field they protect.
pub fn classify(err: DbErr, constraints: &[(&str, &'static str)]) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => StoreError::UniqueViolation {
            field: constraint_field(&msg, constraints),
        },
        _ => StoreError::Backend(err.to_string()),
    }
}

/// Find which constrained field a violation message refers to.
pub fn constraint_field(message: &str, constraints: &[(&str, &'static str)]) -> &'static str {
    constraints
        .iter()
        .find(|(name, _)| message.contains(name))
        .map(|(_, field)| *field)
        .or_else(|| match constraints {
            [(_, only)] => Some(*only),
            _ => None,
        })
        .unwrap_or("record")
}

pub(crate) fn backend(err: DbErr) -> StoreError { StoreError::Backend(err.to_string()) }

pub(crate) async fn begin<C: TransactionTrait>(db: &C) -> Result<DatabaseTransaction, StoreError> {
    db.begin().await.map_err(backend)
}

/// Roll back `txn` and classify the error that caused it.
pub(crate) async fn abort(txn: DatabaseTransaction, err: DbErr, constraints: &[(&str, &'static str)]) -> StoreError {
    if let Err(rb) = txn.rollback().await {
        warn!(error = %rb, "rollback failed");
    }
    classify(err, constraints)
}

/// Commit `txn`; a unique violation raised by deferred checks at commit time is
/// classified like any other.
pub(crate) async fn commit(txn: DatabaseTransaction, constraints: &[(&str, &'static str)]) -> Result<(), StoreError> {
    txn.commit().await.map_err(|e| classify(e, constraints))
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS: &[(&str, &str)] = &[("uq_users_username", "username"), ("uq_users_national_id", "national_id")];

    #[test]
    fn picks_field_from_constraint_name() {
        let msg = r#"duplicate key value violates unique constraint "uq_users_national_id""#;
        assert_eq!(constraint_field(msg, USERS), "national_id");
    }

    #[test]
    fn single_constraint_is_assumed() {
        assert_eq!(constraint_field("duplicate key", &[("uq_x", "employee_code")]), "employee_code");
    }

    #[test]
    fn unknown_constraint_falls_back() {
        assert_eq!(constraint_field("duplicate key", USERS), "record");
    }

    #[test]
    fn non_sql_errors_are_backend() {
        let e = classify(DbErr::Custom("boom".into()), USERS);
        assert!(matches!(e, StoreError::Backend(_)));
    }
}
