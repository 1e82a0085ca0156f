//! Service layer for the papeletas back-office.
//! - Storage ports (repository traits) with SeaORM and in-memory implementations.
//! - Leave-slip and user administration rules, including uniqueness conflicts
//!   that are only discovered at commit time.
//! - Credential resolution and role gates consumed by the HTTP boundary.

pub mod errors;
pub mod store;
pub mod clock;
pub mod validation;
pub mod auth;
pub mod users;
pub mod leave_slips;
pub mod stats;
#[cfg(test)]
pub mod test_support;

pub use errors::{FieldError, ServiceError};
