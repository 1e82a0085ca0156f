use async_trait::async_trait;
use models::user::Role;

use super::domain::Caller;
use crate::errors::ServiceError;

/// Role requirement of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGate {
    Admin,
    /// `hr` only; read-only staff excluded.
    Hr,
    /// `hr` or `hr_readonly`.
    HrAny,
    AdminOrHr,
    /// Any of `hr`, `hr_readonly`, `admin`.
    AnyStaff,
}

impl RoleGate {
    pub fn allows(self, role: Role) -> bool {
        match self {
            RoleGate::Admin => role == Role::Admin,
            RoleGate::Hr => role == Role::Hr,
            RoleGate::HrAny => matches!(role, Role::Hr | Role::HrReadonly),
            RoleGate::AdminOrHr => matches!(role, Role::Admin | Role::Hr),
            RoleGate::AnyStaff => true,
        }
    }

    pub fn check(self, caller: &Caller) -> Result<(), ServiceError> {
        if self.allows(caller.role) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!("role {} may not perform this operation", caller.role)))
        }
    }
}

/// Turns a bearer token into a caller, or `Unauthenticated`.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Caller, ServiceError>;
}
