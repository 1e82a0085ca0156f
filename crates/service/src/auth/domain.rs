use models::user::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::users::domain::User;

pub const SEPARATOR: char = ':';

/// Username and national id bundled into one bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub national_id: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, national_id: impl Into<String>) -> Self {
        Self { username: username.into(), national_id: national_id.into() }
    }

    /// Split a token on the first separator. Usernames never contain it.
    pub fn parse(token: &str) -> Result<Self, ServiceError> {
        let (username, national_id) = token
            .trim()
            .split_once(SEPARATOR)
            .ok_or_else(|| ServiceError::Unauthenticated("malformed credential".into()))?;
        if username.is_empty() || national_id.is_empty() {
            return Err(ServiceError::Unauthenticated("malformed credential".into()));
        }
        Ok(Self::new(username, national_id))
    }

    pub fn token(&self) -> String { format!("{}{}{}", self.username, SEPARATOR, self.national_id) }
}

/// Resolved identity of the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub user_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub role: Role,
}

impl From<User> for Caller {
    fn from(u: User) -> Self {
        Self { user_id: u.id, username: u.username, full_name: u.full_name, role: u.role }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub national_id: String,
}

/// Login result. Bad credentials are a normal outcome with `success = false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginOutcome {
    pub success: bool,
    pub message: String,
    pub user: Option<User>,
    pub token: Option<String>,
}
