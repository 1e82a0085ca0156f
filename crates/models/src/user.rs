use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, rules};

/// Back-office role. Stored as its snake_case label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full leave-slip CRUD.
    #[sea_orm(string_value = "hr")]
    Hr,
    /// Leave-slip reads only.
    #[sea_orm(string_value = "hr_readonly")]
    HrReadonly,
    /// User administration and dashboard.
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Hr => "hr",
            Role::HrReadonly => "hr_readonly",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub national_id: String,
    pub role: Role,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Unique index names, as created by the migrator.
pub const UQ_USERNAME: &str = "uq_users_username";
pub const UQ_NATIONAL_ID: &str = "uq_users_national_id";

pub fn validate_full_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::invalid("full_name", "is required"));
    }
    rules::length_between("full_name", name, 1, 100)
}

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    if username.trim().is_empty() {
        return Err(ModelError::invalid("username", "is required"));
    }
    if username.contains(':') {
        return Err(ModelError::invalid("username", "must not contain ':'"));
    }
    rules::length_between("username", username, 1, 50)
}

pub fn validate_national_id(national_id: &str) -> Result<(), ModelError> {
    rules::national_id("national_id", national_id)
}
