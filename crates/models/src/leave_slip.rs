use chrono::{NaiveDate, NaiveTime};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, rules};

/// A papeleta: authorisation for an employee to leave and return during work hours.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leave_slips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employee_name: String,
    pub national_id: String,
    #[sea_orm(unique)]
    pub employee_code: String,
    pub area: String,
    pub position: String,
    pub reason: String,
    pub office_entity: String,
    #[sea_orm(column_type = "Text")]
    pub justification: String,
    pub date: Date,
    pub departure_time: Time,
    pub return_time: Option<Time>,
    pub regime: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const UQ_EMPLOYEE_CODE: &str = "uq_leave_slips_employee_code";

pub fn validate_employee_name(v: &str) -> Result<(), ModelError> { rules::length_between("employee_name", v, 2, 100) }

pub fn validate_national_id(v: &str) -> Result<(), ModelError> { rules::national_id("national_id", v) }

pub fn validate_employee_code(v: &str) -> Result<(), ModelError> {
    if v.trim().is_empty() {
        return Err(ModelError::invalid("employee_code", "is required"));
    }
    rules::length_between("employee_code", v, 1, 20)
}

pub fn validate_area(v: &str) -> Result<(), ModelError> { rules::length_between("area", v, 2, 100) }

pub fn validate_position(v: &str) -> Result<(), ModelError> { rules::length_between("position", v, 2, 100) }

pub fn validate_reason(v: &str) -> Result<(), ModelError> { rules::length_between("reason", v, 5, 200) }

pub fn validate_office_entity(v: &str) -> Result<(), ModelError> { rules::length_between("office_entity", v, 2, 100) }

pub fn validate_justification(v: &str) -> Result<(), ModelError> { rules::min_length("justification", v, 10) }

pub fn validate_regime(v: &str) -> Result<(), ModelError> { rules::length_between("regime", v, 2, 50) }

/// The slip date may be today or later, never earlier.
pub fn validate_date(date: NaiveDate, today: NaiveDate) -> Result<(), ModelError> {
    if date < today {
        return Err(ModelError::invalid("date", "must not be earlier than today"));
    }
    Ok(())
}

/// Return must be strictly after departure.
pub fn validate_return_time(departure: NaiveTime, return_time: NaiveTime) -> Result<(), ModelError> {
    if return_time <= departure {
        return Err(ModelError::invalid("return_time", "must be later than departure_time"));
    }
    Ok(())
}
