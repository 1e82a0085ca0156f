//! SeaORM entities for the papeletas back-office plus the field rules the
//! service layer applies before anything reaches the database.

pub mod errors;
pub mod db;
pub mod rules;
pub mod user;
pub mod leave_slip;
