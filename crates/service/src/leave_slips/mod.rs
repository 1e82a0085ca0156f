//! Leave slips (papeletas): domain, storage port, SeaORM adapter and service.

pub mod domain;
pub mod repository;
pub mod service;
pub mod validation;

pub mod repo {
    pub mod seaorm;
}

pub use service::LeaveSlipService;
