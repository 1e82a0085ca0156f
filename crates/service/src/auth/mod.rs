//! Auth module: bearer credential parsing, caller resolution and role gates.
//!
//! The credential is the plaintext `username:national_id` pair. It carries no
//! signature or expiry; every request is resolved against the user store.

pub mod domain;
pub mod guard;
pub mod service;

pub use domain::{Caller, Credential};
pub use guard::{CredentialResolver, RoleGate};
pub use service::AuthService;
