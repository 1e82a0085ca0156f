use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },
    #[error("database error: {0}")]
    Db(String),
}

impl ModelError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation { field, message: message.into() }
    }
}
