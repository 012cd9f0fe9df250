use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
}

impl ModelError {
    pub fn invalid(what: impl Into<String>) -> Self {
        Self::Validation(what.into())
    }
}
