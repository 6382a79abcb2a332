use thiserror::Error;

/// Core error type with minimal dependencies
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
