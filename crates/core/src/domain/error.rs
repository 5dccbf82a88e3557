// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    /// A queue item was requested without one of its required references
    #[error("Invalid selection: {0} is required")]
    InvalidSelection(&'static str),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
