// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    /// One or more required selections were absent at add time
    #[error("Missing selection: {}", .0.join(", "))]
    MissingSelection(Vec<&'static str>),

    #[error("Clear cancelled: confirmation declined")]
    ConfirmationDeclined,

    /// Reference data fetch or insert failed
    #[error("Reference data provider error: {0}")]
    Provider(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by converting to AppError::Provider(String)

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_selection_lists_fields() {
        let err = AppError::MissingSelection(vec!["school", "count"]);
        assert_eq!(err.to_string(), "Missing selection: school, count");
    }

    #[test]
    fn test_domain_error_converts() {
        let err: AppError = crate::domain::DomainError::InvalidSelection("exam").into();
        assert!(matches!(err, AppError::Domain(_)));
        assert!(err.to_string().contains("exam"));
    }
}
