//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Article id cannot be empty")]
    EmptyArticleId,

    #[error("Invalid language tag: {0:?}")]
    InvalidLanguage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::EmptyArticleId.to_string(),
            "Article id cannot be empty"
        );
        assert_eq!(
            DomainError::InvalidLanguage("e n".to_string()).to_string(),
            "Invalid language tag: \"e n\""
        );
    }
}
