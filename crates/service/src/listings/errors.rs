use thiserror::Error;

/// Business errors for listing workflows
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid status transition: {0}")]
    InvalidStatus(String),
    #[error("listing not found")]
    NotFound,
    #[error("not authorized for this listing operation")]
    Forbidden,
    #[error("repository error: {0}")]
    Repository(String),
}

impl ListingError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ListingError::Validation(_) => 2001,
            ListingError::InvalidStatus(_) => 2002,
            ListingError::NotFound => 2003,
            ListingError::Forbidden => 2004,
            ListingError::Repository(_) => 2200,
        }
    }
}
