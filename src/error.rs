use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum GrowthModelError {
    /// Required fields absent or supplied values out of range. Every offending
    /// field is listed, not just the first.
    #[error("invalid growth model input (missing: [{}], invalid: [{}])", .missing.join(", "), .invalid.join(", "))]
    Validation {
        missing: Vec<String>,
        invalid: Vec<String>,
    },

    #[error("scenario {id} not found")]
    NotFound { id: Uuid },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, GrowthModelError>;
