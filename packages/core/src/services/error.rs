//! Service Error Types
//!
//! Errors returned by the catalog services and the reorder engine. Store
//! lookup failures are lifted into their service-level counterparts so API
//! layers can map them without inspecting storage internals.

use thiserror::Error;

use crate::db::StoreError;
use crate::models::ValidationError;

/// Catalog service errors
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Move instruction failed a precondition
    #[error("Invalid move instruction: {reason}")]
    InvalidInstruction { reason: String },

    /// Referenced part does not exist
    #[error("Part not found: {id}")]
    PartNotFound { id: String },

    /// Referenced bhajan does not exist
    #[error("Bhajan not found: {id}")]
    BhajanNotFound { id: String },

    /// Payload failed field validation
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// A move kept losing revision races and exhausted its retries
    #[error("Could not commit move on part {part_id} after {attempts} attempts")]
    MoveContention { part_id: String, attempts: u32 },

    /// Underlying storage failure
    #[error("Storage error: {0}")]
    Storage(StoreError),
}

impl ServiceError {
    /// Create an invalid instruction error
    pub fn invalid_instruction(reason: impl Into<String>) -> Self {
        Self::InvalidInstruction {
            reason: reason.into(),
        }
    }

    /// Create a part not found error
    pub fn part_not_found(id: impl Into<String>) -> Self {
        Self::PartNotFound { id: id.into() }
    }

    /// Create a bhajan not found error
    pub fn bhajan_not_found(id: impl Into<String>) -> Self {
        Self::BhajanNotFound { id: id.into() }
    }
}

impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::PartNotFound { id } => Self::PartNotFound { id },
            StoreError::BhajanNotFound { id } => Self::BhajanNotFound { id },
            other => Self::Storage(other),
        }
    }
}
