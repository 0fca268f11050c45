//! Store Error Types
//!
//! This module defines error types for catalog persistence, covering
//! connection, lookup and write failures. Failures are surfaced to the
//! caller; the store never retries internally.

use std::path::PathBuf;
use thiserror::Error;

/// Catalog store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Referenced part does not exist
    #[error("Part not found: {id}")]
    PartNotFound { id: String },

    /// Referenced bhajan does not exist
    #[error("Bhajan not found: {id}")]
    BhajanNotFound { id: String },

    /// Optimistic concurrency check failed on a part save
    #[error("Revision conflict for part {part_id}: expected revision {expected}, found {actual}")]
    RevisionConflict {
        part_id: String,
        expected: i64,
        actual: i64,
    },

    /// Failed to open the embedded database
    #[error("Failed to open database at {path}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        source: surrealdb::Error,
    },

    /// SurrealDB operation error
    #[error("Database operation failed: {0}")]
    Backend(#[from] surrealdb::Error),

    /// Query execution error with context
    #[error("Query failed: {context}")]
    QueryFailed { context: String },

    /// Record (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Create a part not found error
    pub fn part_not_found(id: impl Into<String>) -> Self {
        Self::PartNotFound { id: id.into() }
    }

    /// Create a bhajan not found error
    pub fn bhajan_not_found(id: impl Into<String>) -> Self {
        Self::BhajanNotFound { id: id.into() }
    }

    /// Create a revision conflict error
    pub fn revision_conflict(part_id: impl Into<String>, expected: i64, actual: i64) -> Self {
        Self::RevisionConflict {
            part_id: part_id.into(),
            expected,
            actual,
        }
    }

    /// Create a query failed error with context
    pub fn query_failed(context: impl Into<String>) -> Self {
        Self::QueryFailed {
            context: context.into(),
        }
    }
}
