//! Bhajan Data Structures
//!
//! This module defines the `Bhajan` struct and related types. A bhajan is the
//! opaque content unit of the catalog: the reorder machinery only ever touches
//! its identifier, everything else is display payload.
//!
//! # Examples
//!
//! ```rust
//! use bhajanmala_core::models::Bhajan;
//!
//! let bhajan = Bhajan::new(
//!     "Shri Ram Stuti",
//!     "Aarti",
//!     "<p>Shri Ramchandra kripalu bhajman...</p>",
//!     Some("Evening aarti".to_string()),
//!     None,
//!     1,
//! );
//! assert_eq!(bhajan.language, "Hindi");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Language assigned to bhajans created without an explicit one
pub const DEFAULT_LANGUAGE: &str = "Hindi";

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Validation errors for catalog entities
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// A devotional song in the catalog.
///
/// # Fields
///
/// - `id`: Unique identifier (UUID string)
/// - `order`: Position within the bhajan's category on the flat catalog
///   listing. Assigned on creation (last in category + 1) and rewritten in
///   bulk by the flat catalog reorder operation.
///
/// Lyrics are stored as the rich-text HTML produced by the admin editor and
/// treated as opaque here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bhajan {
    /// Unique identifier (UUID)
    pub id: String,

    /// Display title
    pub title: String,

    /// Category used for grouping on the flat catalog listing
    pub category: String,

    /// Rich-text lyrics (opaque payload)
    pub lyrics: String,

    /// Optional short description
    pub description: Option<String>,

    /// Language of the lyrics
    #[serde(default = "default_language")]
    pub language: String,

    /// Position within the category on the flat catalog listing
    pub order: i64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub modified_at: DateTime<Utc>,
}

impl Bhajan {
    /// Create a new bhajan with a generated UUID and current timestamps.
    ///
    /// Title, category and lyrics are trimmed; `language` falls back to
    /// [`DEFAULT_LANGUAGE`] when not provided.
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        lyrics: impl Into<String>,
        description: Option<String>,
        language: Option<String>,
        order: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into().trim().to_string(),
            category: category.into().trim().to_string(),
            lyrics: lyrics.into().trim().to_string(),
            description,
            language: language.unwrap_or_else(default_language),
            order,
            created_at: now,
            modified_at: now,
        }
    }

    /// Validate required fields (title, category, lyrics must be non-empty)
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingField("category".to_string()));
        }
        if self.lyrics.trim().is_empty() {
            return Err(ValidationError::MissingField("lyrics".to_string()));
        }
        Ok(())
    }
}

/// Sparse update for a bhajan: only provided fields change.
///
/// Mirrors the PATCH body of the admin edit screen; `None` means "leave the
/// stored value alone".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BhajanUpdate {
    pub title: Option<String>,
    pub category: Option<String>,
    pub lyrics: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
}

impl BhajanUpdate {
    /// True when the update carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.lyrics.is_none()
            && self.description.is_none()
            && self.language.is_none()
    }
}

/// One entry of a bulk flat-catalog reorder: assign `order` to the bhajan `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAssignment {
    pub id: String,
    pub order: i64,
}
