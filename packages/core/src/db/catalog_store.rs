//! CatalogStore Trait - Database Abstraction Layer
//!
//! This module defines the `CatalogStore` trait that abstracts persistence
//! for parts and bhajans. The trait enables multiple backends (embedded
//! SurrealDB for the running service, an in-memory store for tests and
//! demos) without changing business logic in the services.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: All methods are async to support embedded and network
//!    backends alike.
//! 2. **Whole-document part saves**: A part's membership list is always
//!    replaced as a unit, never patched per membership, so a partially
//!    applied reorder can never be observed.
//! 3. **Revision checks**: Part saves carry the revision the caller loaded;
//!    a stale revision is rejected with [`StoreError::RevisionConflict`]
//!    rather than silently overwriting a concurrent move.
//! 4. **Combined writes**: Cross-part moves go through [`save_parts`], a
//!    single atomic multi-part replacement, so there is no window where one
//!    part committed and the other did not.
//!
//! [`save_parts`]: CatalogStore::save_parts

use crate::db::StoreError;
use crate::models::{Bhajan, BhajanUpdate, OrderAssignment, Part};
use async_trait::async_trait;

/// Abstraction layer for catalog persistence operations
///
/// Implementations must be `Send + Sync` to allow usage in async contexts
/// where futures may be moved between threads.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    //
    // PART OPERATIONS
    //

    /// Get a part by ID with its full membership list.
    ///
    /// The persisted array order of memberships is not guaranteed to match
    /// the `order` field; callers re-sort after load.
    ///
    /// Returns `Ok(None)` when the part does not exist (not an error).
    async fn get_part(&self, id: &str) -> Result<Option<Part>, StoreError>;

    /// All parts, sorted by part order ascending
    async fn list_parts(&self) -> Result<Vec<Part>, StoreError>;

    /// Create a new part
    async fn create_part(&self, part: Part) -> Result<Part, StoreError>;

    /// Persist a part, replacing its full membership list.
    ///
    /// The save is guarded by `part.revision`: when the stored revision
    /// differs the save fails with [`StoreError::RevisionConflict`] and
    /// nothing is written. On success the stored revision is bumped and the
    /// updated part returned.
    async fn save_part(&self, part: Part) -> Result<Part, StoreError>;

    /// Persist several parts in one atomic write.
    ///
    /// Either every part commits (each with its revision check passing) or
    /// none does. This is the commit path for cross-part moves.
    async fn save_parts(&self, parts: Vec<Part>) -> Result<Vec<Part>, StoreError>;

    /// Delete a part. Returns `false` when it did not exist.
    async fn delete_part(&self, id: &str) -> Result<bool, StoreError>;

    //
    // BHAJAN OPERATIONS
    //

    /// Get a bhajan by ID
    async fn get_bhajan(&self, id: &str) -> Result<Option<Bhajan>, StoreError>;

    /// All bhajans, sorted by category ascending then catalog order ascending
    async fn list_bhajans(&self) -> Result<Vec<Bhajan>, StoreError>;

    /// Resolve a list of IDs to bhajans, preserving the input order.
    ///
    /// IDs that do not resolve are skipped, not errors.
    async fn get_bhajans_by_ids(&self, ids: &[String]) -> Result<Vec<Bhajan>, StoreError>;

    /// Create a new bhajan
    async fn create_bhajan(&self, bhajan: Bhajan) -> Result<Bhajan, StoreError>;

    /// Apply a sparse update; only provided fields change.
    ///
    /// Fails with [`StoreError::BhajanNotFound`] when the ID does not
    /// resolve. Returns the updated bhajan.
    async fn update_bhajan(&self, id: &str, update: BhajanUpdate) -> Result<Bhajan, StoreError>;

    /// Delete a bhajan. Returns `false` when it did not exist.
    ///
    /// Memberships referencing the deleted bhajan are left in place and
    /// skipped at resolution time.
    async fn delete_bhajan(&self, id: &str) -> Result<bool, StoreError>;

    /// Highest catalog order in a category, or `None` when the category is
    /// empty. Used to append newly created bhajans.
    async fn max_bhajan_order(&self, category: &str) -> Result<Option<i64>, StoreError>;

    /// Bulk-assign catalog orders (flat catalog reorder).
    ///
    /// Unknown IDs are ignored, matching the fire-and-forget semantics of the
    /// admin reorder screen.
    async fn set_bhajan_orders(&self, assignments: Vec<OrderAssignment>) -> Result<(), StoreError>;
}
