//! BhajanService - Catalog CRUD
//!
//! Lifecycle operations for individual bhajans: creation with automatic
//! per-category ordering, sparse updates, deletion, the featured picks
//! lookup, and the flat catalog reorder used by the admin screen.

use std::sync::Arc;

use crate::db::CatalogStore;
use crate::models::{Bhajan, BhajanUpdate, OrderAssignment, ValidationError};
use crate::services::ServiceError;

/// Fields accepted when creating a bhajan
#[derive(Debug, Clone)]
pub struct CreateBhajanParams {
    pub title: String,
    pub category: String,
    pub lyrics: String,
    pub description: Option<String>,
    pub language: Option<String>,
}

/// Bhajan lifecycle operations
pub struct BhajanService {
    store: Arc<dyn CatalogStore>,
}

impl BhajanService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Create a bhajan appended at the end of its category
    pub async fn create_bhajan(&self, params: CreateBhajanParams) -> Result<Bhajan, ServiceError> {
        let next_order = self
            .store
            .max_bhajan_order(params.category.trim())
            .await?
            .map(|max| max + 1)
            .unwrap_or(1);

        let bhajan = Bhajan::new(
            params.title,
            params.category,
            params.lyrics,
            params.description,
            params.language,
            next_order,
        );
        bhajan.validate()?;

        let created = self.store.create_bhajan(bhajan).await?;
        tracing::info!(
            "✅ Created bhajan '{}' in {} at order {}",
            created.title,
            created.category,
            created.order
        );
        Ok(created)
    }

    pub async fn get_bhajan(&self, id: &str) -> Result<Bhajan, ServiceError> {
        self.store
            .get_bhajan(id)
            .await?
            .ok_or_else(|| ServiceError::bhajan_not_found(id))
    }

    /// Full catalog, category ascending then catalog order ascending
    pub async fn list_bhajans(&self) -> Result<Vec<Bhajan>, ServiceError> {
        Ok(self.store.list_bhajans().await?)
    }

    /// Apply a sparse update; absent fields keep their stored values.
    ///
    /// Provided-but-blank required fields are rejected rather than stored.
    pub async fn update_bhajan(
        &self,
        id: &str,
        update: BhajanUpdate,
    ) -> Result<Bhajan, ServiceError> {
        for (name, value) in [
            ("title", &update.title),
            ("category", &update.category),
            ("lyrics", &update.lyrics),
        ] {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(ValidationError::InvalidValue(name.to_string()).into());
                }
            }
        }

        if update.is_empty() {
            return self.get_bhajan(id).await;
        }
        Ok(self.store.update_bhajan(id, update).await?)
    }

    /// Delete a bhajan from the catalog.
    ///
    /// Part memberships pointing at it stay behind and are skipped when
    /// listings resolve them.
    pub async fn delete_bhajan(&self, id: &str) -> Result<(), ServiceError> {
        if self.store.delete_bhajan(id).await? {
            tracing::info!("✅ Deleted bhajan {}", id);
            Ok(())
        } else {
            Err(ServiceError::bhajan_not_found(id))
        }
    }

    /// Resolve the configured featured picks, input order preserved.
    ///
    /// Unresolvable IDs are dropped silently so a stale pick never breaks the
    /// home page.
    pub async fn featured(&self, ids: &[String]) -> Result<Vec<Bhajan>, ServiceError> {
        Ok(self.store.get_bhajans_by_ids(ids).await?)
    }

    /// Bulk-assign catalog orders (flat admin reorder); unknown IDs ignored
    pub async fn set_catalog_order(
        &self,
        assignments: Vec<OrderAssignment>,
    ) -> Result<(), ServiceError> {
        self.store.set_bhajan_orders(assignments).await?;
        tracing::info!("✅ Applied catalog reorder");
        Ok(())
    }
}
