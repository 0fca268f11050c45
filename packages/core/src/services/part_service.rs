//! PartService - Part Lifecycle and Resolved Listings
//!
//! CRUD for parts plus the resolved listing the public site renders: every
//! part with its memberships joined to bhajan summaries, membership order
//! ascending. Also carries the seeding helper that chunks the whole catalog
//! into numbered parts.

use std::collections::HashMap;
use std::sync::Arc;

use crate::db::CatalogStore;
use crate::models::{BhajanSummary, Membership, Part, PartView, ValidationError};
use crate::services::ServiceError;

/// Part lifecycle operations
pub struct PartService {
    store: Arc<dyn CatalogStore>,
}

impl PartService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Create an empty part appended after the current last part
    pub async fn create_part(&self, title: &str) -> Result<Part, ServiceError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingField("title".to_string()).into());
        }

        let next_order = self
            .store
            .list_parts()
            .await?
            .last()
            .map(|p| p.order + 1)
            .unwrap_or(1);

        let part = self.store.create_part(Part::new(title, next_order)).await?;
        tracing::info!("✅ Created part '{}' at order {}", part.title, part.order);
        Ok(part)
    }

    /// Rename a part, leaving its memberships and order untouched
    pub async fn rename_part(&self, id: &str, title: &str) -> Result<Part, ServiceError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingField("title".to_string()).into());
        }

        let mut part = self
            .store
            .get_part(id)
            .await?
            .ok_or_else(|| ServiceError::part_not_found(id))?;
        part.title = title.to_string();
        Ok(self.store.save_part(part).await?)
    }

    /// Delete a part together with its membership list.
    ///
    /// The referenced bhajans themselves are not touched.
    pub async fn delete_part(&self, id: &str) -> Result<(), ServiceError> {
        if self.store.delete_part(id).await? {
            tracing::info!("✅ Deleted part {}", id);
            Ok(())
        } else {
            Err(ServiceError::part_not_found(id))
        }
    }

    /// All parts with memberships resolved to bhajan summaries.
    ///
    /// Bhajans are fetched in one batch across all parts. Memberships whose
    /// bhajan no longer exists are skipped with a warning, never an error.
    pub async fn list_parts_with_bhajans(&self) -> Result<Vec<PartView>, ServiceError> {
        let parts = self.store.list_parts().await?;

        let mut wanted: Vec<String> = Vec::new();
        for part in &parts {
            for membership in &part.bhajans {
                if !wanted.contains(&membership.bhajan_id) {
                    wanted.push(membership.bhajan_id.clone());
                }
            }
        }
        let by_id: HashMap<String, _> = self
            .store
            .get_bhajans_by_ids(&wanted)
            .await?
            .into_iter()
            .map(|b| (b.id.clone(), b))
            .collect();

        let views = parts
            .into_iter()
            .map(|part| {
                let bhajans = part
                    .ordered_memberships()
                    .into_iter()
                    .filter_map(|membership| match by_id.get(&membership.bhajan_id) {
                        Some(bhajan) => Some(BhajanSummary {
                            id: bhajan.id.clone(),
                            title: bhajan.title.clone(),
                            lyrics: bhajan.lyrics.clone(),
                            category: bhajan.category.clone(),
                            description: bhajan.description.clone(),
                            order: membership.order,
                        }),
                        None => {
                            tracing::warn!(
                                "Part {} references missing bhajan {}, skipping",
                                part.id,
                                membership.bhajan_id
                            );
                            None
                        }
                    })
                    .collect();
                PartView {
                    id: part.id,
                    title: part.title,
                    order: part.order,
                    bhajans,
                }
            })
            .collect();
        Ok(views)
    }

    /// Rebuild the part layout by chunking the whole catalog.
    ///
    /// Existing parts are removed, then the catalog (category plus order
    /// ascending) is split into runs of `chunk_size` bhajans, each becoming a
    /// part titled "भाग N" with contiguous 1-based memberships.
    pub async fn seed_parts(&self, chunk_size: usize) -> Result<Vec<Part>, ServiceError> {
        if chunk_size == 0 {
            return Err(ServiceError::invalid_instruction(
                "chunk size must be at least 1",
            ));
        }

        for part in self.store.list_parts().await? {
            self.store.delete_part(&part.id).await?;
        }

        let bhajans = self.store.list_bhajans().await?;
        let mut created = Vec::new();
        for (index, chunk) in bhajans.chunks(chunk_size).enumerate() {
            let number = index as i64 + 1;
            let mut part = Part::new(format!("भाग {number}"), number);
            part.bhajans = chunk
                .iter()
                .enumerate()
                .map(|(position, bhajan)| Membership {
                    bhajan_id: bhajan.id.clone(),
                    order: position as i64 + 1,
                })
                .collect();
            created.push(self.store.create_part(part).await?);
        }

        tracing::info!(
            "🚀 Seeded {} parts from {} bhajans",
            created.len(),
            bhajans.len()
        );
        Ok(created)
    }
}
