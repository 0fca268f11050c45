//! MemoryStore - In-Memory CatalogStore Implementation
//!
//! Keeps the whole catalog in two maps behind async read-write locks. Used by
//! the service and engine tests and handy for demos; semantics (revision
//! checks, atomic multi-part saves) match the SurrealDB backend exactly.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::db::{CatalogStore, StoreError};
use crate::models::{Bhajan, BhajanUpdate, OrderAssignment, Part};

/// In-memory catalog store
#[derive(Default)]
pub struct MemoryStore {
    parts: RwLock<HashMap<String, Part>>,
    bhajans: RwLock<HashMap<String, Bhajan>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revision check shared by single and multi part saves.
    ///
    /// Returns the stored part's revision error when stale, `Ok` otherwise.
    fn check_revision(stored: &HashMap<String, Part>, part: &Part) -> Result<(), StoreError> {
        match stored.get(&part.id) {
            None => Err(StoreError::part_not_found(&part.id)),
            Some(current) if current.revision != part.revision => Err(
                StoreError::revision_conflict(&part.id, part.revision, current.revision),
            ),
            Some(_) => Ok(()),
        }
    }

    fn committed(mut part: Part) -> Part {
        part.revision += 1;
        part.modified_at = Utc::now();
        part
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn get_part(&self, id: &str) -> Result<Option<Part>, StoreError> {
        Ok(self.parts.read().await.get(id).cloned())
    }

    async fn list_parts(&self) -> Result<Vec<Part>, StoreError> {
        let mut parts: Vec<Part> = self.parts.read().await.values().cloned().collect();
        parts.sort_by_key(|p| p.order);
        Ok(parts)
    }

    async fn create_part(&self, part: Part) -> Result<Part, StoreError> {
        self.parts
            .write()
            .await
            .insert(part.id.clone(), part.clone());
        Ok(part)
    }

    async fn save_part(&self, part: Part) -> Result<Part, StoreError> {
        let mut parts = self.parts.write().await;
        Self::check_revision(&parts, &part)?;
        let committed = Self::committed(part);
        parts.insert(committed.id.clone(), committed.clone());
        Ok(committed)
    }

    async fn save_parts(&self, incoming: Vec<Part>) -> Result<Vec<Part>, StoreError> {
        let mut parts = self.parts.write().await;
        // Validate every revision before touching anything: all or nothing.
        for part in &incoming {
            Self::check_revision(&parts, part)?;
        }
        let mut committed = Vec::with_capacity(incoming.len());
        for part in incoming {
            let part = Self::committed(part);
            parts.insert(part.id.clone(), part.clone());
            committed.push(part);
        }
        Ok(committed)
    }

    async fn delete_part(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.parts.write().await.remove(id).is_some())
    }

    async fn get_bhajan(&self, id: &str) -> Result<Option<Bhajan>, StoreError> {
        Ok(self.bhajans.read().await.get(id).cloned())
    }

    async fn list_bhajans(&self) -> Result<Vec<Bhajan>, StoreError> {
        let mut bhajans: Vec<Bhajan> = self.bhajans.read().await.values().cloned().collect();
        bhajans.sort_by(|a, b| a.category.cmp(&b.category).then(a.order.cmp(&b.order)));
        Ok(bhajans)
    }

    async fn get_bhajans_by_ids(&self, ids: &[String]) -> Result<Vec<Bhajan>, StoreError> {
        let bhajans = self.bhajans.read().await;
        Ok(ids.iter().filter_map(|id| bhajans.get(id).cloned()).collect())
    }

    async fn create_bhajan(&self, bhajan: Bhajan) -> Result<Bhajan, StoreError> {
        self.bhajans
            .write()
            .await
            .insert(bhajan.id.clone(), bhajan.clone());
        Ok(bhajan)
    }

    async fn update_bhajan(&self, id: &str, update: BhajanUpdate) -> Result<Bhajan, StoreError> {
        let mut bhajans = self.bhajans.write().await;
        let bhajan = bhajans
            .get_mut(id)
            .ok_or_else(|| StoreError::bhajan_not_found(id))?;

        if let Some(title) = update.title {
            bhajan.title = title;
        }
        if let Some(category) = update.category {
            bhajan.category = category;
        }
        if let Some(lyrics) = update.lyrics {
            bhajan.lyrics = lyrics;
        }
        if let Some(description) = update.description {
            bhajan.description = Some(description);
        }
        if let Some(language) = update.language {
            bhajan.language = language;
        }
        bhajan.modified_at = Utc::now();
        Ok(bhajan.clone())
    }

    async fn delete_bhajan(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.bhajans.write().await.remove(id).is_some())
    }

    async fn max_bhajan_order(&self, category: &str) -> Result<Option<i64>, StoreError> {
        Ok(self
            .bhajans
            .read()
            .await
            .values()
            .filter(|b| b.category == category)
            .map(|b| b.order)
            .max())
    }

    async fn set_bhajan_orders(&self, assignments: Vec<OrderAssignment>) -> Result<(), StoreError> {
        let mut bhajans = self.bhajans.write().await;
        for assignment in assignments {
            if let Some(bhajan) = bhajans.get_mut(&assignment.id) {
                bhajan.order = assignment.order;
                bhajan.modified_at = Utc::now();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Membership;

    fn sample_part(orders: &[(&str, i64)]) -> Part {
        let mut part = Part::new("भाग 1", 1);
        part.bhajans = orders
            .iter()
            .map(|(id, order)| Membership {
                bhajan_id: id.to_string(),
                order: *order,
            })
            .collect();
        part
    }

    #[tokio::test]
    async fn save_part_rejects_stale_revision() {
        let store = MemoryStore::new();
        let part = store.create_part(sample_part(&[("a", 1)])).await.unwrap();

        // First save wins and bumps the revision.
        let saved = store.save_part(part.clone()).await.unwrap();
        assert_eq!(saved.revision, part.revision + 1);

        // A save carrying the original revision is now stale.
        let result = store.save_part(part).await;
        assert!(matches!(
            result,
            Err(StoreError::RevisionConflict { expected: 1, actual: 2, .. })
        ));
    }

    #[tokio::test]
    async fn save_parts_is_all_or_nothing() {
        let store = MemoryStore::new();
        let first = store.create_part(sample_part(&[("a", 1)])).await.unwrap();
        let second = store.create_part(sample_part(&[("b", 1)])).await.unwrap();

        // Invalidate the second part's revision out-of-band.
        store.save_part(second.clone()).await.unwrap();

        let result = store.save_parts(vec![first.clone(), second]).await;
        assert!(matches!(result, Err(StoreError::RevisionConflict { .. })));

        // The first part must be untouched by the failed batch.
        let stored = store.get_part(&first.id).await.unwrap().unwrap();
        assert_eq!(stored.revision, first.revision);
    }

    #[tokio::test]
    async fn load_save_cycle_preserves_membership_orders() {
        let store = MemoryStore::new();
        let part = store
            .create_part(sample_part(&[("a", 1), ("b", 2), ("c", 3)]))
            .await
            .unwrap();

        // No moves applied: saving back must not renumber anything.
        let loaded = store.get_part(&part.id).await.unwrap().unwrap();
        let saved = store.save_part(loaded).await.unwrap();
        let orders: Vec<i64> = saved.ordered_memberships().iter().map(|m| m.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn list_bhajans_sorts_by_category_then_order() {
        let store = MemoryStore::new();
        store
            .create_bhajan(Bhajan::new("B2", "Bhajan", "l", None, None, 2))
            .await
            .unwrap();
        store
            .create_bhajan(Bhajan::new("A1", "Aarti", "l", None, None, 1))
            .await
            .unwrap();
        store
            .create_bhajan(Bhajan::new("B1", "Bhajan", "l", None, None, 1))
            .await
            .unwrap();

        let titles: Vec<String> = store
            .list_bhajans()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["A1", "B1", "B2"]);
    }

    #[tokio::test]
    async fn set_bhajan_orders_ignores_unknown_ids() {
        let store = MemoryStore::new();
        let bhajan = store
            .create_bhajan(Bhajan::new("A", "Aarti", "l", None, None, 1))
            .await
            .unwrap();

        store
            .set_bhajan_orders(vec![
                OrderAssignment {
                    id: bhajan.id.clone(),
                    order: 7,
                },
                OrderAssignment {
                    id: "missing".to_string(),
                    order: 9,
                },
            ])
            .await
            .unwrap();

        let updated = store.get_bhajan(&bhajan.id).await.unwrap().unwrap();
        assert_eq!(updated.order, 7);
    }
}
