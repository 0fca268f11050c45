//! SurrealStore - CatalogStore Implementation for Embedded SurrealDB
//!
//! Persists parts and bhajans in an embedded SurrealDB instance (RocksDB
//! engine). Tables are SCHEMALESS; records carry a `uuid` field for lookups
//! and timestamps as RFC 3339 strings.
//!
//! # Atomicity
//!
//! Cross-part moves commit through [`CatalogStore::save_parts`], which runs
//! all part updates inside one SurrealDB transaction guarded by per-part
//! revision checks: a stale revision `THROW`s and cancels the whole
//! transaction, so the two halves of a cross-part move can never commit
//! separately.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::engine::local::{Db, RocksDb};
use surrealdb::Surreal;

use crate::db::{CatalogStore, StoreError};
use crate::models::{Bhajan, BhajanUpdate, Membership, OrderAssignment, Part};

use async_trait::async_trait;

/// Internal struct matching the `part` table layout.
///
/// The part order field is stored as `part_order` so no query ever needs to
/// reference a bare `order` identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PartRecord {
    uuid: String,
    title: String,
    part_order: i64,
    bhajans: Vec<Membership>,
    revision: i64,
    created_at: String,
    modified_at: String,
}

impl From<PartRecord> for Part {
    fn from(record: PartRecord) -> Self {
        Part {
            id: record.uuid,
            title: record.title,
            order: record.part_order,
            bhajans: record.bhajans,
            revision: record.revision,
            created_at: parse_timestamp(&record.created_at),
            modified_at: parse_timestamp(&record.modified_at),
        }
    }
}

/// Internal struct matching the `bhajan` table layout
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BhajanRecord {
    uuid: String,
    title: String,
    category: String,
    lyrics: String,
    description: Option<String>,
    language: String,
    catalog_order: i64,
    created_at: String,
    modified_at: String,
}

impl From<BhajanRecord> for Bhajan {
    fn from(record: BhajanRecord) -> Self {
        Bhajan {
            id: record.uuid,
            title: record.title,
            category: record.category,
            lyrics: record.lyrics,
            description: record.description,
            language: record.language,
            order: record.catalog_order,
            created_at: parse_timestamp(&record.created_at),
            modified_at: parse_timestamp(&record.modified_at),
        }
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// CatalogStore implementation backed by embedded SurrealDB (RocksDB engine)
pub struct SurrealStore {
    db: Arc<Surreal<Db>>,
}

impl SurrealStore {
    /// Open (or create) the embedded database at `db_path` and initialize the
    /// schema.
    pub async fn new(db_path: PathBuf) -> Result<Self, StoreError> {
        let db = Surreal::new::<RocksDb>(db_path.clone())
            .await
            .map_err(|source| StoreError::ConnectionFailed {
                path: db_path,
                source,
            })?;

        db.use_ns("bhajanmala").use_db("catalog").await?;

        let db = Arc::new(db);
        Self::initialize_schema(&db).await?;

        Ok(Self { db })
    }

    /// SCHEMALESS tables for parts and bhajans
    async fn initialize_schema(db: &Surreal<Db>) -> Result<(), StoreError> {
        db.query("DEFINE TABLE IF NOT EXISTS part SCHEMALESS;")
            .await?;
        db.query("DEFINE TABLE IF NOT EXISTS bhajan SCHEMALESS;")
            .await?;
        Ok(())
    }

    /// Decide whether a failed batch save was a stale revision or a missing
    /// part, falling back to the raw backend error otherwise.
    async fn classify_batch_failure(
        &self,
        parts: &[Part],
        backend_error: surrealdb::Error,
    ) -> StoreError {
        for part in parts {
            match self.get_part(&part.id).await {
                Ok(None) => return StoreError::part_not_found(&part.id),
                Ok(Some(current)) if current.revision != part.revision => {
                    return StoreError::revision_conflict(&part.id, part.revision, current.revision)
                }
                _ => {}
            }
        }
        StoreError::Backend(backend_error)
    }
}

#[async_trait]
impl CatalogStore for SurrealStore {
    async fn get_part(&self, id: &str) -> Result<Option<Part>, StoreError> {
        let mut response = self
            .db
            .query("SELECT * FROM part WHERE uuid = $uuid LIMIT 1;")
            .bind(("uuid", id.to_string()))
            .await?;

        let records: Vec<PartRecord> = response.take(0)?;
        Ok(records.into_iter().map(Into::into).next())
    }

    async fn list_parts(&self) -> Result<Vec<Part>, StoreError> {
        let mut response = self.db.query("SELECT * FROM part;").await?;
        let records: Vec<PartRecord> = response.take(0)?;

        let mut parts: Vec<Part> = records.into_iter().map(Into::into).collect();
        parts.sort_by_key(|p| p.order);
        Ok(parts)
    }

    async fn create_part(&self, part: Part) -> Result<Part, StoreError> {
        let query = "
            CREATE type::thing('part', $uuid) CONTENT {
                uuid: $uuid,
                title: $title,
                part_order: $part_order,
                bhajans: $bhajans,
                revision: $revision,
                created_at: $created_at,
                modified_at: $modified_at
            };
        ";

        self.db
            .query(query)
            .bind(("uuid", part.id.clone()))
            .bind(("title", part.title.clone()))
            .bind(("part_order", part.order))
            .bind(("bhajans", part.bhajans.clone()))
            .bind(("revision", part.revision))
            .bind(("created_at", part.created_at.to_rfc3339()))
            .bind(("modified_at", part.modified_at.to_rfc3339()))
            .await?;

        Ok(part)
    }

    async fn save_part(&self, part: Part) -> Result<Part, StoreError> {
        let query = "
            UPDATE part SET
                title = $title,
                part_order = $part_order,
                bhajans = $bhajans,
                revision = revision + 1,
                modified_at = $modified_at
            WHERE uuid = $uuid AND revision = $revision;
        ";

        let mut response = self
            .db
            .query(query)
            .bind(("uuid", part.id.clone()))
            .bind(("title", part.title.clone()))
            .bind(("part_order", part.order))
            .bind(("bhajans", part.bhajans.clone()))
            .bind(("revision", part.revision))
            .bind(("modified_at", Utc::now().to_rfc3339()))
            .await?;

        let records: Vec<PartRecord> = response.take(0)?;
        match records.into_iter().next() {
            Some(record) => Ok(record.into()),
            // Nothing matched: the part is gone or the revision is stale.
            None => match self.get_part(&part.id).await? {
                None => Err(StoreError::part_not_found(&part.id)),
                Some(current) => Err(StoreError::revision_conflict(
                    &part.id,
                    part.revision,
                    current.revision,
                )),
            },
        }
    }

    async fn save_parts(&self, parts: Vec<Part>) -> Result<Vec<Part>, StoreError> {
        if parts.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = String::from("BEGIN TRANSACTION;\n");
        for index in 0..parts.len() {
            query.push_str(&format!(
                "LET $updated_{index} = (UPDATE part SET \
                     title = $title_{index}, \
                     part_order = $part_order_{index}, \
                     bhajans = $bhajans_{index}, \
                     revision = revision + 1, \
                     modified_at = $modified_at_{index} \
                 WHERE uuid = $uuid_{index} AND revision = $revision_{index});\n\
                 IF array::len($updated_{index}) == 0 {{ THROW 'stale part revision' }};\n"
            ));
        }
        query.push_str("COMMIT TRANSACTION;");

        let mut request = self.db.query(query);
        let modified_at = Utc::now().to_rfc3339();
        for (index, part) in parts.iter().enumerate() {
            request = request
                .bind((format!("uuid_{index}"), part.id.clone()))
                .bind((format!("title_{index}"), part.title.clone()))
                .bind((format!("part_order_{index}"), part.order))
                .bind((format!("bhajans_{index}"), part.bhajans.clone()))
                .bind((format!("revision_{index}"), part.revision))
                .bind((format!("modified_at_{index}"), modified_at.clone()));
        }

        let result = match request.await {
            Ok(response) => response.check(),
            Err(error) => Err(error),
        };
        if let Err(error) = result {
            return Err(self.classify_batch_failure(&parts, error).await);
        }

        // Reload to return the committed revisions.
        let mut committed = Vec::with_capacity(parts.len());
        for part in &parts {
            let stored = self
                .get_part(&part.id)
                .await?
                .ok_or_else(|| StoreError::part_not_found(&part.id))?;
            committed.push(stored);
        }
        Ok(committed)
    }

    async fn delete_part(&self, id: &str) -> Result<bool, StoreError> {
        if self.get_part(id).await?.is_none() {
            return Ok(false);
        }
        self.db
            .query("DELETE part WHERE uuid = $uuid;")
            .bind(("uuid", id.to_string()))
            .await?;
        Ok(true)
    }

    async fn get_bhajan(&self, id: &str) -> Result<Option<Bhajan>, StoreError> {
        let mut response = self
            .db
            .query("SELECT * FROM bhajan WHERE uuid = $uuid LIMIT 1;")
            .bind(("uuid", id.to_string()))
            .await?;

        let records: Vec<BhajanRecord> = response.take(0)?;
        Ok(records.into_iter().map(Into::into).next())
    }

    async fn list_bhajans(&self) -> Result<Vec<Bhajan>, StoreError> {
        let mut response = self.db.query("SELECT * FROM bhajan;").await?;
        let records: Vec<BhajanRecord> = response.take(0)?;

        let mut bhajans: Vec<Bhajan> = records.into_iter().map(Into::into).collect();
        bhajans.sort_by(|a, b| a.category.cmp(&b.category).then(a.order.cmp(&b.order)));
        Ok(bhajans)
    }

    async fn get_bhajans_by_ids(&self, ids: &[String]) -> Result<Vec<Bhajan>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut response = self
            .db
            .query("SELECT * FROM bhajan WHERE uuid IN $ids;")
            .bind(("ids", ids.to_vec()))
            .await?;

        let records: Vec<BhajanRecord> = response.take(0)?;
        let mut by_id: std::collections::HashMap<String, Bhajan> = records
            .into_iter()
            .map(|r| (r.uuid.clone(), r.into()))
            .collect();

        // Preserve caller ordering; unresolved IDs are simply skipped.
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn create_bhajan(&self, bhajan: Bhajan) -> Result<Bhajan, StoreError> {
        let query = "
            CREATE type::thing('bhajan', $uuid) CONTENT {
                uuid: $uuid,
                title: $title,
                category: $category,
                lyrics: $lyrics,
                description: $description,
                language: $language,
                catalog_order: $catalog_order,
                created_at: $created_at,
                modified_at: $modified_at
            };
        ";

        self.db
            .query(query)
            .bind(("uuid", bhajan.id.clone()))
            .bind(("title", bhajan.title.clone()))
            .bind(("category", bhajan.category.clone()))
            .bind(("lyrics", bhajan.lyrics.clone()))
            .bind(("description", bhajan.description.clone()))
            .bind(("language", bhajan.language.clone()))
            .bind(("catalog_order", bhajan.order))
            .bind(("created_at", bhajan.created_at.to_rfc3339()))
            .bind(("modified_at", bhajan.modified_at.to_rfc3339()))
            .await?;

        Ok(bhajan)
    }

    async fn update_bhajan(&self, id: &str, update: BhajanUpdate) -> Result<Bhajan, StoreError> {
        // Fetch-merge-write: sparse updates only replace provided fields.
        let current = self
            .get_bhajan(id)
            .await?
            .ok_or_else(|| StoreError::bhajan_not_found(id))?;

        let query = "
            UPDATE bhajan SET
                title = $title,
                category = $category,
                lyrics = $lyrics,
                description = $description,
                language = $language,
                modified_at = $modified_at
            WHERE uuid = $uuid;
        ";

        let mut response = self
            .db
            .query(query)
            .bind(("uuid", id.to_string()))
            .bind(("title", update.title.unwrap_or(current.title)))
            .bind(("category", update.category.unwrap_or(current.category)))
            .bind(("lyrics", update.lyrics.unwrap_or(current.lyrics)))
            .bind((
                "description",
                update.description.or(current.description),
            ))
            .bind(("language", update.language.unwrap_or(current.language)))
            .bind(("modified_at", Utc::now().to_rfc3339()))
            .await?;

        let records: Vec<BhajanRecord> = response.take(0)?;
        records
            .into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| StoreError::bhajan_not_found(id))
    }

    async fn delete_bhajan(&self, id: &str) -> Result<bool, StoreError> {
        if self.get_bhajan(id).await?.is_none() {
            return Ok(false);
        }
        self.db
            .query("DELETE bhajan WHERE uuid = $uuid;")
            .bind(("uuid", id.to_string()))
            .await?;
        Ok(true)
    }

    async fn max_bhajan_order(&self, category: &str) -> Result<Option<i64>, StoreError> {
        let mut response = self
            .db
            .query("SELECT * FROM bhajan WHERE category = $category;")
            .bind(("category", category.to_string()))
            .await?;

        let records: Vec<BhajanRecord> = response.take(0)?;
        Ok(records.into_iter().map(|r| r.catalog_order).max())
    }

    async fn set_bhajan_orders(&self, assignments: Vec<OrderAssignment>) -> Result<(), StoreError> {
        if assignments.is_empty() {
            return Ok(());
        }

        let mut query = String::from("BEGIN TRANSACTION;\n");
        for index in 0..assignments.len() {
            query.push_str(&format!(
                "UPDATE bhajan SET catalog_order = $order_{index}, modified_at = $modified_at \
                 WHERE uuid = $uuid_{index};\n"
            ));
        }
        query.push_str("COMMIT TRANSACTION;");

        let mut request = self.db.query(query);
        request = request.bind(("modified_at", Utc::now().to_rfc3339()));
        for (index, assignment) in assignments.into_iter().enumerate() {
            request = request
                .bind((format!("uuid_{index}"), assignment.id))
                .bind((format!("order_{index}"), assignment.order));
        }
        request.await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_store() -> (SurrealStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SurrealStore::new(temp_dir.path().join("catalog.db"))
            .await
            .unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn part_create_load_roundtrip() {
        let (store, _temp_dir) = open_store().await;

        let mut part = Part::new("भाग 1", 1);
        part.bhajans = vec![
            Membership {
                bhajan_id: "a".to_string(),
                order: 1,
            },
            Membership {
                bhajan_id: "b".to_string(),
                order: 2,
            },
        ];
        let created = store.create_part(part).await.unwrap();

        let loaded = store.get_part(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "भाग 1");
        assert_eq!(loaded.bhajans.len(), 2);
        assert_eq!(loaded.revision, 1);
    }

    #[tokio::test]
    async fn save_part_bumps_revision_and_rejects_stale_writes() {
        let (store, _temp_dir) = open_store().await;
        let part = store.create_part(Part::new("भाग 1", 1)).await.unwrap();

        let saved = store.save_part(part.clone()).await.unwrap();
        assert_eq!(saved.revision, 2);

        let stale = store.save_part(part).await;
        assert!(matches!(stale, Err(StoreError::RevisionConflict { .. })));
    }

    #[tokio::test]
    async fn save_parts_commits_both_or_neither() {
        let (store, _temp_dir) = open_store().await;
        let first = store.create_part(Part::new("भाग 1", 1)).await.unwrap();
        let second = store.create_part(Part::new("भाग 2", 2)).await.unwrap();

        // Make the second part's revision stale.
        store.save_part(second.clone()).await.unwrap();

        let result = store.save_parts(vec![first.clone(), second]).await;
        assert!(matches!(result, Err(StoreError::RevisionConflict { .. })));

        let stored = store.get_part(&first.id).await.unwrap().unwrap();
        assert_eq!(stored.revision, first.revision);
    }

    #[tokio::test]
    async fn bhajan_crud_roundtrip() {
        let (store, _temp_dir) = open_store().await;

        let bhajan = store
            .create_bhajan(Bhajan::new("Hanuman Chalisa", "Chalisa", "lyrics", None, None, 1))
            .await
            .unwrap();

        let update = BhajanUpdate {
            title: Some("Shri Hanuman Chalisa".to_string()),
            ..Default::default()
        };
        let updated = store.update_bhajan(&bhajan.id, update).await.unwrap();
        assert_eq!(updated.title, "Shri Hanuman Chalisa");
        assert_eq!(updated.category, "Chalisa");

        assert!(store.delete_bhajan(&bhajan.id).await.unwrap());
        assert!(!store.delete_bhajan(&bhajan.id).await.unwrap());
    }
}
