//! Database Layer - Catalog Persistence
//!
//! Defines the [`CatalogStore`] abstraction plus two backends: the embedded
//! SurrealDB store used by the running service and an in-memory store for
//! tests and demos.

mod catalog_store;
mod error;
mod memory_store;
mod surreal_store;

pub use catalog_store::CatalogStore;
pub use error::StoreError;
pub use memory_store::MemoryStore;
pub use surreal_store::SurrealStore;
