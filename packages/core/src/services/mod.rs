//! Service Layer - Catalog Business Logic
//!
//! Services own the business rules on top of [`CatalogStore`]: bhajan and
//! part lifecycles, resolved listings, and the drag-and-drop reorder engine.
//!
//! [`CatalogStore`]: crate::db::CatalogStore

mod bhajan_service;
mod error;
mod part_service;
mod reorder;

pub use bhajan_service::{BhajanService, CreateBhajanParams};
pub use error::ServiceError;
pub use part_service::PartService;
pub use reorder::{MoveOutcome, ReorderEngine, MOVE_RETRY_LIMIT};
