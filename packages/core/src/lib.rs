//! Bhajanmala Core - Catalog and Reorder Engine
//!
//! Core library for the bhajan catalog: data models, persistence behind the
//! [`CatalogStore`] trait (embedded SurrealDB or in-memory), the services
//! that own catalog business logic, and the drag-and-drop [`ReorderEngine`]
//! that moves bhajans within and between parts.
//!
//! The [`client`] module carries the optimistic board mirror used by
//! interactive frontends.
//!
//! [`CatalogStore`]: db::CatalogStore
//! [`ReorderEngine`]: services::ReorderEngine

pub mod client;
pub mod db;
pub mod models;
pub mod services;

pub use client::{BoardReflector, MoveToken, PartSnapshot, ReflectorError};
pub use db::{CatalogStore, MemoryStore, StoreError, SurrealStore};
pub use models::{
    Bhajan, BhajanSummary, BhajanUpdate, Membership, MoveInstruction, OrderAssignment, Part,
    PartView, ValidationError,
};
pub use services::{
    BhajanService, CreateBhajanParams, MoveOutcome, PartService, ReorderEngine, ServiceError,
};
