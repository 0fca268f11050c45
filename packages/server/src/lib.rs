//! Bhajanmala Server - HTTP API
//!
//! Thin HTTP layer over `bhajanmala-core`: configuration from the
//! environment plus an axum router exposing the catalog and the part board.

pub mod api;
pub mod config;

pub use api::{create_router, start_server, AppState, HttpError};
pub use config::ServerConfig;
