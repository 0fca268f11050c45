//! Data Models
//!
//! This module contains the core data structures used throughout Bhajanmala:
//!
//! - `Bhajan` - A devotional song with lyrics and catalog metadata
//! - `Part` - A named, ordered collection of bhajan references
//! - `Membership` - The ordered association between a bhajan and a part
//! - `MoveInstruction` - A single drag-and-drop reorder gesture
//!
//! Reorder-sensitive invariants live on `Part`: membership order values are
//! kept as a contiguous 1-based sequence by the reorder engine.

mod bhajan;
mod part;

pub use bhajan::{Bhajan, BhajanUpdate, OrderAssignment, ValidationError, DEFAULT_LANGUAGE};
pub use part::{BhajanSummary, Membership, MoveInstruction, Part, PartView};
