//! Part Data Structures
//!
//! A `Part` is a named, ordered collection of bhajan references. Parts are the
//! unit of mutation for drag-and-drop reordering: the reorder engine rewrites
//! a part's full membership list in one shot, never individual entries.
//!
//! # Ordering invariants
//!
//! - Within a part, membership `order` values form a contiguous 1-based
//!   sequence (`1..=N`) after every committed reorder.
//! - Part `order` values are sort keys only and are never reindexed.
//! - The persisted array order of memberships is not trusted; callers sort by
//!   the `order` field after load via [`Part::ordered_memberships`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::bhajan::ValidationError;

fn default_revision() -> i64 {
    1
}

/// The ordered association between a bhajan and the part containing it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    /// Identifier of the referenced bhajan
    pub bhajan_id: String,

    /// 1-based position within the owning part
    pub order: i64,
}

/// A named, ordered collection of bhajan references.
///
/// `revision` is an optimistic-concurrency counter: every committed save bumps
/// it, and a save carrying a stale revision is rejected so concurrent moves on
/// the same part cannot silently overwrite each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Unique identifier (UUID)
    pub id: String,

    /// Display title
    pub title: String,

    /// Position among sibling parts (sort key, not required to be contiguous)
    pub order: i64,

    /// Membership list; array order is not authoritative, the `order` field is
    pub bhajans: Vec<Membership>,

    /// Optimistic-concurrency revision, bumped on every committed save
    #[serde(default = "default_revision")]
    pub revision: i64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub modified_at: DateTime<Utc>,
}

impl Part {
    /// Create a new empty part with a generated UUID and current timestamps
    pub fn new(title: impl Into<String>, order: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into().trim().to_string(),
            order,
            bhajans: Vec::new(),
            revision: default_revision(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Memberships sorted by their `order` field ascending.
    ///
    /// The store does not guarantee persisted array order matches the order
    /// field, so every positional computation starts from this view.
    pub fn ordered_memberships(&self) -> Vec<Membership> {
        let mut memberships = self.bhajans.clone();
        memberships.sort_by_key(|m| m.order);
        memberships
    }

    /// Zero-based position of a bhajan within the ordered membership view
    pub fn position_of(&self, bhajan_id: &str) -> Option<usize> {
        self.ordered_memberships()
            .iter()
            .position(|m| m.bhajan_id == bhajan_id)
    }

    /// Whether this part references the given bhajan
    pub fn contains(&self, bhajan_id: &str) -> bool {
        self.bhajans.iter().any(|m| m.bhajan_id == bhajan_id)
    }
}

/// A single drag-and-drop reorder gesture.
///
/// Identifies the membership being dragged (`moved_bhajan_id`, resolved
/// against the source part) and the membership it was dropped onto
/// (`anchor_bhajan_id`, resolved against the target part). Source and target
/// may be the same part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveInstruction {
    pub source_part_id: String,
    pub target_part_id: String,
    pub moved_bhajan_id: String,
    pub anchor_bhajan_id: String,
}

impl MoveInstruction {
    /// True when the gesture starts and ends in the same part
    pub fn is_same_part(&self) -> bool {
        self.source_part_id == self.target_part_id
    }

    /// All four fields must be present and non-empty
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("sourcePartId", &self.source_part_id),
            ("targetPartId", &self.target_part_id),
            ("movedBhajanId", &self.moved_bhajan_id),
            ("anchorBhajanId", &self.anchor_bhajan_id),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(name.to_string()));
            }
        }
        Ok(())
    }
}

/// A bhajan as it appears inside a resolved part listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BhajanSummary {
    pub id: String,
    pub title: String,
    pub lyrics: String,
    pub category: String,
    pub description: Option<String>,
    /// Membership order within the part (not the bhajan's catalog order)
    pub order: i64,
}

/// A part with its memberships resolved to bhajan summaries, membership order
/// ascending. This is the shape the public listing endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartView {
    pub id: String,
    pub title: String,
    pub order: i64,
    pub bhajans: Vec<BhajanSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part_with_orders(pairs: &[(&str, i64)]) -> Part {
        let mut part = Part::new("भाग 1", 1);
        part.bhajans = pairs
            .iter()
            .map(|(id, order)| Membership {
                bhajan_id: id.to_string(),
                order: *order,
            })
            .collect();
        part
    }

    #[test]
    fn ordered_memberships_sorts_by_order_field_not_array_position() {
        let part = part_with_orders(&[("c", 3), ("a", 1), ("b", 2)]);
        let ordered: Vec<String> = part
            .ordered_memberships()
            .into_iter()
            .map(|m| m.bhajan_id)
            .collect();
        assert_eq!(ordered, vec!["a", "b", "c"]);
    }

    #[test]
    fn position_of_uses_ordered_view() {
        let part = part_with_orders(&[("c", 3), ("a", 1), ("b", 2)]);
        assert_eq!(part.position_of("a"), Some(0));
        assert_eq!(part.position_of("c"), Some(2));
        assert_eq!(part.position_of("missing"), None);
    }

    #[test]
    fn move_instruction_rejects_blank_fields() {
        let instruction = MoveInstruction {
            source_part_id: "part-1".to_string(),
            target_part_id: "  ".to_string(),
            moved_bhajan_id: "bhajan-1".to_string(),
            anchor_bhajan_id: "bhajan-2".to_string(),
        };
        assert!(matches!(
            instruction.validate(),
            Err(ValidationError::MissingField(field)) if field == "targetPartId"
        ));
    }

    #[test]
    fn move_instruction_same_part_detection() {
        let instruction = MoveInstruction {
            source_part_id: "part-1".to_string(),
            target_part_id: "part-1".to_string(),
            moved_bhajan_id: "a".to_string(),
            anchor_bhajan_id: "b".to_string(),
        };
        assert!(instruction.is_same_part());
    }
}
