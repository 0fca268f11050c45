//! ReorderEngine - Drag-and-Drop Move Semantics
//!
//! Applies a [`MoveInstruction`] to the catalog: the moved bhajan leaves its
//! source part and takes the anchor bhajan's position in the target part,
//! pushing the anchor (and everything after it) one slot down. Source and
//! target may be the same part.
//!
//! # Anchor semantics
//!
//! Both positions are resolved against the order-sorted membership views as
//! loaded, before anything is spliced. For a same-part move the moved entry is
//! removed first and then inserted at the precomputed anchor index of the
//! shortened list, which is exactly "take the anchor's place". Dropping a
//! bhajan onto itself is an identity move and still commits.
//!
//! # Concurrency
//!
//! Commits go through revision-checked saves; a cross-part move uses the
//! store's atomic multi-part save so both halves commit together or not at
//! all. A revision conflict means another writer won the race, so the engine
//! reloads and recomputes with exponential backoff before giving up with
//! [`ServiceError::MoveContention`].

use std::sync::Arc;
use std::time::Duration;

use crate::db::{CatalogStore, StoreError};
use crate::models::{Membership, MoveInstruction, Part};
use crate::services::ServiceError;

/// How many times a move is recomputed after losing a revision race
pub const MOVE_RETRY_LIMIT: u32 = 3;

/// The committed result of a move.
///
/// `target` is `None` for same-part moves, where `source` already carries the
/// rewritten list.
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub source: Part,
    pub target: Option<Part>,
}

/// Applies move instructions against a catalog store
pub struct ReorderEngine {
    store: Arc<dyn CatalogStore>,
}

impl ReorderEngine {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Apply a move and return the committed parts.
    ///
    /// Preconditions are checked in a fixed sequence: instruction shape,
    /// source part exists, target part exists, moved bhajan is in the source,
    /// anchor bhajan is in the target. The first failure wins.
    pub async fn apply_move(
        &self,
        instruction: MoveInstruction,
    ) -> Result<MoveOutcome, ServiceError> {
        instruction
            .validate()
            .map_err(|e| ServiceError::invalid_instruction(e.to_string()))?;

        let mut attempt: u32 = 0;
        loop {
            match self.try_move(&instruction).await {
                Err(ServiceError::Storage(StoreError::RevisionConflict { part_id, .. })) => {
                    if attempt >= MOVE_RETRY_LIMIT {
                        tracing::warn!(
                            "❌ Move on part {} still conflicting after {} attempts",
                            part_id,
                            attempt + 1
                        );
                        return Err(ServiceError::MoveContention {
                            part_id,
                            attempts: attempt + 1,
                        });
                    }
                    let delay = Duration::from_millis(10 * 2u64.pow(attempt));
                    tracing::debug!(
                        "📝 Revision conflict on part {}, retrying in {:?}",
                        part_id,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// One load-compute-commit cycle
    async fn try_move(&self, instruction: &MoveInstruction) -> Result<MoveOutcome, ServiceError> {
        let source = self
            .store
            .get_part(&instruction.source_part_id)
            .await?
            .ok_or_else(|| ServiceError::part_not_found(&instruction.source_part_id))?;

        let target = if instruction.is_same_part() {
            None
        } else {
            Some(
                self.store
                    .get_part(&instruction.target_part_id)
                    .await?
                    .ok_or_else(|| ServiceError::part_not_found(&instruction.target_part_id))?,
            )
        };

        let (source_list, target_list) = compute_move(&source, target.as_ref(), instruction)?;

        let mut new_source = source;
        new_source.bhajans = source_list;

        match (target, target_list) {
            (Some(mut new_target), Some(list)) => {
                new_target.bhajans = list;
                let mut committed = self
                    .store
                    .save_parts(vec![new_source, new_target])
                    .await?
                    .into_iter();
                let source = committed.next().ok_or_else(|| {
                    ServiceError::Storage(StoreError::query_failed(
                        "batch part save returned no records",
                    ))
                })?;
                Ok(MoveOutcome {
                    source,
                    target: committed.next(),
                })
            }
            _ => {
                let committed = self.store.save_part(new_source).await?;
                Ok(MoveOutcome {
                    source: committed,
                    target: None,
                })
            }
        }
    }
}

/// Pure splice step of a move: no storage access, no mutation of the inputs.
///
/// Returns the rewritten membership list for the source part and, for
/// cross-part moves, the rewritten target list. Both lists come back
/// reindexed to a contiguous 1-based sequence.
fn compute_move(
    source: &Part,
    target: Option<&Part>,
    instruction: &MoveInstruction,
) -> Result<(Vec<Membership>, Option<Vec<Membership>>), ServiceError> {
    let mut source_list = source.ordered_memberships();
    let moved_index = source_list
        .iter()
        .position(|m| m.bhajan_id == instruction.moved_bhajan_id)
        .ok_or_else(|| ServiceError::bhajan_not_found(&instruction.moved_bhajan_id))?;

    match target {
        // Same part: the anchor index is resolved before the splice, then the
        // moved entry lands at that index of the shortened list.
        None => {
            let anchor_index = source_list
                .iter()
                .position(|m| m.bhajan_id == instruction.anchor_bhajan_id)
                .ok_or_else(|| ServiceError::bhajan_not_found(&instruction.anchor_bhajan_id))?;

            let moved = source_list.remove(moved_index);
            source_list.insert(anchor_index, moved);
            reindex(&mut source_list);
            Ok((source_list, None))
        }
        Some(target) => {
            let mut target_list = target.ordered_memberships();
            let anchor_index = target_list
                .iter()
                .position(|m| m.bhajan_id == instruction.anchor_bhajan_id)
                .ok_or_else(|| ServiceError::bhajan_not_found(&instruction.anchor_bhajan_id))?;

            let moved = source_list.remove(moved_index);
            target_list.insert(anchor_index, moved);
            reindex(&mut source_list);
            reindex(&mut target_list);
            Ok((source_list, Some(target_list)))
        }
    }
}

/// Rewrite membership orders to 1..=N following current list positions
fn reindex(memberships: &mut [Membership]) {
    for (index, membership) in memberships.iter_mut().enumerate() {
        membership.order = index as i64 + 1;
    }
}
