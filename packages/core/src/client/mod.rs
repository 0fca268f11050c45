//! BoardReflector - Optimistic Client-Side Board State
//!
//! Mirrors the part board the way a drag-and-drop UI does: a move is applied
//! to the local mirror immediately, while the server round-trip is still in
//! flight, and the outcome either confirms the optimistic splice or rolls it
//! back to the exact pre-move state.
//!
//! Only one move may be in flight at a time; a second `begin_move` before the
//! first resolves is rejected with [`ReflectorError::MoveInFlight`]. Rollback
//! restores saved snapshots of the affected parts rather than replaying an
//! inverse move, so it is correct even when the optimistic splice itself was
//! wrong.

use thiserror::Error;

use crate::models::{MoveInstruction, PartView};

/// Client-side reflector errors
#[derive(Error, Debug, PartialEq)]
pub enum ReflectorError {
    /// A previous move has not been confirmed or rejected yet
    #[error("A move is already in flight")]
    MoveInFlight,

    /// Referenced part is not on the board
    #[error("Unknown part: {id}")]
    UnknownPart { id: String },

    /// Referenced bhajan is not in the expected part
    #[error("Unknown bhajan: {id}")]
    UnknownBhajan { id: String },

    /// Move instruction failed a shape check
    #[error("Invalid move instruction: {reason}")]
    InvalidInstruction { reason: String },

    /// Token does not match the move currently in flight
    #[error("Stale move token: {0}")]
    StaleToken(u64),
}

/// Minimal client-side mirror of one part: its ID and bhajan IDs in display
/// order. Membership order values are implicit in the list positions.
#[derive(Debug, Clone, PartialEq)]
pub struct PartSnapshot {
    pub id: String,
    pub bhajan_ids: Vec<String>,
}

impl From<&PartView> for PartSnapshot {
    fn from(view: &PartView) -> Self {
        Self {
            id: view.id.clone(),
            bhajan_ids: view.bhajans.iter().map(|b| b.id.clone()).collect(),
        }
    }
}

/// Handle identifying one in-flight move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveToken(u64);

/// Pre-move state needed to undo the optimistic splice
#[derive(Debug, Clone)]
struct PendingMove {
    token: u64,
    saved: Vec<PartSnapshot>,
}

/// Optimistic mirror of the part board
#[derive(Debug, Default)]
pub struct BoardReflector {
    parts: Vec<PartSnapshot>,
    pending: Option<PendingMove>,
    next_token: u64,
}

impl BoardReflector {
    /// Build a reflector from server-rendered part views
    pub fn from_views(views: &[PartView]) -> Self {
        Self {
            parts: views.iter().map(Into::into).collect(),
            pending: None,
            next_token: 0,
        }
    }

    /// Current board state, parts in display order
    pub fn parts(&self) -> &[PartSnapshot] {
        &self.parts
    }

    /// Whether a move is awaiting confirmation
    pub fn has_pending_move(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply a move optimistically and return the token to resolve it with.
    ///
    /// The splice matches the server's anchor semantics: the moved bhajan
    /// takes the anchor's position, pushing the anchor down. Pre-move
    /// snapshots of the affected parts are kept for [`reject`].
    ///
    /// [`reject`]: BoardReflector::reject
    pub fn begin_move(&mut self, instruction: &MoveInstruction) -> Result<MoveToken, ReflectorError> {
        if self.pending.is_some() {
            return Err(ReflectorError::MoveInFlight);
        }
        instruction
            .validate()
            .map_err(|e| ReflectorError::InvalidInstruction {
                reason: e.to_string(),
            })?;

        let source_index = self.part_index(&instruction.source_part_id)?;
        let target_index = if instruction.is_same_part() {
            source_index
        } else {
            self.part_index(&instruction.target_part_id)?
        };

        let moved_index = self.parts[source_index]
            .bhajan_ids
            .iter()
            .position(|id| id == &instruction.moved_bhajan_id)
            .ok_or_else(|| ReflectorError::UnknownBhajan {
                id: instruction.moved_bhajan_id.clone(),
            })?;
        let anchor_index = self.parts[target_index]
            .bhajan_ids
            .iter()
            .position(|id| id == &instruction.anchor_bhajan_id)
            .ok_or_else(|| ReflectorError::UnknownBhajan {
                id: instruction.anchor_bhajan_id.clone(),
            })?;

        let mut saved = vec![self.parts[source_index].clone()];
        if target_index != source_index {
            saved.push(self.parts[target_index].clone());
        }

        let moved = self.parts[source_index].bhajan_ids.remove(moved_index);
        self.parts[target_index].bhajan_ids.insert(anchor_index, moved);

        self.next_token += 1;
        let token = self.next_token;
        self.pending = Some(PendingMove { token, saved });
        Ok(MoveToken(token))
    }

    /// The server committed the move; the optimistic state becomes canonical
    pub fn confirm(&mut self, token: MoveToken) -> Result<(), ReflectorError> {
        self.take_pending(token)?;
        Ok(())
    }

    /// The server rejected the move; restore the pre-move snapshots
    pub fn reject(&mut self, token: MoveToken) -> Result<(), ReflectorError> {
        let pending = self.take_pending(token)?;
        for snapshot in pending.saved {
            if let Some(part) = self.parts.iter_mut().find(|p| p.id == snapshot.id) {
                *part = snapshot;
            }
        }
        Ok(())
    }

    /// Replace the whole mirror with server truth, dropping any pending move
    pub fn sync(&mut self, views: &[PartView]) {
        self.parts = views.iter().map(Into::into).collect();
        self.pending = None;
    }

    fn part_index(&self, id: &str) -> Result<usize, ReflectorError> {
        self.parts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ReflectorError::UnknownPart { id: id.to_string() })
    }

    fn take_pending(&mut self, token: MoveToken) -> Result<PendingMove, ReflectorError> {
        match self.pending.take() {
            Some(pending) if pending.token == token.0 => Ok(pending),
            other => {
                self.pending = other;
                Err(ReflectorError::StaleToken(token.0))
            }
        }
    }
}
