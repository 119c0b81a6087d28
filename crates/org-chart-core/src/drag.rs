//! Per-card drag session
//!
//! A card's visual offset from its laid-out position. Offsets accumulate
//! across drags and persist until a reset; releasing the pointer never snaps
//! the card back.

use emath::{Pos2, Vec2};

/// Snapshot taken when the pointer goes down
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    start_pointer: Pos2,
    start_offset: Vec2,
}

/// Drag state of one card
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CardDrag {
    offset: Vec2,
    session: Option<DragSession>,
}

impl CardDrag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session at `pointer`
    pub fn pointer_down(&mut self, pointer: Pos2) {
        self.session = Some(DragSession {
            start_pointer: pointer,
            start_offset: self.offset,
        });
    }

    /// Follow the pointer. Returns true when the offset changed.
    pub fn pointer_move(&mut self, pointer: Pos2) -> bool {
        let Some(session) = self.session else {
            return false;
        };
        let offset = session.start_offset + (pointer - session.start_pointer);
        if offset == self.offset {
            return false;
        }
        tracing::trace!(x = offset.x, y = offset.y, "card offset");
        self.offset = offset;
        true
    }

    /// End the session; the offset stays where it is
    pub fn pointer_up(&mut self) {
        self.session = None;
    }

    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.session = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn is_displaced(&self) -> bool {
        self.offset != Vec2::ZERO
    }
}
