//! Drag gesture state machine.

use crate::piece::PieceId;
use kurbo::{Point, Vec2};

/// State of the single pointer gesture a canvas can track.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A piece follows the pointer.
    Dragging {
        piece: PieceId,
        /// Pointer position minus the piece's top-left corner at grab time.
        offset: Vec2,
    },
}

impl DragState {
    /// Start dragging `piece`, currently at `origin`, grabbed at `pointer`.
    ///
    /// Returns `false` and keeps the current gesture if one is active.
    pub fn begin(&mut self, piece: PieceId, origin: Point, pointer: Point) -> bool {
        if self.is_dragging() {
            return false;
        }
        *self = DragState::Dragging {
            piece,
            offset: pointer - origin,
        };
        true
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    /// The piece being dragged, if any.
    pub fn piece(&self) -> Option<&PieceId> {
        match self {
            DragState::Dragging { piece, .. } => Some(piece),
            DragState::Idle => None,
        }
    }

    /// Top-left position for the dragged piece given a pointer position.
    pub fn position_for(&self, pointer: Point) -> Option<Point> {
        match self {
            DragState::Dragging { offset, .. } => Some(pointer - *offset),
            DragState::Idle => None,
        }
    }

    /// End the gesture, returning the piece and its final position.
    pub fn finish(&mut self, pointer: Point) -> Option<(PieceId, Point)> {
        match std::mem::take(self) {
            DragState::Dragging { piece, offset } => Some((piece, pointer - offset)),
            DragState::Idle => None,
        }
    }
}
