//! Pointer events for unified mouse/touch handling.

use crate::piece::PieceId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// What a pointer-down landed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerTarget {
    /// A palette entry, by palette index.
    Palette(usize),
    /// The body of a piece on the canvas.
    Piece(PieceId),
    /// The delete control of a piece.
    DeleteControl(PieceId),
    /// Empty canvas area.
    Canvas,
}

/// Pointer event in canvas-local coordinates.
///
/// Mouse and touch input are both normalized to this type. Every touch
/// event reads the first changed touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        target: PointerTarget,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
    },
}

impl PointerEvent {
    /// Pointer position carried by the event.
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => *position,
        }
    }
}
