//! Mapping DOM hits to engine pointer targets.

use kurbo::Point;
use lewis_core::{PieceId, PointerTarget};

/// What a pointer press landed on, read from the element tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hit {
    /// `data-index` of the palette item under the pointer.
    pub palette_index: Option<String>,
    /// Piece id owning the delete control under the pointer.
    pub delete_control: Option<String>,
    /// `data-piece-id` of the piece under the pointer.
    pub piece: Option<String>,
    /// Whether the press is inside the canvas area.
    pub in_canvas: bool,
}

impl Hit {
    /// The engine target for this hit, or `None` when the press is
    /// outside both palettes and the canvas.
    pub fn target(&self) -> Option<PointerTarget> {
        if let Some(id) = &self.delete_control {
            return Some(PointerTarget::DeleteControl(PieceId::new(id.as_str())));
        }
        if let Some(id) = &self.piece {
            return Some(PointerTarget::Piece(PieceId::new(id.as_str())));
        }
        if let Some(index) = &self.palette_index {
            return index.parse().ok().map(PointerTarget::Palette);
        }
        self.in_canvas.then_some(PointerTarget::Canvas)
    }
}

/// Client coordinates relative to the canvas's top-left corner.
pub fn to_canvas_local(client: Point, canvas_origin: Point) -> Point {
    (client - canvas_origin).to_point()
}
