//! Lewis Builder Core Library
//!
//! Platform-agnostic interaction engine and host-side state for the Lewis
//! structure builder: pieces dragged from a palette onto a canvas, optional
//! snap targets, and the notifications that keep the host in step.

pub mod canvas;
pub mod drag;
pub mod host;
pub mod input;
pub mod notification;
pub mod palette;
pub mod piece;
pub mod render;
pub mod snap;

pub use canvas::{Canvas, CanvasConfig, Change, Placement};
pub use drag::DragState;
pub use host::{ApplyOutcome, HostError, PieceStore, StoredPiece};
pub use input::{PointerEvent, PointerTarget};
pub use notification::{MoveReport, Notification, NotificationLog, NotificationSink, WireNotification};
pub use palette::{Palette, PaletteEntry};
pub use piece::{GlyphStyle, Piece, PieceId, PieceKind, PieceVisual};
pub use snap::{PRE_SNAP_FACTOR, SNAP_RADIUS, SnapConfig, SnapResult};
