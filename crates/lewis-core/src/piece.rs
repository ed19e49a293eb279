//! Piece definitions for the canvas.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix for ids generated from palette spawns.
const GENERATED_ID_PREFIX: &str = "piece-";

/// Unique identifier for a piece.
///
/// Generated ids look like `piece-<uuid>`; pre-placed pieces carry fixed ids
/// from their canvas configuration (e.g. `"N"`, `"bond1"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(String);

impl PieceId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(format!("{}{}", GENERATED_ID_PREFIX, Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PieceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PieceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Classification of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    #[serde(rename = "atom")]
    Atom,
    #[serde(rename = "bond")]
    Bond,
    /// Electron pair glyphs. Older pages tagged these `electron` or `lone`.
    #[serde(rename = "lone-pair", alias = "electron", alias = "lone")]
    LonePair,
}

impl PieceKind {
    /// All kinds in palette order.
    pub const ALL: [PieceKind; 3] = [PieceKind::Atom, PieceKind::Bond, PieceKind::LonePair];

    /// Name used on the wire and in markup.
    pub fn as_str(self) -> &'static str {
        match self {
            PieceKind::Atom => "atom",
            PieceKind::Bond => "bond",
            PieceKind::LonePair => "lone-pair",
        }
    }

    /// Heading shown above this kind's palette group.
    pub fn heading(self) -> &'static str {
        match self {
            PieceKind::Atom => "Atoms",
            PieceKind::Bond => "Bonds",
            PieceKind::LonePair => "Electron Pairs",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering hint for a glyph, fixed when the piece is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphStyle {
    /// Full-size glyph.
    #[default]
    Regular,
    /// Reduced font size (short vertical dash, lone-pair dots).
    Compact,
    /// Vertical bond drawn as `stacked` bars on top of each other.
    Vertical { stacked: u8 },
}

impl GlyphStyle {
    /// CSS class applied to the piece element, if any.
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            GlyphStyle::Regular => None,
            GlyphStyle::Compact => Some("compact"),
            GlyphStyle::Vertical { stacked: 0 | 1 } => Some("bond-v"),
            GlyphStyle::Vertical { stacked: 2 } => Some("double-v"),
            GlyphStyle::Vertical { .. } => Some("triple-v"),
        }
    }

    /// Line height in pixels for stacked vertical glyphs.
    pub fn line_height(self) -> Option<u32> {
        match self {
            GlyphStyle::Vertical { stacked: 0 | 1 } => Some(50),
            GlyphStyle::Vertical { stacked: 2 } => Some(40),
            GlyphStyle::Vertical { .. } => Some(30),
            _ => None,
        }
    }
}

/// View-only state toggled during a gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PieceVisual {
    /// The piece is being dragged.
    pub active: bool,
    /// The piece is close enough to its target that releasing would snap.
    pub pre_snap: bool,
}

/// A draggable canvas object.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    id: PieceId,
    label: String,
    kind: PieceKind,
    style: GlyphStyle,
    /// Top-left corner in canvas-local pixels.
    pub position: Point,
    pub visual: PieceVisual,
}

impl Piece {
    /// Create a new piece.
    pub fn new(id: PieceId, label: impl Into<String>, kind: PieceKind, style: GlyphStyle, position: Point) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
            style,
            position,
            visual: PieceVisual::default(),
        }
    }

    pub fn id(&self) -> &PieceId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn style(&self) -> GlyphStyle {
        self.style
    }
}
