//! Static palettes of spawnable pieces.

use crate::piece::{GlyphStyle, PieceKind};
use serde::{Deserialize, Serialize};

/// Atom symbols offered by the organic builder.
pub const ORGANIC_ATOMS: &[&str] = &["H", "C", "N", "O", "F", "Cl"];
/// Atom symbols offered by the inorganic builder.
pub const INORGANIC_ATOMS: &[&str] = &["H", "C", "N", "O", "F", "Cl", "S", "P"];
/// Bond glyphs (single, double, triple).
pub const BONDS: &[&str] = &["-", "=", "≡"];

/// A spawnable piece template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub label: String,
    pub kind: PieceKind,
    #[serde(default)]
    pub style: GlyphStyle,
    /// Tooltip text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PaletteEntry {
    pub fn new(label: impl Into<String>, kind: PieceKind) -> Self {
        Self {
            label: label.into(),
            kind,
            style: GlyphStyle::Regular,
            description: None,
        }
    }

    pub fn with_style(mut self, style: GlyphStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An ordered list of palette entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    /// Palette of the organic builder tab.
    pub fn organic() -> Self {
        Self::with_atoms(ORGANIC_ATOMS)
    }

    /// Palette of the inorganic builder tab.
    pub fn inorganic() -> Self {
        Self::with_atoms(INORGANIC_ATOMS)
    }

    /// Palette of the free-form builder: every atom, every bond and one
    /// horizontal lone pair.
    pub fn free_form() -> Self {
        let mut entries: Vec<PaletteEntry> = INORGANIC_ATOMS
            .iter()
            .map(|&label| PaletteEntry::new(label, PieceKind::Atom))
            .collect();
        entries.extend(BONDS.iter().map(|&label| PaletteEntry::new(label, PieceKind::Bond)));
        entries.push(PaletteEntry::new("••", PieceKind::LonePair));
        Self { entries }
    }

    fn with_atoms(atoms: &[&str]) -> Self {
        let mut entries: Vec<PaletteEntry> = atoms
            .iter()
            .map(|&label| PaletteEntry::new(label, PieceKind::Atom))
            .collect();
        entries.extend(BONDS.iter().map(|&label| PaletteEntry::new(label, PieceKind::Bond)));
        entries.extend(electron_pairs());
        Self { entries }
    }

    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries with their palette index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &PaletteEntry)> {
        self.entries.iter().enumerate()
    }

    /// Entries of one kind, in palette order, with their palette index.
    pub fn group(&self, kind: PieceKind) -> impl Iterator<Item = (usize, &PaletteEntry)> {
        self.iter().filter(move |(_, entry)| entry.kind == kind)
    }
}

fn electron_pairs() -> [PaletteEntry; 3] {
    [
        PaletteEntry::new("|", PieceKind::LonePair)
            .with_style(GlyphStyle::Compact)
            .with_description("Vertical dash"),
        PaletteEntry::new("••", PieceKind::LonePair).with_description("Horizontal electron pair"),
        PaletteEntry::new(":", PieceKind::LonePair).with_description("Vertical electron pair"),
    ]
}
