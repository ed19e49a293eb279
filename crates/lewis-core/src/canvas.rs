//! Canvas state and the interaction engine.

use crate::drag::DragState;
use crate::host::PieceStore;
use crate::input::{PointerEvent, PointerTarget};
use crate::notification::{MoveReport, Notification, NotificationSink};
use crate::palette::Palette;
use crate::piece::{GlyphStyle, Piece, PieceId, PieceKind};
use crate::snap::SnapConfig;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default canvas size in pixels.
pub const DEFAULT_CANVAS_SIZE: Size = Size::new(900.0, 600.0);

/// Where palette spawns appear.
pub const DEFAULT_SPAWN_POSITION: Point = Point::new(50.0, 50.0);

/// A piece present when the canvas is constructed, with a fixed id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: PieceId,
    pub label: String,
    pub kind: PieceKind,
    #[serde(default)]
    pub style: GlyphStyle,
    pub position: Point,
}

impl Placement {
    fn new(id: &str, label: &str, kind: PieceKind, style: GlyphStyle, x: f64, y: f64) -> Self {
        Self {
            id: PieceId::new(id),
            label: label.to_string(),
            kind,
            style,
            position: Point::new(x, y),
        }
    }
}

/// Configuration of one canvas instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// URL-safe name.
    pub name: String,
    /// Heading shown above the canvas.
    pub title: String,
    #[serde(default = "default_size")]
    pub size: Size,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default = "default_spawn_position")]
    pub spawn_position: Point,
    /// Pieces get a delete control.
    #[serde(default)]
    pub delete_enabled: bool,
    #[serde(default)]
    pub move_report: MoveReport,
    #[serde(default)]
    pub snap: Option<SnapConfig>,
    #[serde(default)]
    pub placements: Vec<Placement>,
}

fn default_size() -> Size {
    DEFAULT_CANVAS_SIZE
}

fn default_spawn_position() -> Point {
    DEFAULT_SPAWN_POSITION
}

impl CanvasConfig {
    /// Free-form canvas with the given palette and no snapping.
    pub fn new(name: impl Into<String>, title: impl Into<String>, palette: Palette) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            size: DEFAULT_CANVAS_SIZE,
            palette,
            spawn_position: DEFAULT_SPAWN_POSITION,
            delete_enabled: false,
            move_report: MoveReport::Full,
            snap: None,
            placements: Vec::new(),
        }
    }

    /// Organic molecule builder.
    pub fn organic() -> Self {
        Self::new("organic", "Organic Molecule Builder", Palette::organic())
    }

    /// Inorganic molecule builder.
    pub fn inorganic() -> Self {
        Self::new("inorganic", "Inorganic Molecule Builder", Palette::inorganic())
    }

    /// Free-form builder whose pieces can be deleted.
    pub fn free_form() -> Self {
        Self {
            delete_enabled: true,
            ..Self::new("free-form", "Free-Form Molecule Builder", Palette::free_form())
        }
    }

    /// Fixed ammonia molecule: every piece is pre-placed and snaps to its
    /// slot in the Lewis structure.
    pub fn ammonia() -> Self {
        use GlyphStyle::{Compact, Regular, Vertical};
        use PieceKind::{Atom, Bond, LonePair};

        let placements = vec![
            Placement::new("N", "N", Atom, Regular, 350.0, 150.0),
            Placement::new("H1", "H", Atom, Regular, 100.0, 50.0),
            Placement::new("H2", "H", Atom, Regular, 600.0, 50.0),
            Placement::new("H3", "H", Atom, Regular, 350.0, 300.0),
            Placement::new("bond1", "-", Bond, Regular, 250.0, 150.0),
            Placement::new("bond2", "-", Bond, Regular, 450.0, 150.0),
            Placement::new("bond3", "|", Bond, Vertical { stacked: 1 }, 350.0, 225.0),
            Placement::new("lone", "••", LonePair, Compact, 350.0, 75.0),
            Placement::new("vdash", "|", Bond, Vertical { stacked: 1 }, 700.0, 50.0),
            Placement::new("dots_h", "••", LonePair, Compact, 700.0, 150.0),
            Placement::new("dots_v", "•\n•", LonePair, Compact, 700.0, 250.0),
            Placement::new("dbl_h", "=", Bond, Regular, 700.0, 350.0),
            Placement::new("dbl_v", "|\n|", Bond, Vertical { stacked: 2 }, 750.0, 350.0),
            Placement::new("tpl_h", "≡", Bond, Regular, 700.0, 420.0),
            Placement::new("tpl_v", "|\n|\n|", Bond, Vertical { stacked: 3 }, 750.0, 420.0),
        ];

        let targets: HashMap<PieceId, Point> = [
            ("N", 350.0, 150.0),
            ("H1", 250.0, 150.0),
            ("H2", 450.0, 150.0),
            ("H3", 350.0, 260.0),
            ("bond1", 300.0, 150.0),
            ("bond2", 400.0, 150.0),
            ("bond3", 350.0, 200.0),
            ("lone", 350.0, 80.0),
            ("vdash", 700.0, 50.0),
            ("dots_h", 700.0, 150.0),
            ("dots_v", 700.0, 250.0),
            ("dbl_h", 700.0, 350.0),
            ("dbl_v", 750.0, 350.0),
            ("tpl_h", 700.0, 420.0),
            ("tpl_v", 750.0, 420.0),
        ]
        .into_iter()
        .map(|(id, x, y)| (PieceId::new(id), Point::new(x, y)))
        .collect();

        Self {
            size: Size::new(900.0, 550.0),
            move_report: MoveReport::PositionOnly,
            snap: Some(SnapConfig::new(targets)),
            placements,
            ..Self::new("ammonia", "Build NH\u{2083} with Bonds & Lone Pairs", Palette::default())
        }
    }

    /// The built-in canvases, in tab order.
    pub fn presets() -> Vec<CanvasConfig> {
        vec![Self::organic(), Self::inorganic(), Self::free_form(), Self::ammonia()]
    }

    /// Glyph style of a palette entry, `Regular` when none matches.
    pub fn style_for(&self, label: &str, kind: PieceKind) -> GlyphStyle {
        self.palette
            .iter()
            .find(|(_, entry)| entry.label == label && entry.kind == kind)
            .map(|(_, entry)| entry.style)
            .unwrap_or_default()
    }

    /// This configuration with pre-placed pieces moved to where `store`
    /// last saw them, plus every stored spawn whose identity is known.
    pub fn restored(&self, store: &PieceStore) -> CanvasConfig {
        let mut config = self.clone();
        for placement in &mut config.placements {
            if let Some(stored) = store.get(&placement.id) {
                placement.position = Point::new(stored.x, stored.y);
            }
        }

        let placed: HashSet<PieceId> = config.placements.iter().map(|p| p.id.clone()).collect();
        for (id, stored) in store.iter() {
            if placed.contains(id) {
                continue;
            }
            let (Some(label), Some(kind)) = (&stored.label, stored.kind) else {
                continue;
            };
            config.placements.push(Placement {
                id: id.clone(),
                label: label.clone(),
                kind,
                style: self.style_for(label, kind),
                position: Point::new(stored.x, stored.y),
            });
        }
        config
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// What a canvas operation did, so a view can mirror it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A piece was spawned and is now being dragged.
    Created(PieceId),
    /// A drag started on an existing piece.
    Grabbed(PieceId),
    /// The dragged piece moved.
    Moved(PieceId),
    /// The drag ended and the piece settled.
    Released(PieceId),
    /// A piece was deleted.
    Removed(PieceId),
    /// The event had no effect.
    Ignored,
}

/// The interaction engine: pieces on one canvas, the active drag, and the
/// sink that receives notifications.
pub struct Canvas<S: NotificationSink> {
    config: CanvasConfig,
    pieces: HashMap<PieceId, Piece>,
    /// Back to front.
    z_order: Vec<PieceId>,
    drag: DragState,
    sink: S,
}

impl<S: NotificationSink> Canvas<S> {
    /// Create a canvas with its pre-placed pieces. Placing them emits no
    /// notifications.
    pub fn new(config: CanvasConfig, sink: S) -> Self {
        let mut canvas = Self {
            config,
            pieces: HashMap::new(),
            z_order: Vec::new(),
            drag: DragState::Idle,
            sink,
        };
        for placement in canvas.config.placements.clone() {
            canvas.insert(Piece::new(
                placement.id,
                placement.label,
                placement.kind,
                placement.style,
                placement.position,
            ));
        }
        canvas
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn get(&self, id: &PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Pieces back to front.
    pub fn pieces_ordered(&self) -> impl Iterator<Item = &Piece> {
        self.z_order.iter().filter_map(|id| self.pieces.get(id))
    }

    /// The piece under an active drag.
    pub fn active_piece(&self) -> Option<&Piece> {
        self.drag.piece().and_then(|id| self.pieces.get(id))
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Route a pointer event to the matching operation.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Change {
        match event {
            PointerEvent::Down { position, target } => match target {
                PointerTarget::Palette(index) => self.spawn_from_palette(index, position),
                PointerTarget::Piece(id) => self.begin_drag(&id, position),
                PointerTarget::DeleteControl(id) => self.delete_piece(&id),
                PointerTarget::Canvas => Change::Ignored,
            },
            PointerEvent::Move { position } => self.drag_to(position),
            PointerEvent::Up { position } => self.end_drag(position),
        }
    }

    /// Spawn a piece from a palette entry at the spawn position and start
    /// dragging it with the same gesture.
    pub fn spawn_from_palette(&mut self, index: usize, pointer: Point) -> Change {
        if self.drag.is_dragging() {
            log::debug!("Ignoring palette press during an active drag");
            return Change::Ignored;
        }
        let Some(entry) = self.config.palette.get(index) else {
            log::warn!("No palette entry at index {}", index);
            return Change::Ignored;
        };

        let id = self.fresh_id();
        let position = self.config.spawn_position;
        let mut piece = Piece::new(id.clone(), entry.label.clone(), entry.kind, entry.style, position);
        piece.visual.active = true;
        let notification = Notification::Created {
            id: id.clone(),
            position,
            label: entry.label.clone(),
            kind: entry.kind,
        };

        self.insert(piece);
        self.drag.begin(id.clone(), position, pointer);
        log::debug!("Spawned {} from palette entry {}", id, index);
        self.sink.notify(notification);
        Change::Created(id)
    }

    /// Grab an existing piece.
    pub fn begin_drag(&mut self, id: &PieceId, pointer: Point) -> Change {
        if self.drag.is_dragging() {
            log::debug!("Ignoring press on {} during an active drag", id);
            return Change::Ignored;
        }
        let Some(piece) = self.pieces.get_mut(id) else {
            return Change::Ignored;
        };
        piece.visual.active = true;
        self.drag.begin(id.clone(), piece.position, pointer);
        self.raise(id);
        log::debug!("Grabbed {}", id);
        Change::Grabbed(id.clone())
    }

    /// Follow the pointer with the active piece.
    pub fn drag_to(&mut self, pointer: Point) -> Change {
        let (Some(id), Some(position)) = (self.drag.piece().cloned(), self.drag.position_for(pointer)) else {
            return Change::Ignored;
        };
        let pre_snap = self
            .config
            .snap
            .as_ref()
            .is_some_and(|snap| snap.affordance(&id, position));
        let Some(piece) = self.pieces.get_mut(&id) else {
            return Change::Ignored;
        };
        piece.position = position;
        piece.visual.pre_snap = pre_snap;
        Change::Moved(id)
    }

    /// Release the active piece, snapping it onto its target when close
    /// enough, and report its final position.
    pub fn end_drag(&mut self, pointer: Point) -> Change {
        let Some((id, position)) = self.drag.finish(pointer) else {
            return Change::Ignored;
        };
        let resolved = match &self.config.snap {
            Some(snap) => snap.resolve(&id, position),
            None => crate::snap::SnapResult::none(position),
        };
        let Some(piece) = self.pieces.get_mut(&id) else {
            return Change::Ignored;
        };
        piece.position = resolved.point;
        piece.visual = Default::default();

        let identity = match self.config.move_report {
            MoveReport::Full => Some((piece.label().to_string(), piece.kind())),
            MoveReport::PositionOnly => None,
        };
        if resolved.snapped {
            log::debug!("Snapped {} to ({}, {})", id, resolved.point.x, resolved.point.y);
        }
        self.sink.notify(Notification::Moved {
            id: id.clone(),
            position: resolved.point,
            identity,
        });
        Change::Released(id)
    }

    /// Remove a piece through its delete control.
    pub fn delete_piece(&mut self, id: &PieceId) -> Change {
        if !self.config.delete_enabled || self.drag.is_dragging() {
            return Change::Ignored;
        }
        if self.pieces.remove(id).is_none() {
            return Change::Ignored;
        }
        self.z_order.retain(|piece_id| piece_id != id);
        log::debug!("Deleted {}", id);
        self.sink.notify(Notification::Deleted { id: id.clone() });
        Change::Removed(id.clone())
    }

    fn insert(&mut self, piece: Piece) {
        let id = piece.id().clone();
        if self.pieces.insert(id.clone(), piece).is_none() {
            self.z_order.push(id);
        }
    }

    /// Bring a piece to the front.
    fn raise(&mut self, id: &PieceId) {
        self.z_order.retain(|piece_id| piece_id != id);
        self.z_order.push(id.clone());
    }

    fn fresh_id(&self) -> PieceId {
        loop {
            let id = PieceId::generate();
            if !self.pieces.contains_key(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationLog;
    use std::collections::HashSet;

    fn organic() -> Canvas<NotificationLog> {
        Canvas::new(CanvasConfig::organic(), NotificationLog::new())
    }

    fn ammonia() -> Canvas<NotificationLog> {
        Canvas::new(CanvasConfig::ammonia(), NotificationLog::new())
    }

    fn carbon_index(canvas: &Canvas<NotificationLog>) -> usize {
        canvas
            .config()
            .palette
            .iter()
            .find(|(_, e)| e.label == "C")
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn test_spawn_emits_created_at_default_position() {
        let mut canvas = organic();
        let index = carbon_index(&canvas);

        let Change::Created(id) = canvas.spawn_from_palette(index, Point::new(-80.0, 120.0)) else {
            panic!("expected a created piece");
        };

        let piece = canvas.get(&id).unwrap();
        assert_eq!(piece.position, DEFAULT_SPAWN_POSITION);
        assert_eq!(piece.label(), "C");
        assert_eq!(piece.kind(), PieceKind::Atom);
        assert!(piece.visual.active);
        assert_eq!(
            canvas.sink().entries(),
            &[Notification::Created {
                id: id.clone(),
                position: DEFAULT_SPAWN_POSITION,
                label: "C".to_string(),
                kind: PieceKind::Atom,
            }]
        );
    }

    #[test]
    fn test_spawn_gesture_places_piece() {
        let mut canvas = organic();
        let index = carbon_index(&canvas);

        // Grabbed 10px right and 20px below the spawn corner.
        let Change::Created(id) = canvas.spawn_from_palette(index, Point::new(60.0, 70.0)) else {
            panic!("expected a created piece");
        };
        assert_eq!(canvas.drag_to(Point::new(160.0, 170.0)), Change::Moved(id.clone()));
        assert_eq!(canvas.end_drag(Point::new(210.0, 220.0)), Change::Released(id.clone()));

        assert_eq!(canvas.get(&id).unwrap().position, Point::new(200.0, 200.0));
        assert_eq!(canvas.sink().len(), 2);
        assert_eq!(
            canvas.sink().last(),
            Some(&Notification::Moved {
                id,
                position: Point::new(200.0, 200.0),
                identity: Some(("C".to_string(), PieceKind::Atom)),
            })
        );
    }

    #[test]
    fn test_spawned_ids_are_unique() {
        let mut canvas = organic();
        let mut ids = HashSet::new();
        for i in 0..50 {
            let Change::Created(id) = canvas.spawn_from_palette(i % canvas.config().palette.len(), Point::ZERO) else {
                panic!("expected a created piece");
            };
            canvas.end_drag(Point::ZERO);
            ids.insert(id);
        }
        assert_eq!(ids.len(), 50);
        assert_eq!(canvas.len(), 50);
    }

    #[test]
    fn test_grab_does_not_jump() {
        let mut canvas = ammonia();
        let id = PieceId::new("N");

        canvas.begin_drag(&id, Point::new(360.0, 170.0));
        canvas.drag_to(Point::new(360.0, 170.0));

        assert_eq!(canvas.get(&id).unwrap().position, Point::new(350.0, 150.0));
    }

    #[test]
    fn test_snap_commit() {
        let mut canvas = ammonia();
        let id = PieceId::new("vdash");

        canvas.begin_drag(&id, Point::new(705.0, 55.0));
        canvas.end_drag(Point::new(715.0, 60.0));

        assert_eq!(canvas.get(&id).unwrap().position, Point::new(700.0, 50.0));
        assert_eq!(
            canvas.sink().last(),
            Some(&Notification::Moved {
                id,
                position: Point::new(700.0, 50.0),
                identity: None,
            })
        );
    }

    #[test]
    fn test_release_outside_radius_keeps_position() {
        let mut canvas = ammonia();
        let id = PieceId::new("vdash");

        canvas.begin_drag(&id, Point::new(700.0, 50.0));
        canvas.end_drag(Point::new(760.0, 50.0));

        assert_eq!(canvas.get(&id).unwrap().position, Point::new(760.0, 50.0));
    }

    #[test]
    fn test_pre_snap_affordance_does_not_commit() {
        let mut canvas = ammonia();
        let id = PieceId::new("vdash");

        canvas.begin_drag(&id, Point::new(700.0, 50.0));
        canvas.drag_to(Point::new(760.0, 50.0));
        assert!(!canvas.get(&id).unwrap().visual.pre_snap);

        canvas.drag_to(Point::new(750.0, 50.0));
        assert!(canvas.get(&id).unwrap().visual.pre_snap);
        // Dragging never alters the position beyond the pointer translation.
        assert_eq!(canvas.get(&id).unwrap().position, Point::new(750.0, 50.0));

        canvas.end_drag(Point::new(750.0, 50.0));
        let piece = canvas.get(&id).unwrap();
        assert_eq!(piece.position, Point::new(750.0, 50.0));
        assert!(!piece.visual.pre_snap);
        assert!(!piece.visual.active);
    }

    #[test]
    fn test_second_press_during_drag_is_ignored() {
        let mut canvas = ammonia();
        let n = PieceId::new("N");

        canvas.begin_drag(&n, Point::new(355.0, 155.0));
        assert_eq!(canvas.begin_drag(&"H1".into(), Point::new(100.0, 50.0)), Change::Ignored);
        assert_eq!(canvas.spawn_from_palette(0, Point::ZERO), Change::Ignored);

        canvas.drag_to(Point::new(405.0, 205.0));
        assert_eq!(canvas.get(&n).unwrap().position, Point::new(400.0, 200.0));
        assert_eq!(canvas.active_piece().map(Piece::id), Some(&n));
    }

    #[test]
    fn test_grab_raises_piece() {
        let mut canvas = ammonia();
        canvas.begin_drag(&"N".into(), Point::new(350.0, 150.0));
        assert_eq!(canvas.pieces_ordered().last().unwrap().id().as_str(), "N");
    }

    #[test]
    fn test_move_and_release_without_drag_are_ignored() {
        let mut canvas = organic();
        assert_eq!(canvas.drag_to(Point::new(1.0, 1.0)), Change::Ignored);
        assert_eq!(canvas.end_drag(Point::new(1.0, 1.0)), Change::Ignored);
        assert!(canvas.sink().is_empty());
    }

    #[test]
    fn test_delete_piece() {
        let mut canvas = Canvas::new(CanvasConfig::free_form(), NotificationLog::new());
        let Change::Created(id) = canvas.spawn_from_palette(0, Point::new(55.0, 55.0)) else {
            panic!("expected a created piece");
        };
        // Delete is not honored mid-gesture.
        assert_eq!(canvas.delete_piece(&id), Change::Ignored);
        canvas.end_drag(Point::new(55.0, 55.0));

        let change = canvas.handle_pointer_event(PointerEvent::Down {
            position: Point::new(90.0, 50.0),
            target: PointerTarget::DeleteControl(id.clone()),
        });
        assert_eq!(change, Change::Removed(id.clone()));
        assert!(canvas.is_empty());
        assert!(!canvas.drag_state().is_dragging());
        assert_eq!(canvas.sink().last(), Some(&Notification::Deleted { id: id.clone() }));
        assert_eq!(canvas.delete_piece(&id), Change::Ignored);
    }

    #[test]
    fn test_delete_disabled() {
        let mut canvas = ammonia();
        assert_eq!(canvas.delete_piece(&"N".into()), Change::Ignored);
        assert_eq!(canvas.len(), 15);
        assert!(canvas.sink().is_empty());
    }

    #[test]
    fn test_pointer_event_dispatch() {
        let mut canvas = organic();
        let index = carbon_index(&canvas);
        let events = vec![
            PointerEvent::Down { position: Point::new(50.0, 50.0), target: PointerTarget::Palette(index) },
            PointerEvent::Move { position: Point::new(80.0, 90.0) },
            PointerEvent::Up { position: Point::new(100.0, 100.0) },
            PointerEvent::Down { position: Point::new(10.0, 10.0), target: PointerTarget::Canvas },
        ];
        let changes: Vec<Change> = events.into_iter().map(|e| canvas.handle_pointer_event(e)).collect();

        assert!(matches!(changes[0], Change::Created(_)));
        assert!(matches!(changes[1], Change::Moved(_)));
        assert!(matches!(changes[2], Change::Released(_)));
        assert_eq!(changes[3], Change::Ignored);
        assert_eq!(canvas.sink().len(), 2);
    }

    #[test]
    fn test_unknown_palette_index_is_ignored() {
        let mut canvas = organic();
        assert_eq!(canvas.spawn_from_palette(999, Point::ZERO), Change::Ignored);
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_ammonia_preset() {
        let config = CanvasConfig::ammonia();
        let snap = config.snap.as_ref().unwrap();
        assert_eq!(config.placements.len(), 15);
        assert!(config.placements.iter().all(|p| snap.target(&p.id).is_some()));
        assert!(ammonia().sink().is_empty());
    }

    #[test]
    fn test_restored_from_store() {
        let config = CanvasConfig::ammonia();
        let mut store = PieceStore::seeded(&config);
        store.apply_json(r#"{"id":"N","x":10,"y":20}"#).unwrap();
        let restored = config.restored(&store);
        let n = restored.placements.iter().find(|p| p.id.as_str() == "N").unwrap();
        assert_eq!(n.position, Point::new(10.0, 20.0));
        assert_eq!(restored.placements.len(), 15);

        let organic = CanvasConfig::organic();
        let mut store = PieceStore::new();
        store.apply_json(r#"{"id":"piece-a","x":5,"y":6,"label":"|","type":"lone-pair"}"#).unwrap();
        store.apply_json(r#"{"id":"piece-b","x":5,"y":6}"#).unwrap();
        let restored = organic.restored(&store);
        assert_eq!(restored.placements.len(), 1);
        assert_eq!(restored.placements[0].style, GlyphStyle::Compact);

        let canvas = Canvas::new(restored, NotificationLog::new());
        assert_eq!(canvas.get(&"piece-a".into()).unwrap().position, Point::new(5.0, 6.0));
    }

    #[test]
    fn test_config_json_defaults() {
        let json = r#"{"name":"salts","title":"Salts","palette":[{"label":"Na","kind":"atom"}]}"#;
        let config = CanvasConfig::from_json(json).unwrap();
        assert_eq!(config.size, DEFAULT_CANVAS_SIZE);
        assert_eq!(config.spawn_position, DEFAULT_SPAWN_POSITION);
        assert_eq!(config.move_report, MoveReport::Full);
        assert!(!config.delete_enabled);
        assert!(config.snap.is_none());

        let round = CanvasConfig::from_json(&CanvasConfig::ammonia().to_json().unwrap()).unwrap();
        assert_eq!(round, CanvasConfig::ammonia());
    }
}
