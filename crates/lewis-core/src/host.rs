//! Host-side record of what is on a canvas.
//!
//! A [`PieceStore`] is rebuilt purely from canvas notifications. One store
//! belongs to one browser session; nothing here is shared between sessions.
//! A bad message never disturbs the stored state.

use crate::canvas::CanvasConfig;
use crate::notification::{Notification, NotificationSink, WireNotification};
use crate::piece::{PieceId, PieceKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while applying a notification.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Undecodable notification: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Notification for {0} carries no position")]
    MissingPosition(PieceId),
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Last known state of one piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPiece {
    pub x: f64,
    pub y: f64,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<PieceKind>,
}

/// What applying a notification did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Inserted,
    Updated,
    Removed,
    /// Deletion of an id that was not stored.
    Unchanged,
}

/// Mapping from piece id to its last reported state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceStore {
    pieces: BTreeMap<PieceId, StoredPiece>,
}

impl PieceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with a canvas's pre-placed pieces.
    pub fn seeded(config: &CanvasConfig) -> Self {
        let mut store = Self::new();
        store.seed(config);
        store
    }

    /// Record pre-placed pieces that the store does not know yet.
    pub fn seed(&mut self, config: &CanvasConfig) {
        for placement in &config.placements {
            self.pieces.entry(placement.id.clone()).or_insert_with(|| StoredPiece {
                x: placement.position.x,
                y: placement.position.y,
                label: Some(placement.label.clone()),
                kind: Some(placement.kind),
            });
        }
    }

    /// Apply one notification.
    ///
    /// Deletion removes the id (absent ids are a no-op). Anything else
    /// upserts the position; label and kind are only overwritten when the
    /// notification carries them.
    pub fn apply(&mut self, notification: WireNotification) -> HostResult<ApplyOutcome> {
        let WireNotification { id, x, y, deleted, label, kind } = notification;

        if deleted {
            return Ok(match self.pieces.remove(&id) {
                Some(_) => ApplyOutcome::Removed,
                None => ApplyOutcome::Unchanged,
            });
        }

        let (Some(x), Some(y)) = (x, y) else {
            return Err(HostError::MissingPosition(id));
        };

        match self.pieces.get_mut(&id) {
            Some(stored) => {
                stored.x = x;
                stored.y = y;
                if label.is_some() {
                    stored.label = label;
                }
                if kind.is_some() {
                    stored.kind = kind;
                }
                Ok(ApplyOutcome::Updated)
            }
            None => {
                self.pieces.insert(id, StoredPiece { x, y, label, kind });
                Ok(ApplyOutcome::Inserted)
            }
        }
    }

    /// Decode and apply a JSON notification.
    pub fn apply_json(&mut self, payload: &str) -> HostResult<ApplyOutcome> {
        let notification: WireNotification = serde_json::from_str(payload)?;
        self.apply(notification)
    }

    /// Apply a JSON notification, dropping it with a warning if it is
    /// malformed.
    pub fn ingest(&mut self, payload: &str) -> Option<ApplyOutcome> {
        match self.apply_json(payload) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                log::warn!("Dropping notification: {}", e);
                None
            }
        }
    }

    pub fn get(&self, id: &PieceId) -> Option<&StoredPiece> {
        self.pieces.get(id)
    }

    pub fn contains(&self, id: &PieceId) -> bool {
        self.pieces.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Stored pieces ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&PieceId, &StoredPiece)> {
        self.pieces.iter()
    }

    /// Debug dump: `{ id: { x, y, label, type } }`.
    pub fn dump(&self) -> serde_json::Value {
        serde_json::to_value(&self.pieces).unwrap_or_default()
    }

    /// Pretty-printed debug dump.
    pub fn dump_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.pieces).unwrap_or_else(|_| "{}".to_string())
    }
}

impl NotificationSink for PieceStore {
    fn notify(&mut self, notification: Notification) {
        if let Err(e) = self.apply(WireNotification::from(&notification)) {
            log::warn!("Dropping notification: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, Change};
    use kurbo::Point;
    use serde_json::json;

    fn store_with_carbon() -> PieceStore {
        let mut store = PieceStore::new();
        store
            .apply_json(r#"{"id":"piece-1","x":10,"y":10,"deleted":false,"label":"C","type":"atom"}"#)
            .unwrap();
        store
    }

    #[test]
    fn test_insert_full_notification() {
        let store = store_with_carbon();
        assert_eq!(
            store.get(&"piece-1".into()),
            Some(&StoredPiece { x: 10.0, y: 10.0, label: Some("C".to_string()), kind: Some(PieceKind::Atom) })
        );
    }

    #[test]
    fn test_partial_update_preserves_identity() {
        let mut store = store_with_carbon();
        let outcome = store.apply_json(r#"{"id":"piece-1","x":20,"y":30,"deleted":false}"#).unwrap();

        assert_eq!(outcome, ApplyOutcome::Updated);
        assert_eq!(store.dump(), json!({ "piece-1": { "x": 20.0, "y": 30.0, "label": "C", "type": "atom" } }));
    }

    #[test]
    fn test_null_identity_counts_as_absent() {
        let mut store = store_with_carbon();
        store
            .apply_json(r#"{"id":"piece-1","x":5,"y":6,"deleted":false,"label":null,"type":null}"#)
            .unwrap();
        let stored = store.get(&"piece-1".into()).unwrap();
        assert_eq!(stored.label.as_deref(), Some("C"));
        assert_eq!(stored.kind, Some(PieceKind::Atom));
    }

    #[test]
    fn test_new_id_without_identity() {
        let mut store = PieceStore::new();
        assert_eq!(store.apply_json(r#"{"id":"H1","x":250,"y":150}"#).unwrap(), ApplyOutcome::Inserted);
        let stored = store.get(&"H1".into()).unwrap();
        assert!(stored.label.is_none());
        assert!(stored.kind.is_none());
    }

    #[test]
    fn test_idempotent_deletion() {
        let mut store = store_with_carbon();
        let before = store.clone();

        let outcome = store.apply_json(r#"{"id":"piece-404","x":null,"y":null,"deleted":true}"#).unwrap();

        assert_eq!(outcome, ApplyOutcome::Unchanged);
        assert_eq!(store, before);
    }

    #[test]
    fn test_deletion_removes_entry() {
        let mut store = store_with_carbon();
        assert_eq!(store.apply_json(r#"{"id":"piece-1","deleted":true}"#).unwrap(), ApplyOutcome::Removed);
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_id_leaves_store_untouched() {
        let mut store = store_with_carbon();
        let before = serde_json::to_string(&store).unwrap();

        assert!(matches!(store.apply_json(r#"{"x":1,"y":2,"deleted":false}"#), Err(HostError::Decode(_))));
        assert!(store.ingest(r#"{"x":1,"y":2,"deleted":false}"#).is_none());

        assert_eq!(serde_json::to_string(&store).unwrap(), before);
    }

    #[test]
    fn test_garbage_is_ignored() {
        let mut store = store_with_carbon();
        let before = store.clone();
        for payload in ["", "not json", "[]", r#"{"id":7,"x":1,"y":1}"#, r#"{"id":"a","x":"left","y":1}"#] {
            assert!(store.ingest(payload).is_none(), "accepted {payload:?}");
        }
        assert_eq!(store, before);
    }

    #[test]
    fn test_unknown_type_still_moves_piece() {
        let mut store = store_with_carbon();
        let outcome = store.ingest(r#"{"id":"piece-1","x":40,"y":50,"deleted":false,"type":"ion"}"#);
        assert!(outcome.is_some());
        assert_eq!(
            store.dump(),
            json!({ "piece-1": { "x": 40.0, "y": 50.0, "label": "C", "type": "atom" } })
        );
    }

    #[test]
    fn test_missing_position_is_rejected() {
        let mut store = store_with_carbon();
        let before = store.clone();
        assert!(matches!(
            store.apply_json(r#"{"id":"piece-1","deleted":false,"label":"N"}"#),
            Err(HostError::MissingPosition(_))
        ));
        assert_eq!(store, before);
    }

    #[test]
    fn test_empty_dump() {
        let store = PieceStore::new();
        assert_eq!(store.dump(), json!({}));
        assert_eq!(store.dump_pretty(), "{}");
    }

    #[test]
    fn test_seed_from_config() {
        let config = CanvasConfig::ammonia();
        let mut store = PieceStore::seeded(&config);
        assert_eq!(store.len(), 15);

        store.apply_json(r#"{"id":"N","x":1,"y":2}"#).unwrap();
        store.seed(&config);
        let n = store.get(&"N".into()).unwrap();
        assert_eq!((n.x, n.y), (1.0, 2.0));
        assert_eq!(n.label.as_deref(), Some("N"));
    }

    #[test]
    fn test_spawn_then_delete_leaves_no_trace() {
        let mut store = store_with_carbon();
        let before = store.clone();

        let mut canvas = Canvas::new(CanvasConfig::free_form(), &mut store);
        let Change::Created(id) = canvas.spawn_from_palette(0, Point::new(50.0, 50.0)) else {
            panic!("expected a created piece");
        };
        canvas.end_drag(Point::new(50.0, 50.0));
        assert_eq!(canvas.sink().len(), 2);
        canvas.delete_piece(&id);
        drop(canvas);

        assert!(!store.contains(&id));
        assert_eq!(store, before);
    }

    #[test]
    fn test_snapped_release_reaches_store() {
        let config = CanvasConfig::ammonia();
        let mut store = PieceStore::seeded(&config);
        let mut canvas = Canvas::new(config, &mut store);

        canvas.begin_drag(&"vdash".into(), Point::new(700.0, 50.0));
        canvas.end_drag(Point::new(710.0, 55.0));
        canvas.begin_drag(&"dbl_h".into(), Point::new(700.0, 350.0));
        canvas.end_drag(Point::new(760.0, 350.0));
        drop(canvas);

        let vdash = store.get(&"vdash".into()).unwrap();
        assert_eq!((vdash.x, vdash.y), (700.0, 50.0));
        assert_eq!(vdash.label.as_deref(), Some("|"));
        let dbl_h = store.get(&"dbl_h".into()).unwrap();
        assert_eq!((dbl_h.x, dbl_h.y), (760.0, 350.0));
    }
}
