//! Change notifications sent from the canvas to its host.
//!
//! Every mutating canvas operation emits exactly one [`Notification`],
//! synchronously and in the order the operations happened. On the wire a
//! notification is a flat JSON object:
//!
//! ```json
//! { "id": "piece-1", "x": 120, "y": 80, "deleted": false, "label": "C", "type": "atom" }
//! ```

use crate::piece::{PieceId, PieceKind};
use kurbo::Point;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::mpsc::Sender;

/// A piece state change.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A piece was spawned from the palette.
    Created {
        id: PieceId,
        position: Point,
        label: String,
        kind: PieceKind,
    },
    /// A drag ended. `identity` is present when the canvas re-sends label
    /// and kind with every move.
    Moved {
        id: PieceId,
        position: Point,
        identity: Option<(String, PieceKind)>,
    },
    /// A piece was removed through its delete control.
    Deleted { id: PieceId },
}

impl Notification {
    pub fn id(&self) -> &PieceId {
        match self {
            Notification::Created { id, .. } | Notification::Moved { id, .. } | Notification::Deleted { id } => id,
        }
    }

    /// Encode for the host channel.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&WireNotification::from(self))
    }
}

/// Shape of the drag-end notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveReport {
    /// Only id and position (fixed-molecule canvases).
    PositionOnly,
    /// Id, position, label, kind and `deleted: false`.
    #[default]
    Full,
}

/// Notification as it crosses the canvas boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireNotification {
    pub id: PieceId,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub label: Option<String>,
    /// Unrecognized kinds decode as `None`; the rest of the message stands.
    #[serde(default, rename = "type", deserialize_with = "lenient_kind")]
    pub kind: Option<PieceKind>,
}

fn lenient_kind<'de, D>(deserializer: D) -> Result<Option<PieceKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value::<PieceKind>(value.clone()) {
        Ok(kind) => Ok(Some(kind)),
        Err(_) => {
            log::warn!("Ignoring unknown piece type {}", value);
            Ok(None)
        }
    }
}

impl WireNotification {
    /// Position carried by the message, if both coordinates are present.
    pub fn position(&self) -> Option<Point> {
        Some(Point::new(self.x?, self.y?))
    }
}

impl From<&Notification> for WireNotification {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::Created { id, position, label, kind } => Self {
                id: id.clone(),
                x: Some(position.x),
                y: Some(position.y),
                deleted: false,
                label: Some(label.clone()),
                kind: Some(*kind),
            },
            Notification::Moved { id, position, identity } => Self {
                id: id.clone(),
                x: Some(position.x),
                y: Some(position.y),
                deleted: false,
                label: identity.as_ref().map(|(label, _)| label.clone()),
                kind: identity.as_ref().map(|(_, kind)| *kind),
            },
            Notification::Deleted { id } => Self {
                id: id.clone(),
                x: None,
                y: None,
                deleted: true,
                label: None,
                kind: None,
            },
        }
    }
}

impl From<Notification> for WireNotification {
    fn from(notification: Notification) -> Self {
        Self::from(&notification)
    }
}

/// Receiver of canvas notifications.
pub trait NotificationSink {
    /// Deliver one notification. Called synchronously from the gesture
    /// that produced it.
    fn notify(&mut self, notification: Notification);
}

impl<S: NotificationSink + ?Sized> NotificationSink for &mut S {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

impl NotificationSink for Sender<Notification> {
    fn notify(&mut self, notification: Notification) {
        if self.send(notification).is_err() {
            log::warn!("Notification receiver dropped; update lost");
        }
    }
}

/// Ordered in-memory record of notifications.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Notification> {
        self.entries.last()
    }

    /// Take all recorded notifications, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.entries)
    }
}

impl NotificationSink for NotificationLog {
    fn notify(&mut self, notification: Notification) {
        self.entries.push(notification);
    }
}
