//! Snap functionality for pulling pieces onto fixed target coordinates.
//!
//! Snapping uses two thresholds: a wide pre-snap radius that only drives a
//! visual affordance while dragging, and the narrower commit radius checked
//! once more at release.

use crate::piece::PieceId;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Distance (in canvas pixels) within which a released piece snaps.
pub const SNAP_RADIUS: f64 = 40.0;

/// Pre-snap affordance radius as a multiple of the snap radius.
pub const PRE_SNAP_FACTOR: f64 = 1.5;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The resolved point.
    pub point: Point,
    /// Whether the point was pulled onto a target.
    pub snapped: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self { point, snapped: false }
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Per-piece snap targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapConfig {
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_pre_snap_factor")]
    pub pre_snap_factor: f64,
    pub targets: HashMap<PieceId, Point>,
}

fn default_radius() -> f64 {
    SNAP_RADIUS
}

fn default_pre_snap_factor() -> f64 {
    PRE_SNAP_FACTOR
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl SnapConfig {
    /// Create a snap table with the standard radii.
    pub fn new(targets: HashMap<PieceId, Point>) -> Self {
        Self {
            radius: SNAP_RADIUS,
            pre_snap_factor: PRE_SNAP_FACTOR,
            targets,
        }
    }

    /// Target for a piece. `None` disables snapping for that piece.
    pub fn target(&self, id: &PieceId) -> Option<Point> {
        self.targets.get(id).copied()
    }

    /// Radius of the pre-snap affordance.
    pub fn pre_snap_radius(&self) -> f64 {
        self.radius * self.pre_snap_factor
    }

    /// Whether a piece at `position` should show the pre-snap affordance.
    pub fn affordance(&self, id: &PieceId, position: Point) -> bool {
        self.target(id)
            .is_some_and(|target| distance(position, target) < self.pre_snap_radius())
    }

    /// Resolve the final position of a released piece.
    pub fn resolve(&self, id: &PieceId, position: Point) -> SnapResult {
        match self.target(id) {
            Some(target) if distance(position, target) < self.radius => SnapResult {
                point: target,
                snapped: true,
            },
            _ => SnapResult::none(position),
        }
    }
}
