//! Type-safe coordinate spaces for the graph surface.
//!
//! # Coordinate Spaces
//!
//! - **World space**: where nodes live. Unscaled, independent of pan and zoom.
//! - **Screen space**: pixels relative to the drawing surface origin.
//!
//! The viewport owns the mapping between the two; these types only keep the
//! spaces from being mixed by accident.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint(pub Vec2);

/// Position in screen space (pixels relative to the drawing surface).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint(pub Vec2);

/// Movement in world space (not a position).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldDelta(pub Vec2);

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenSize(pub Vec2);

// === WorldPoint ===

impl WorldPoint {
    pub const ORIGIN: WorldPoint = WorldPoint(Vec2::ZERO);

    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    /// Snap to whole world units.
    pub fn round(&self) -> Self {
        Self(self.0.round())
    }

    /// True when both axes are closer than `tolerance` to `other`.
    ///
    /// This is the square hit test used for round nodes.
    pub fn within(&self, other: WorldPoint, tolerance: f32) -> bool {
        (self.0.x - other.0.x).abs() < tolerance && (self.0.y - other.0.y).abs() < tolerance
    }
}

impl From<Vec2> for WorldPoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<WorldPoint> for Vec2 {
    fn from(p: WorldPoint) -> Self {
        p.0
    }
}

impl Add<WorldDelta> for WorldPoint {
    type Output = WorldPoint;

    fn add(self, delta: WorldDelta) -> Self::Output {
        WorldPoint(self.0 + delta.0)
    }
}

impl Sub for WorldPoint {
    type Output = WorldDelta;

    fn sub(self, other: WorldPoint) -> Self::Output {
        WorldDelta(self.0 - other.0)
    }
}

// === ScreenPoint ===

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    pub fn distance(&self, other: ScreenPoint) -> f32 {
        self.0.distance(other.0)
    }
}

impl From<Vec2> for ScreenPoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<ScreenPoint> for Vec2 {
    fn from(p: ScreenPoint) -> Self {
        p.0
    }
}

// === WorldDelta ===

impl WorldDelta {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self(Vec2::new(dx, dy))
    }

    pub fn dx(&self) -> f32 {
        self.0.x
    }

    pub fn dy(&self) -> f32 {
        self.0.y
    }
}

// === ScreenSize ===

impl ScreenSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self(Vec2::new(width, height))
    }

    pub fn width(&self) -> f32 {
        self.0.x
    }

    pub fn height(&self) -> f32 {
        self.0.y
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint(self.0 / 2.0)
    }
}
