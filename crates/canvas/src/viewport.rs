use glam::Vec2;
use graph::{ScreenPoint, ScreenSize, WorldPoint};
use store::{ViewportPatch, ViewportRecord};

/// Smallest allowed zoom, in pixels per world unit.
pub const MIN_SCALE: f32 = 0.5;
/// Largest allowed zoom, in pixels per world unit.
pub const MAX_SCALE: f32 = 400.0;
pub const DEFAULT_SCALE: f32 = 20.0;

/// Camera over the graph: how many pixels one world unit spans, and which
/// world point sits at the top-left corner of the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    scale: f32,
    pub top_left: WorldPoint,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            top_left: WorldPoint::ORIGIN,
        }
    }
}

impl Viewport {
    pub fn new(scale: f32, top_left: WorldPoint) -> Self {
        let mut viewport = Self {
            scale: DEFAULT_SCALE,
            top_left,
        };
        viewport.scale = viewport.clamp_scale(scale);
        viewport
    }

    pub fn from_record(record: &ViewportRecord) -> Self {
        Self::new(record.scale, WorldPoint::new(record.x, record.y))
    }

    pub fn to_patch(&self) -> ViewportPatch {
        ViewportPatch {
            scale: Some(self.scale),
            position: Some(self.top_left),
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Non-finite requests keep the current scale.
    fn clamp_scale(&self, scale: f32) -> f32 {
        if scale.is_finite() {
            scale.clamp(MIN_SCALE, MAX_SCALE)
        } else {
            self.scale
        }
    }

    pub fn world_to_screen(&self, point: WorldPoint) -> ScreenPoint {
        ScreenPoint((point.0 - self.top_left.0) * self.scale)
    }

    pub fn screen_to_world(&self, point: ScreenPoint) -> WorldPoint {
        WorldPoint(point.0 / self.scale + self.top_left.0)
    }

    /// Change the scale while keeping the world point under `anchor` fixed.
    pub fn zoom_at(&mut self, anchor: ScreenPoint, new_scale: f32) {
        let new_scale = self.clamp_scale(new_scale);
        self.top_left = WorldPoint(self.top_left.0 + anchor.0 / self.scale - anchor.0 / new_scale);
        self.scale = new_scale;
    }

    /// Wheel zoom. Positive `delta_y` zooms out.
    pub fn wheel_zoom(&mut self, anchor: ScreenPoint, delta_y: f32) {
        let new_scale = self.scale - self.scale * delta_y / 1000.0;
        self.zoom_at(anchor, new_scale);
    }

    /// Move the camera so the content follows a pointer moved by `delta`
    /// screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.top_left = WorldPoint(self.top_left.0 - delta / self.scale);
    }

    /// Top-left that puts `world` in the middle of a surface of `size`.
    pub fn centered_top_left(&self, world: WorldPoint, size: ScreenSize) -> WorldPoint {
        WorldPoint(world.0 - size.0 / (2.0 * self.scale))
    }

    pub fn center_on(&mut self, world: WorldPoint, size: ScreenSize) {
        self.top_left = self.centered_top_left(world, size);
    }

    /// World point in the middle of the surface.
    pub fn world_center(&self, size: ScreenSize) -> WorldPoint {
        self.screen_to_world(size.center())
    }
}
