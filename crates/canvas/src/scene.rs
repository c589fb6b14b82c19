//! Toolkit-independent draw list produced once per frame.

use glam::Vec2;
use graph::ScreenPoint;
use smallvec::SmallVec;
use theme::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontKind {
    Sans,
    MonoBold,
}

/// Piecewise linear color ramp over `0.0..=1.0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    stops: SmallVec<[(f32, Color); 8]>,
}

impl Gradient {
    pub fn solid(color: Color) -> Self {
        let mut stops = SmallVec::new();
        stops.push((0.0, color));
        Self { stops }
    }

    /// Add a stop. Offsets are clamped to `0.0..=1.0` and kept sorted.
    pub fn with_stop(mut self, offset: f32, color: Color) -> Self {
        let offset = offset.clamp(0.0, 1.0);
        let index = self
            .stops
            .iter()
            .position(|(o, _)| *o > offset)
            .unwrap_or(self.stops.len());
        self.stops.insert(index, (offset, color));
        self
    }

    pub fn stops(&self) -> &[(f32, Color)] {
        &self.stops
    }

    pub fn color_at(&self, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let Some(&(first_offset, first)) = self.stops.first() else {
            return Color::new(0.0, 0.0, 0.0, 0.0);
        };
        if t <= first_offset {
            return first;
        }
        for pair in self.stops.windows(2) {
            let (a_offset, a) = pair[0];
            let (b_offset, b) = pair[1];
            if t <= b_offset {
                let span = b_offset - a_offset;
                if span <= f32::EPSILON {
                    return b;
                }
                return lerp(a, b, (t - a_offset) / span);
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

fn lerp(a: Color, b: Color, t: f32) -> Color {
    Color::new(
        a.red + (b.red - a.red) * t,
        a.green + (b.green - a.green) * t,
        a.blue + (b.blue - a.blue) * t,
        a.alpha + (b.alpha - a.alpha) * t,
    )
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        width: f32,
        color: Color,
    },
    /// A line colored along its length; `gradient` runs from `from` (0.0)
    /// to `to` (1.0).
    GradientLine {
        from: ScreenPoint,
        to: ScreenPoint,
        width: f32,
        gradient: Gradient,
    },
    Circle {
        center: ScreenPoint,
        radius: f32,
        color: Color,
    },
    Rect {
        origin: ScreenPoint,
        size: Vec2,
        fill: Color,
        stroke: Option<Color>,
    },
    /// Round-capped open stroke.
    Polyline {
        points: SmallVec<[ScreenPoint; 3]>,
        width: f32,
        color: Color,
    },
    /// Text centered on `center`.
    Text {
        text: String,
        center: ScreenPoint,
        size: f32,
        font: FontKind,
        color: Color,
    },
}

/// Cursor the host should show over the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorGlyph {
    #[default]
    Default,
    Pointer,
    Grab,
    Grabbing,
    Copy,
    NoDrop,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Clear color; `None` until the graph has loaded.
    pub background: Option<Color>,
    pub primitives: Vec<Primitive>,
    pub cursor: CursorGlyph,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.primitives.is_empty()
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn circles(&self) -> impl Iterator<Item = (ScreenPoint, f32, Color)> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Circle {
                center,
                radius,
                color,
            } => Some((*center, *radius, *color)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
