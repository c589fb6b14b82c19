//! Colors for the graph surface.
//!
//! Colors are plain `palette` values so the scene stays independent of the
//! host toolkit; the host converts them when painting.

use graph::Priority;
use palette::{named, Srgb, Srgba, WithAlpha};
use std::str::FromStr;

/// Color used throughout the scene, non-linear sRGB with alpha in `0.0..=1.0`.
pub type Color = Srgba;

/// Theme colors for the graph editor.
#[derive(Clone, Debug)]
pub struct Theme {
    /// Surface background
    pub canvas_background: Color,

    /// Grid lines
    pub grid: Color,

    /// Edge body
    pub edge: Color,

    /// Edge body when either end is complete
    pub edge_complete: Color,

    /// Edge color at the child end
    pub edge_child_end: Color,

    /// Edge color at the parent end
    pub edge_parent_end: Color,

    /// Fill for nodes without a priority color
    pub node_default: Color,

    /// Fill for completed nodes
    pub node_complete: Color,

    /// Fill for selected or hovered nodes
    pub node_selected: Color,

    /// Completion checkmark stroke
    pub checkmark: Color,

    /// Node labels
    pub label: Color,

    /// Marquee selection rectangle
    pub marquee: Color,

    /// Outline of the selection rectangle around a node
    pub selection_outline: Color,

    /// Countdown with more than a day left
    pub due_later: Color,

    /// Countdown with more than an hour left
    pub due_soon: Color,

    /// Countdown with an hour or less left
    pub due_now: Color,

    /// UI background
    pub ui_background: Color,

    /// UI border
    pub ui_border: Color,

    /// UI text
    pub ui_text: Color,

    /// UI text muted
    pub ui_text_muted: Color,

    /// Active tool highlight
    pub ui_accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            canvas_background: rgb(0x0b, 0x0c, 0x10),
            grid: rgb(12, 74, 110),
            edge: rgb(0x33, 0x41, 0x55),
            edge_complete: rgb(0x33, 0x65, 0x55),
            edge_child_end: from_named(named::BLUE),
            edge_parent_end: from_named(named::RED),
            node_default: rgb(0xcb, 0xd5, 0xe1),
            node_complete: rgb(0x99, 0xff, 0x99),
            node_selected: rgb(0xf4, 0x72, 0xb6),
            checkmark: from_named(named::GREEN),
            label: from_named(named::WHITE),
            marquee: rgb(42, 153, 222).with_alpha(0.2),
            selection_outline: from_named(named::BLACK).with_alpha(0.1),
            due_later: from_named(named::LIME),
            due_soon: from_named(named::ORANGE),
            due_now: from_named(named::RED),
            ui_background: rgb(0x12, 0x13, 0x16),
            ui_border: rgb(0x39, 0x39, 0x39),
            ui_text: from_named(named::WHITE),
            ui_text_muted: rgb(0xa3, 0xa3, 0xa3),
            ui_accent: rgb(0x3b, 0x82, 0xf6),
        }
    }

    /// Fill for a node of the given priority, before overrides.
    pub fn priority_fill(&self, priority: Priority) -> Color {
        match priority {
            Priority::Critical => from_named(named::RED),
            Priority::High => from_named(named::ORANGE),
            Priority::Normal => from_named(named::LIGHTBLUE),
            Priority::Low => self.node_default,
        }
    }

    /// Tint of the selection rectangle for a node of the given priority.
    pub fn priority_select_fill(&self, priority: Priority) -> Color {
        match priority {
            Priority::Critical => from_named(named::RED),
            Priority::High => rgb(0xff, 0xd0, 0x67),
            Priority::Normal => from_named(named::LIGHTBLUE),
            Priority::Low => self.node_default,
        }
    }
}

/// Build an opaque color from 8-bit channels.
pub fn rgb(r: u8, g: u8, b: u8) -> Color {
    Srgb::new(r, g, b).into_format::<f32>().with_alpha(1.0)
}

fn from_named(color: Srgb<u8>) -> Color {
    color.into_format::<f32>().with_alpha(1.0)
}

/// Parse a user supplied node color: `#rgb`, `#rrggbb` or a CSS color name.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if value.starts_with('#') {
        return Srgb::<u8>::from_str(value).ok().map(from_named);
    }
    named::from_str(&value.to_lowercase()).map(from_named)
}
