//! # Tools
//!
//! The active tool decides what a pointer press on the canvas means. Tools
//! are exclusive, and most of them fall back to [`Tool::Pointer`] after one
//! use.

use strum_macros::{Display, EnumIter};

#[derive(Default, Debug, Display, EnumIter, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Select nodes and drag them around. Dragging the background pans.
    #[default]
    Pointer,
    /// Every press grabs the background, so nodes can't be moved by accident.
    Move,
    /// The next press creates a node where it lands.
    AddNode,
    /// The next press on a node archives it as done.
    CompleteNode,
    /// The next press on a node deletes it.
    DeleteNode,
    /// Pick two nodes to connect them, parent first.
    AddEdge,
    /// Pick two nodes to disconnect them.
    RemoveEdge,
}

impl Tool {
    pub fn label(self) -> &'static str {
        match self {
            Tool::Pointer => "Pointer",
            Tool::Move => "Move",
            Tool::AddNode => "Add node",
            Tool::CompleteNode => "Complete node",
            Tool::DeleteNode => "Delete node",
            Tool::AddEdge => "Add edge",
            Tool::RemoveEdge => "Remove edge",
        }
    }

    /// Hot-key shown next to the tool in the rail.
    pub fn shortcut(self) -> &'static str {
        match self {
            Tool::Pointer => "V",
            Tool::Move => "M",
            Tool::AddNode => "N",
            Tool::CompleteNode => "C",
            Tool::DeleteNode => "X",
            Tool::AddEdge => "E",
            Tool::RemoveEdge => "R",
        }
    }

    /// Map a key name (as the host reports it, lowercase) to a tool.
    pub fn from_key(key: &str) -> Option<Tool> {
        match key {
            "v" | "escape" => Some(Tool::Pointer),
            "m" => Some(Tool::Move),
            "n" => Some(Tool::AddNode),
            "c" => Some(Tool::CompleteNode),
            "x" | "delete" => Some(Tool::DeleteNode),
            "e" => Some(Tool::AddEdge),
            "r" => Some(Tool::RemoveEdge),
            _ => None,
        }
    }

    pub fn is_edge_tool(self) -> bool {
        matches!(self, Tool::AddEdge | Tool::RemoveEdge)
    }
}

/// Keys that pan the viewport for as long as they are held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoveKey {
    Up,
    Down,
    Left,
    Right,
}

impl MoveKey {
    pub fn from_key(key: &str) -> Option<MoveKey> {
        match key {
            "up" | "w" => Some(MoveKey::Up),
            "down" | "s" => Some(MoveKey::Down),
            "left" | "a" => Some(MoveKey::Left),
            "right" | "d" => Some(MoveKey::Right),
            _ => None,
        }
    }

    /// Direction the content moves on screen, in pixels per unit step.
    pub fn direction(self) -> glam::Vec2 {
        match self {
            MoveKey::Up => glam::Vec2::new(0.0, 1.0),
            MoveKey::Down => glam::Vec2::new(0.0, -1.0),
            MoveKey::Left => glam::Vec2::new(1.0, 0.0),
            MoveKey::Right => glam::Vec2::new(-1.0, 0.0),
        }
    }
}
