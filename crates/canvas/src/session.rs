use crate::animation::ViewportAnimation;
use crate::edge_selection::EdgeActionState;
use crate::tools::{MoveKey, Tool};
use crate::viewport::Viewport;
use chrono::{DateTime, Utc};
use graph::{NodeId, ScreenPoint, ScreenSize, WorldPoint};
use std::collections::BTreeSet;
use std::fmt;

/// What the active pointer drag has captured.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Held {
    #[default]
    None,
    Background,
    Node(NodeId),
}

/// Marquee selection in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionArea {
    pub start: WorldPoint,
    pub end: WorldPoint,
}

impl SelectionArea {
    pub fn contains(&self, point: WorldPoint) -> bool {
        let min = self.start.0.min(self.end.0);
        let max = self.start.0.max(self.end.0);
        point.0.cmpge(min).all() && point.0.cmple(max).all()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SaveStatus {
    #[default]
    Saved,
    Saving,
    Failed,
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SaveStatus::Saved => "saved",
            SaveStatus::Saving => "saving...",
            SaveStatus::Failed => "not saved",
        })
    }
}

/// Interaction state of one editing session.
#[derive(Debug)]
pub struct Session {
    pub user_id: String,
    pub viewport: Viewport,
    pub screen_size: ScreenSize,
    pub loaded: bool,

    pub tool: Tool,
    /// Tool to restore when the space bar is released.
    pub space_restore: Option<Tool>,
    pub move_keys: BTreeSet<MoveKey>,

    pub mouse_down: bool,
    pub held: Held,
    pub pressed_at: Option<DateTime<Utc>>,
    /// Last hovered position; `None` when the pointer is off the surface.
    pub pointer: Option<ScreenPoint>,

    pub selected_nodes: BTreeSet<NodeId>,
    pub selected_pair: Vec<NodeId>,
    pub selected_area: Option<SelectionArea>,
    pub edge_action: EdgeActionState,

    pub animation: Option<ViewportAnimation>,
    pub dash_offset: f32,

    pub pending_delete: Vec<NodeId>,
    pub pending_archive: Vec<NodeId>,
    /// Node moved by the current drag, persisted on release.
    pub dragged: Option<NodeId>,
    pub viewport_dirty: bool,
    pub save_status: SaveStatus,

    pub panel_collapsed: bool,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            viewport: Viewport::default(),
            screen_size: ScreenSize::default(),
            loaded: false,
            tool: Tool::Pointer,
            space_restore: None,
            move_keys: BTreeSet::new(),
            mouse_down: false,
            held: Held::None,
            pressed_at: None,
            pointer: None,
            selected_nodes: BTreeSet::new(),
            selected_pair: Vec::new(),
            selected_area: None,
            edge_action: EdgeActionState::default(),
            animation: None,
            dash_offset: 0.0,
            pending_delete: Vec::new(),
            pending_archive: Vec::new(),
            dragged: None,
            viewport_dirty: false,
            save_status: SaveStatus::Saved,
            panel_collapsed: true,
        }
    }

    pub fn scale(&self) -> f32 {
        self.viewport.scale()
    }

    /// World point in the middle of the surface, for the status readout.
    pub fn position(&self) -> WorldPoint {
        self.viewport.world_center(self.screen_size)
    }

    /// Zoom as a percentage, for the status readout.
    pub fn zoom_percent(&self) -> i32 {
        (self.viewport.scale() * 10.0).round() as i32
    }

    /// The node shown in the property panel, if exactly one is selected.
    pub fn focused_node(&self) -> Option<&NodeId> {
        if self.selected_nodes.len() == 1 {
            self.selected_nodes.first()
        } else {
            None
        }
    }
}
