use chrono::{DateTime, Utc};
use graph::{LayerId, Membership, Node, NodeColor, NodeId, Priority, WorldPoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A partial update of a node record. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePatch {
    pub position: Option<WorldPoint>,
    pub goal: Option<String>,
    pub due: Option<Option<DateTime<Utc>>>,
    pub priority: Option<Priority>,
    pub color: Option<NodeColor>,
    pub layers: Option<BTreeMap<LayerId, Membership>>,
    pub archived: Option<bool>,
}

impl NodePatch {
    pub fn position(position: WorldPoint) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn archived() -> Self {
        Self {
            archived: Some(true),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, node: &mut Node) {
        if let Some(position) = self.position {
            node.position = position;
        }
        if let Some(goal) = &self.goal {
            node.goal = goal.clone();
        }
        if let Some(due) = self.due {
            node.due = due;
        }
        if let Some(priority) = self.priority {
            node.priority = priority;
        }
        if let Some(color) = &self.color {
            node.color = color.clone();
        }
        if let Some(layers) = &self.layers {
            node.layers = layers.clone();
        }
        if let Some(archived) = self.archived {
            node.archived = archived;
        }
    }
}

/// Persisted viewport for one user.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportRecord {
    pub scale: f32,
    pub x: f32,
    pub y: f32,
}

impl Default for ViewportRecord {
    fn default() -> Self {
        Self {
            scale: 20.0,
            x: 0.0,
            y: 0.0,
        }
    }
}

/// Partial viewport update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportPatch {
    pub scale: Option<f32>,
    pub position: Option<WorldPoint>,
}

impl ViewportPatch {
    pub fn apply_to(&self, record: &mut ViewportRecord) {
        if let Some(scale) = self.scale {
            record.scale = scale;
        }
        if let Some(position) = self.position {
            record.x = position.x();
            record.y = position.y();
        }
    }
}

/// One fire-and-forget mutation for the graph store.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreOp {
    CreateNode(Node),
    UpdateNode { id: NodeId, patch: NodePatch },
    DeleteNode(NodeId),
    CreateEdge { parent: NodeId, child: NodeId },
    DeleteEdge { parent: NodeId, child: NodeId },
    UpdateViewport { user_id: String, patch: ViewportPatch },
}

impl StoreOp {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            StoreOp::CreateNode(_) => "create_node",
            StoreOp::UpdateNode { .. } => "update_node",
            StoreOp::DeleteNode(_) => "delete_node",
            StoreOp::CreateEdge { .. } => "create_edge",
            StoreOp::DeleteEdge { .. } => "delete_edge",
            StoreOp::UpdateViewport { .. } => "update_viewport",
        }
    }
}
