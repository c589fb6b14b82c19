use crate::coords::WorldPoint;
use crate::ids::{LayerId, NodeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString};

/// Label given to nodes created from the canvas.
pub const DEFAULT_GOAL: &str = "insert goal here";

/// Task priority. Ordered so that `Critical > High > Normal > Low`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

/// Explicit fill override for a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeColor {
    #[default]
    Default,
    /// A `#rrggbb` hex string.
    Custom(String),
}

/// Tombstone tag shared by node records, edge records and layer memberships.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordAction {
    #[default]
    Present,
    Delete,
}

impl RecordAction {
    pub fn is_deleted(self) -> bool {
        self == RecordAction::Delete
    }
}

/// Per-layer membership tag. A node belongs to a layer unless tagged deleted.
pub type Membership = RecordAction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    Complete,
}

/// A transient per-node animation, keyed by wall clock start time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAnimation {
    pub kind: AnimationKind,
    pub started_at: DateTime<Utc>,
}

/// A task on the graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: WorldPoint,
    pub goal: String,
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub color: NodeColor,
    #[serde(default)]
    pub layers: BTreeMap<LayerId, Membership>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub action: RecordAction,
    /// Never persisted; only lives for the duration of the checkmark.
    #[serde(skip)]
    pub animation: Option<NodeAnimation>,
}

impl Node {
    pub fn new(id: NodeId, position: WorldPoint) -> Self {
        Self {
            id,
            position,
            goal: DEFAULT_GOAL.to_string(),
            due: None,
            priority: Priority::default(),
            color: NodeColor::default(),
            layers: BTreeMap::new(),
            archived: false,
            action: RecordAction::Present,
            animation: None,
        }
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    pub fn with_color(mut self, color: NodeColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_layer(mut self, layer: LayerId, membership: Membership) -> Self {
        self.layers.insert(layer, membership);
        self
    }

    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self
    }

    pub fn is_deleted(&self) -> bool {
        self.action.is_deleted()
    }

    /// Marks the node itself as removed. The record stays until the store
    /// confirms the deletion.
    pub fn tombstone(&mut self) {
        self.action = RecordAction::Delete;
        self.animation = None;
    }

    /// Whether the node has a non-deleted membership in `layer`.
    pub fn in_layer(&self, layer: &LayerId) -> bool {
        matches!(self.layers.get(layer), Some(RecordAction::Present))
    }

    /// Layers the node actively belongs to.
    pub fn active_layers(&self) -> impl Iterator<Item = &LayerId> {
        self.layers
            .iter()
            .filter(|(_, membership)| !membership.is_deleted())
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn priority_ordering() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::High > Priority::Normal);
        assert!(Priority::Normal > Priority::Low);
    }

    #[test]
    fn priority_parses_lowercase() {
        assert_eq!(Priority::from_str("critical").unwrap(), Priority::Critical);
        assert_eq!(Priority::High.to_string(), "high");
    }

    #[test]
    fn new_node_has_placeholder_goal() {
        let node = Node::new(NodeId::new("a"), WorldPoint::new(1.0, 2.0));
        assert_eq!(node.goal, DEFAULT_GOAL);
        assert_eq!(node.priority, Priority::Normal);
        assert!(!node.is_deleted());
    }

    #[test]
    fn deleted_membership_is_not_active() {
        let node = Node::new(NodeId::new("a"), WorldPoint::ORIGIN)
            .with_layer(LayerId::new("work"), RecordAction::Present)
            .with_layer(LayerId::new("home"), RecordAction::Delete);
        assert!(node.in_layer(&LayerId::new("work")));
        assert!(!node.in_layer(&LayerId::new("home")));
        assert_eq!(node.active_layers().count(), 1);
    }

    #[test]
    fn animation_is_not_serialized() {
        let mut node = Node::new(NodeId::new("a"), WorldPoint::ORIGIN);
        node.animation = Some(NodeAnimation {
            kind: AnimationKind::Complete,
            started_at: Utc::now(),
        });
        let json = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert!(back.animation.is_none());
    }
}
