use crate::coords::WorldPoint;
use crate::edge::{Edge, EdgeKey};
use crate::ids::{LayerId, NodeId};
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Layer id used for completed tasks when the store does not name one.
pub const DEFAULT_COMPLETE_LAYER: &str = "complete";

/// A named group of nodes that can be hidden as a whole.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
}

impl Layer {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: LayerId::new(id),
            name: name.into(),
            visible: true,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// In-memory node/edge/layer maps for one session.
///
/// Tombstoned records stay in the maps until the store confirms them; every
/// read path that draws or hit-tests goes through the visibility queries.
#[derive(Clone, Debug)]
pub struct Graph {
    pub nodes: BTreeMap<NodeId, Node>,
    pub edges: BTreeMap<EdgeKey, Edge>,
    pub layers: BTreeMap<LayerId, Layer>,
    pub complete_layer: LayerId,
    pub show_archive: bool,
}

impl Default for Graph {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            layers: BTreeMap::new(),
            complete_layer: LayerId::new(DEFAULT_COMPLETE_LAYER),
            show_archive: false,
        }
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn insert_layer(&mut self, layer: Layer) {
        self.layers.insert(layer.id.clone(), layer);
    }

    /// Insert or revive the edge between `parent` and `child`.
    pub fn insert_edge(&mut self, edge: Edge) {
        self.edges.insert(edge.key(), edge);
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn edge(&self, a: &NodeId, b: &NodeId) -> Option<&Edge> {
        self.edges.get(&EdgeKey::new(a.clone(), b.clone()))
    }

    /// Whether a node is drawn and hit-testable.
    ///
    /// A node is visible when it is not tombstoned, when it is not archived
    /// (or archives are shown), and when it either belongs to no layer at all
    /// or at least one of its non-deleted memberships is a visible layer.
    /// A node tagged deleted from its only layer therefore counts as being in
    /// no layers and stays visible.
    pub fn is_node_visible(&self, node: &Node) -> bool {
        if node.is_deleted() {
            return false;
        }
        if node.archived && !self.show_archive {
            return false;
        }

        let mut in_no_layers = true;
        let mut in_visible_layer = false;
        for layer_id in node.active_layers() {
            in_no_layers = false;
            if self.layers.get(layer_id).is_some_and(|layer| layer.visible) {
                in_visible_layer = true;
            }
        }
        in_no_layers || in_visible_layer
    }

    pub fn is_node_id_visible(&self, id: &NodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| self.is_node_visible(node))
    }

    /// An edge is visible when it is live and both ends are visible.
    pub fn is_edge_visible(&self, edge: &Edge) -> bool {
        !edge.is_deleted()
            && self.is_node_id_visible(&edge.parent)
            && self.is_node_id_visible(&edge.child)
    }

    /// Whether the node is an active member of the complete layer.
    pub fn is_complete(&self, node: &Node) -> bool {
        node.in_layer(&self.complete_layer)
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|node| self.is_node_visible(node))
    }

    pub fn visible_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values().filter(|edge| self.is_edge_visible(edge))
    }

    /// First visible node within `tolerance` world units of `point`, in map
    /// iteration order.
    pub fn node_at(&self, point: WorldPoint, tolerance: f32) -> Option<&NodeId> {
        self.visible_nodes()
            .find(|node| node.position.within(point, tolerance))
            .map(|node| &node.id)
    }

    /// Drop a node record and every edge touching it.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        self.edges.retain(|key, _| !key.contains(id));
        self.nodes.remove(id)
    }
}
