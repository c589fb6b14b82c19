use crate::ops::{NodePatch, ViewportPatch, ViewportRecord};
use graph::{Edge, EdgeKey, Layer, LayerId, Node, NodeId, DEFAULT_COMPLETE_LAYER};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version of the graph document format
pub const DOCUMENT_FORMAT_VERSION: u32 = 1;

/// Everything a store holds, in a form that serializes to a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Version of the file format for future compatibility
    pub version: u32,

    pub nodes: Vec<Node>,

    pub edges: Vec<Edge>,

    pub layers: Vec<Layer>,

    /// Layer whose members count as done
    pub complete_layer: LayerId,

    /// Saved viewport per user id
    #[serde(default)]
    pub viewports: BTreeMap<String, ViewportRecord>,
}

impl Default for GraphDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_FORMAT_VERSION,
            nodes: Vec::new(),
            edges: Vec::new(),
            layers: vec![Layer::new(DEFAULT_COMPLETE_LAYER, "Complete")],
            complete_layer: LayerId::new(DEFAULT_COMPLETE_LAYER),
            viewports: BTreeMap::new(),
        }
    }
}

impl GraphDocument {
    pub fn create_node(&mut self, node: Node) {
        match self.nodes.iter_mut().find(|n| n.id == node.id) {
            Some(existing) => *existing = node,
            None => self.nodes.push(node),
        }
    }

    /// Returns false when the node is unknown.
    pub fn update_node(&mut self, id: &NodeId, patch: &NodePatch) -> bool {
        match self.nodes.iter_mut().find(|n| &n.id == id) {
            Some(node) => {
                patch.apply_to(node);
                true
            }
            None => false,
        }
    }

    pub fn delete_node(&mut self, id: &NodeId) {
        self.nodes.retain(|n| &n.id != id);
        self.edges.retain(|e| &e.parent != id && &e.child != id);
    }

    /// Insert an edge, replacing any record for the same unordered pair.
    pub fn create_edge(&mut self, parent: &NodeId, child: &NodeId) {
        let edge = Edge::new(parent.clone(), child.clone());
        let key = edge.key();
        self.edges.retain(|e| e.key() != key);
        self.edges.push(edge);
    }

    pub fn delete_edge(&mut self, a: &NodeId, b: &NodeId) {
        let key = EdgeKey::new(a.clone(), b.clone());
        self.edges.retain(|e| e.key() != key);
    }

    pub fn update_viewport(&mut self, user_id: &str, patch: &ViewportPatch) {
        let record = self.viewports.entry(user_id.to_string()).or_default();
        patch.apply_to(record);
    }
}
