use crate::document::GraphDocument;
use crate::{GraphStore, NodePatch, ViewportPatch, ViewportRecord};
use anyhow::{anyhow, Result};
use graph::{Edge, Layer, LayerId, Node, NodeId};
use std::sync::{Mutex, MutexGuard};

/// A store that keeps the document in memory. Used for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: Mutex<GraphDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: GraphDocument) -> Self {
        Self {
            doc: Mutex::new(doc),
        }
    }

    /// A copy of the current document.
    pub fn document(&self) -> Result<GraphDocument> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, GraphDocument>> {
        self.doc.lock().map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

impl GraphStore for MemoryStore {
    fn fetch_all_nodes(&self) -> Result<Vec<Node>> {
        Ok(self.lock()?.nodes.clone())
    }

    fn fetch_all_edges(&self) -> Result<Vec<Edge>> {
        Ok(self.lock()?.edges.clone())
    }

    fn fetch_layers(&self) -> Result<(Vec<Layer>, LayerId)> {
        let doc = self.lock()?;
        Ok((doc.layers.clone(), doc.complete_layer.clone()))
    }

    fn fetch_viewport(&self, user_id: &str) -> Result<Option<ViewportRecord>> {
        Ok(self.lock()?.viewports.get(user_id).copied())
    }

    fn create_node(&self, node: &Node) -> Result<()> {
        self.lock()?.create_node(node.clone());
        Ok(())
    }

    fn update_node(&self, id: &NodeId, patch: &NodePatch) -> Result<()> {
        if !self.lock()?.update_node(id, patch) {
            return Err(anyhow!("unknown node {id}"));
        }
        Ok(())
    }

    fn delete_node(&self, id: &NodeId) -> Result<()> {
        self.lock()?.delete_node(id);
        Ok(())
    }

    fn create_edge(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
        self.lock()?.create_edge(parent, child);
        Ok(())
    }

    fn delete_edge(&self, a: &NodeId, b: &NodeId) -> Result<()> {
        self.lock()?.delete_edge(a, b);
        Ok(())
    }

    fn update_viewport(&self, user_id: &str, patch: &ViewportPatch) -> Result<()> {
        self.lock()?.update_viewport(user_id, patch);
        Ok(())
    }
}
