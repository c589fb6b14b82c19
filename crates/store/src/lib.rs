//! The graph store contract.
//!
//! The editor never waits on the store. It queues [`StoreOp`]s, the host
//! dispatches them in the background with [`apply`], and failures are logged
//! and dropped. Only the initial [`load_snapshot`] is awaited, and rendering
//! stays gated until it resolves.

mod document;
mod json;
mod memory;
mod ops;

pub use document::{GraphDocument, DOCUMENT_FORMAT_VERSION};
pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use ops::{NodePatch, StoreOp, ViewportPatch, ViewportRecord};

use anyhow::Result;
use graph::{Edge, Layer, LayerId, Node, NodeId};

/// Remote (or local) persistence for nodes, edges, layers and viewports.
pub trait GraphStore: Send + Sync {
    fn fetch_all_nodes(&self) -> Result<Vec<Node>>;
    fn fetch_all_edges(&self) -> Result<Vec<Edge>>;
    fn fetch_layers(&self) -> Result<(Vec<Layer>, LayerId)>;
    fn fetch_viewport(&self, user_id: &str) -> Result<Option<ViewportRecord>>;

    fn create_node(&self, node: &Node) -> Result<()>;
    fn update_node(&self, id: &NodeId, patch: &NodePatch) -> Result<()>;
    fn delete_node(&self, id: &NodeId) -> Result<()>;
    fn create_edge(&self, parent: &NodeId, child: &NodeId) -> Result<()>;
    fn delete_edge(&self, a: &NodeId, b: &NodeId) -> Result<()>;
    fn update_viewport(&self, user_id: &str, patch: &ViewportPatch) -> Result<()>;
}

/// Everything the editor needs before it can render.
#[derive(Clone, Debug, Default)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub layers: Vec<Layer>,
    pub complete_layer: Option<LayerId>,
    pub viewport: Option<ViewportRecord>,
}

/// Run the initial fetches for `user_id`.
pub fn load_snapshot(store: &dyn GraphStore, user_id: &str) -> Result<GraphSnapshot> {
    let nodes = store.fetch_all_nodes()?;
    let edges = store.fetch_all_edges()?;
    let (layers, complete_layer) = store.fetch_layers()?;
    let viewport = store.fetch_viewport(user_id)?;
    log::info!(
        "Loaded {} nodes, {} edges, {} layers for {}",
        nodes.len(),
        edges.len(),
        layers.len(),
        user_id
    );
    Ok(GraphSnapshot {
        nodes,
        edges,
        layers,
        complete_layer: Some(complete_layer),
        viewport,
    })
}

/// Dispatch a single queued mutation.
pub fn apply(store: &dyn GraphStore, op: &StoreOp) -> Result<()> {
    log::debug!("store: {}", op.name());
    match op {
        StoreOp::CreateNode(node) => store.create_node(node),
        StoreOp::UpdateNode { id, patch } => store.update_node(id, patch),
        StoreOp::DeleteNode(id) => store.delete_node(id),
        StoreOp::CreateEdge { parent, child } => store.create_edge(parent, child),
        StoreOp::DeleteEdge { parent, child } => store.delete_edge(parent, child),
        StoreOp::UpdateViewport { user_id, patch } => store.update_viewport(user_id, patch),
    }
}
