use crate::document::{GraphDocument, DOCUMENT_FORMAT_VERSION};
use crate::{GraphStore, NodePatch, ViewportPatch, ViewportRecord};
use anyhow::{anyhow, bail, Context as _, Result};
use graph::{Edge, Layer, LayerId, Node, NodeId};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// A store backed by one pretty-printed JSON file.
///
/// Every mutation rewrites the whole file. A missing file opens as an empty
/// document and is created on the first write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    doc: Mutex<GraphDocument>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = if path.exists() {
            load_document(&path)?
        } else {
            log::info!("No graph at {}, starting empty", path.display());
            GraphDocument::default()
        };
        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, GraphDocument>> {
        self.doc.lock().map_err(|_| anyhow!("json store lock poisoned"))
    }

    /// Apply `f` to a copy and keep it only once it is on disk.
    fn mutate(&self, f: impl FnOnce(&mut GraphDocument) -> Result<()>) -> Result<()> {
        let mut doc = self.lock()?;
        let mut next = doc.clone();
        f(&mut next)?;
        save_document(&self.path, &next)?;
        *doc = next;
        Ok(())
    }
}

fn load_document(path: &Path) -> Result<GraphDocument> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;
    let doc: GraphDocument = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse graph file {}", path.display()))?;
    if doc.version > DOCUMENT_FORMAT_VERSION {
        bail!(
            "graph file {} has version {}, newest supported is {}",
            path.display(),
            doc.version,
            DOCUMENT_FORMAT_VERSION
        );
    }
    Ok(doc)
}

fn save_document(path: &Path, doc: &GraphDocument) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(doc)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

impl GraphStore for JsonFileStore {
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
        self.mutate(|doc| {
            doc.create_node(node.clone());
            Ok(())
        })
    }

    fn update_node(&self, id: &NodeId, patch: &NodePatch) -> Result<()> {
        self.mutate(|doc| {
            if !doc.update_node(id, patch) {
                bail!("unknown node {id}");
            }
            Ok(())
        })
    }

    fn delete_node(&self, id: &NodeId) -> Result<()> {
        self.mutate(|doc| {
            doc.delete_node(id);
            Ok(())
        })
    }

    fn create_edge(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
        self.mutate(|doc| {
            doc.create_edge(parent, child);
            Ok(())
        })
    }

    fn delete_edge(&self, a: &NodeId, b: &NodeId) -> Result<()> {
        self.mutate(|doc| {
            doc.delete_edge(a, b);
            Ok(())
        })
    }

    fn update_viewport(&self, user_id: &str, patch: &ViewportPatch) -> Result<()> {
        self.mutate(|doc| {
            doc.update_viewport(user_id, patch);
            Ok(())
        })
    }
}
