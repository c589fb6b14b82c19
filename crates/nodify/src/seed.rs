//! Demo graph for first runs.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use graph::{Node, NodeColor, NodeId, Priority, WorldPoint};
use store::GraphStore;

/// Write a small demo graph when `store` has no nodes. Returns whether
/// anything was written.
pub fn seed_if_empty(store: &dyn GraphStore, now: DateTime<Utc>) -> Result<bool> {
    let existing = store
        .fetch_all_nodes()
        .context("Failed to check store before seeding")?;
    if !existing.is_empty() {
        log::info!("Store already has {} nodes, not seeding", existing.len());
        return Ok(false);
    }

    let nodes = [
        Node::new(NodeId::new("plan"), WorldPoint::new(0.0, -10.0))
            .with_goal("Plan the release")
            .with_priority(Priority::High),
        Node::new(NodeId::new("build"), WorldPoint::new(-12.0, 4.0))
            .with_goal("Build installers")
            .with_due(now + Duration::hours(30)),
        Node::new(NodeId::new("docs"), WorldPoint::new(12.0, 4.0))
            .with_goal("Write release notes")
            .with_priority(Priority::Low)
            .with_color(NodeColor::Custom("#4fa3e0".into())),
        Node::new(NodeId::new("ship"), WorldPoint::new(0.0, 18.0))
            .with_goal("Ship it")
            .with_priority(Priority::Critical)
            .with_due(now + Duration::minutes(45)),
    ];
    for node in &nodes {
        store.create_node(node)?;
    }

    for (parent, child) in [("plan", "build"), ("plan", "docs"), ("build", "ship"), ("docs", "ship")] {
        store.create_edge(&NodeId::new(parent), &NodeId::new(child))?;
    }

    log::info!("Seeded demo graph with {} nodes", nodes.len());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    #[test]
    fn seeds_empty_store_once() {
        let store = MemoryStore::new();
        let now = Utc::now();
        assert!(seed_if_empty(&store, now).unwrap());
        assert_eq!(store.fetch_all_nodes().unwrap().len(), 4);
        assert_eq!(store.fetch_all_edges().unwrap().len(), 4);
        let docs = store
            .fetch_all_nodes()
            .unwrap()
            .into_iter()
            .find(|node| node.id == NodeId::new("docs"))
            .unwrap();
        assert_eq!(docs.color, NodeColor::Custom("#4fa3e0".into()));

        assert!(!seed_if_empty(&store, now).unwrap());
        assert_eq!(store.fetch_all_nodes().unwrap().len(), 4);
    }
}
