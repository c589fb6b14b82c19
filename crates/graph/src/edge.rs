use crate::ids::NodeId;
use crate::node::RecordAction;
use serde::{Deserialize, Serialize};

/// Canonical key for an unordered pair of nodes.
///
/// The two ids are stored sorted, so `EdgeKey::new(a, b)` and
/// `EdgeKey::new(b, a)` address the same record.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    low: NodeId,
    high: NodeId,
}

impl EdgeKey {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn low(&self) -> &NodeId {
        &self.low
    }

    pub fn high(&self) -> &NodeId {
        &self.high
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        &self.low == id || &self.high == id
    }
}

/// A dependency between two nodes. Drawn from `child` towards `parent`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub parent: NodeId,
    pub child: NodeId,
    #[serde(default)]
    pub action: RecordAction,
}

impl Edge {
    pub fn new(parent: NodeId, child: NodeId) -> Self {
        Self {
            parent,
            child,
            action: RecordAction::Present,
        }
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.parent.clone(), self.child.clone())
    }

    pub fn is_deleted(&self) -> bool {
        self.action.is_deleted()
    }
}
