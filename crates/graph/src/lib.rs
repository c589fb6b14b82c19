//! Task graph data model.
//!
//! Nodes, edges and layers with soft-delete markers. Nothing here is ever
//! removed physically by an edit; records are tombstoned and the store
//! reconciles them later.

pub mod coords;
mod edge;
mod graph;
mod ids;
mod node;

pub use coords::{ScreenPoint, ScreenSize, WorldDelta, WorldPoint};
pub use edge::{Edge, EdgeKey};
pub use graph::{Graph, Layer, DEFAULT_COMPLETE_LAYER};
pub use ids::{LayerId, NodeId};
pub use node::{
    AnimationKind, Membership, Node, NodeAnimation, NodeColor, Priority, RecordAction,
    DEFAULT_GOAL,
};
