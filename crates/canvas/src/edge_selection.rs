use crate::tools::Tool;
use graph::NodeId;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeMode {
    AddEdge,
    RemoveEdge,
    #[default]
    Nothing,
}

impl EdgeMode {
    pub fn for_tool(tool: Tool) -> Self {
        match tool {
            Tool::AddEdge => EdgeMode::AddEdge,
            Tool::RemoveEdge => EdgeMode::RemoveEdge,
            _ => EdgeMode::Nothing,
        }
    }
}

/// Endpoints picked so far for the pending edge action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeActionState {
    pub parents: BTreeSet<NodeId>,
    pub children: BTreeSet<NodeId>,
    pub mode: EdgeMode,
}

/// A batch of edge mutations ready to apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeResolution {
    pub mode: EdgeMode,
    /// `(parent, child)` for every pair of the two picked sets.
    pub pairs: Vec<(NodeId, NodeId)>,
}

impl EdgeActionState {
    /// Start over for a newly selected tool.
    pub fn reset_for(&mut self, tool: Tool) {
        self.parents.clear();
        self.children.clear();
        self.mode = EdgeMode::for_tool(tool);
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.parents.contains(id) || self.children.contains(id)
    }

    /// Feed a pressed node. `selected_pair` is the two-slot scratch buffer
    /// the hint text counts; the first pick of a pair becomes a parent and
    /// the second a child.
    ///
    /// Returns whether the press qualified. A press that doesn't qualify
    /// empties `selected_pair`.
    pub fn pick(&mut self, hit: Option<&NodeId>, selected_pair: &mut Vec<NodeId>) -> bool {
        let qualifies = self.mode != EdgeMode::Nothing
            && selected_pair.len() < 2
            && hit.is_some_and(|id| !self.contains(id) && !selected_pair.contains(id));

        match hit {
            Some(id) if qualifies => {
                if selected_pair.is_empty() {
                    self.parents.insert(id.clone());
                } else {
                    self.children.insert(id.clone());
                }
                selected_pair.push(id.clone());
                true
            }
            _ => {
                selected_pair.clear();
                false
            }
        }
    }

    /// Take the batch once both sets have at least one node, leaving the
    /// state empty with mode [`EdgeMode::Nothing`].
    pub fn take_ready(&mut self) -> Option<EdgeResolution> {
        if self.parents.is_empty() || self.children.is_empty() {
            return None;
        }
        let parents = std::mem::take(&mut self.parents);
        let children = std::mem::take(&mut self.children);
        let mode = std::mem::take(&mut self.mode);

        let pairs = parents
            .iter()
            .flat_map(|parent| {
                children
                    .iter()
                    .map(move |child| (parent.clone(), child.clone()))
            })
            .collect();
        Some(EdgeResolution { mode, pairs })
    }
}
