use crate::animation::{start_completion, ViewportAnimation, DASH_STEP, MOVE_KEY_SPEED};
use crate::edge_selection::EdgeMode;
use crate::gesture::{pinch_scale, GestureMachine, GestureMove, GestureState, PointerId};
use crate::hints::{hint_spans, hint_text, HintSpan};
use crate::render;
use crate::scene::Scene;
use crate::session::{Held, SaveStatus, SelectionArea, Session};
use crate::tools::{MoveKey, Tool};
use crate::viewport::Viewport;
use crate::HIT_TOLERANCE;
use chrono::{DateTime, Utc};
use glam::Vec2;
use graph::{
    Edge, EdgeKey, Graph, LayerId, Node, NodeColor, NodeId, Priority, RecordAction, ScreenPoint,
    ScreenSize, WorldPoint,
};
use store::{GraphSnapshot, NodePatch, StoreOp};
use theme::Theme;

/// Notifications for the surrounding chrome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorEvent {
    OpenNodePanel(NodeId),
    ToolChanged(Tool),
}

/// The interaction engine for one graph session.
///
/// Every input handler reads what it needs from the session up front, works
/// on locals, and writes the outcome back once at the end. Store writes are
/// queued in an outbox that the host drains and runs in the background.
pub struct GraphEditor {
    graph: Graph,
    session: Session,
    gestures: GestureMachine,
    theme: Theme,
    outbox: Vec<StoreOp>,
    events: Vec<EditorEvent>,
    in_flight: usize,
}

impl GraphEditor {
    pub fn new(user_id: impl Into<String>, theme: Theme) -> Self {
        Self {
            graph: Graph::new(),
            session: Session::new(user_id),
            gestures: GestureMachine::new(),
            theme,
            outbox: Vec::new(),
            events: Vec::new(),
            in_flight: 0,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn viewport(&self) -> &Viewport {
        &self.session.viewport
    }

    pub fn tool(&self) -> Tool {
        self.session.tool
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gestures.state()
    }

    pub fn hint_spans(&self) -> Vec<HintSpan> {
        hint_spans(self.session.tool, self.session.selected_pair.len())
    }

    pub fn hint_text(&self) -> String {
        hint_text(self.session.tool, self.session.selected_pair.len())
    }

    /// Replace the in-memory graph with a freshly fetched snapshot and start
    /// rendering.
    pub fn load(&mut self, snapshot: GraphSnapshot) {
        let mut graph = Graph::new();
        graph.show_archive = self.graph.show_archive;
        if let Some(complete) = snapshot.complete_layer {
            graph.complete_layer = complete;
        }
        for layer in snapshot.layers {
            graph.insert_layer(layer);
        }
        for node in snapshot.nodes {
            graph.insert_node(node);
        }
        for edge in snapshot.edges {
            graph.insert_edge(edge);
        }
        log::info!(
            "Graph loaded: {} nodes, {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );
        self.graph = graph;
        if let Some(record) = snapshot.viewport {
            self.session.viewport = Viewport::from_record(&record);
        }
        self.session.loaded = true;
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if tool != self.session.tool {
            log::debug!("tool: {} -> {}", self.session.tool, tool);
            self.events.push(EditorEvent::ToolChanged(tool));
        }
        self.session.tool = tool;
        self.session.edge_action.reset_for(tool);
        self.session.selected_pair.clear();
    }

    pub fn resize(&mut self, size: ScreenSize) {
        self.session.screen_size = size;
    }

    pub fn set_panel_collapsed(&mut self, collapsed: bool) {
        self.session.panel_collapsed = collapsed;
    }

    // === Pointer input ===

    pub fn pointer_down(&mut self, id: PointerId, position: ScreenPoint, shift: bool, now: DateTime<Utc>) {
        self.gestures.pointer_down(id, position);
        self.session.pointer = Some(position);

        let tool = self.session.tool;
        let world = self.session.viewport.screen_to_world(position);

        if tool == Tool::AddNode {
            // Switch back before anything else so a fast double click can't
            // create a second node.
            self.set_tool(Tool::Pointer);
            self.create_node_at(world, now);
            return;
        }

        let hit = match tool {
            Tool::Move => None,
            _ => self.graph.node_at(world, HIT_TOLERANCE).cloned(),
        };

        if matches!(tool, Tool::DeleteNode | Tool::CompleteNode) {
            if let Some(node_id) = hit {
                self.set_tool(Tool::Pointer);
                self.retire_node(node_id, tool == Tool::CompleteNode);
                self.session.mouse_down = true;
                self.session.held = Held::None;
            }
            return;
        }

        let mut held = Held::None;
        let mut selected_pair = std::mem::take(&mut self.session.selected_pair);
        let mut selected_area = None;
        self.session.edge_action.pick(hit.as_ref(), &mut selected_pair);

        match &hit {
            Some(node_id) if !tool.is_edge_tool() => held = Held::Node(node_id.clone()),
            Some(_) => {}
            None if tool == Tool::Pointer && shift => {
                selected_area = Some(SelectionArea {
                    start: world,
                    end: world,
                });
            }
            None => held = Held::Background,
        }

        if tool == Tool::Pointer {
            match &hit {
                Some(node_id) => {
                    if !shift {
                        self.session.selected_nodes.clear();
                    }
                    self.session.selected_nodes.insert(node_id.clone());
                }
                None if !shift => self.session.selected_nodes.clear(),
                None => {}
            }
        }

        log::debug!("pointer down {:?} at {:?}: {:?}", id, world, held);
        self.session.held = held;
        self.session.selected_pair = selected_pair;
        self.session.selected_area = selected_area;
        self.session.mouse_down = true;
        self.session.pressed_at = Some(now);
    }

    pub fn pointer_move(&mut self, id: PointerId, position: ScreenPoint) {
        self.session.pointer = Some(position);

        match self.gestures.pointer_move(id, position) {
            GestureMove::Pinch { delta } => {
                let viewport = &mut self.session.viewport;
                let scale = pinch_scale(viewport.scale(), delta);
                viewport.zoom_at(position, scale);
                self.session.viewport_dirty = true;
            }
            GestureMove::PinchBaseline => {}
            GestureMove::Single { delta } => {
                if self.session.mouse_down {
                    self.drag(position, delta);
                }
            }
        }
    }

    fn drag(&mut self, position: ScreenPoint, delta: Vec2) {
        let world = self.session.viewport.screen_to_world(position);
        match &self.session.held {
            Held::Background => {
                self.session.viewport.pan(delta);
                self.session.viewport_dirty = true;
            }
            Held::Node(node_id) => {
                if let Some(node) = self.graph.node_mut(node_id) {
                    node.position = world.round();
                    self.session.dragged = Some(node_id.clone());
                }
            }
            Held::None => {
                if let Some(area) = self.session.selected_area.as_mut() {
                    area.end = world;
                }
            }
        }
    }

    pub fn pointer_up(&mut self, id: PointerId) {
        self.gestures.pointer_up(id);

        if let Some(node_id) = self.session.dragged.take() {
            if let Some(position) = self.graph.node(&node_id).map(|node| node.position) {
                self.queue(StoreOp::UpdateNode {
                    id: node_id,
                    patch: NodePatch::position(position),
                });
            }
        }
        if let Some(area) = self.session.selected_area.take() {
            let inside: Vec<NodeId> = self
                .graph
                .visible_nodes()
                .filter(|node| area.contains(node.position))
                .map(|node| node.id.clone())
                .collect();
            log::debug!("marquee selected {} nodes", inside.len());
            self.session.selected_nodes.extend(inside);
        }

        self.session.held = Held::None;
        self.session.mouse_down = false;
        self.session.pressed_at = None;
    }

    pub fn pointer_cancel(&mut self, id: PointerId) {
        self.pointer_up(id);
    }

    /// The pointer left the surface.
    pub fn pointer_leave(&mut self, id: PointerId) {
        self.pointer_up(id);
        self.session.pointer = None;
    }

    /// Zoom around the pointer. The host must not let the event scroll.
    pub fn wheel(&mut self, position: ScreenPoint, delta_y: f32) {
        self.session.viewport.wheel_zoom(position, delta_y);
        self.session.viewport_dirty = true;
    }

    pub fn double_click(&mut self, position: ScreenPoint) {
        let world = self.session.viewport.screen_to_world(position);
        let Some(node_id) = self.graph.node_at(world, HIT_TOLERANCE).cloned() else {
            return;
        };
        self.session.selected_nodes.clear();
        self.session.selected_nodes.insert(node_id.clone());
        self.session.panel_collapsed = false;
        self.events.push(EditorEvent::OpenNodePanel(node_id));
    }

    // === Keyboard ===

    /// Returns whether the key was used.
    pub fn key_down(&mut self, key: &str) -> bool {
        if key == "space" {
            if self.session.space_restore.is_none() {
                self.session.space_restore = Some(self.session.tool);
                self.set_tool(Tool::Move);
            }
            return true;
        }
        if key == "h" {
            let target = self
                .session
                .viewport
                .centered_top_left(WorldPoint::ORIGIN, self.session.screen_size);
            self.session.animation = Some(ViewportAnimation::PanTo(target));
            return true;
        }
        if let Some(move_key) = MoveKey::from_key(key) {
            self.session.move_keys.insert(move_key);
            return true;
        }
        if let Some(tool) = Tool::from_key(key) {
            self.session.space_restore = None;
            self.set_tool(tool);
            return true;
        }
        false
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        if key == "space" {
            if let Some(tool) = self.session.space_restore.take() {
                self.set_tool(tool);
            }
            return true;
        }
        if let Some(move_key) = MoveKey::from_key(key) {
            self.session.move_keys.remove(&move_key);
            return true;
        }
        false
    }

    // === Tick ===

    /// Advance animations and flush deferred work. Call every
    /// [`TICK_INTERVAL`](crate::TICK_INTERVAL).
    pub fn tick(&mut self) {
        self.session.dash_offset += DASH_STEP;

        let step: Vec2 = self
            .session
            .move_keys
            .iter()
            .map(|key| key.direction() * MOVE_KEY_SPEED)
            .sum();
        if step != Vec2::ZERO {
            self.session.viewport.pan(step);
            self.session.viewport_dirty = true;
        }

        if let Some(animation) = self.session.animation {
            if !animation.step(&mut self.session.viewport) {
                self.session.animation = None;
            }
            self.session.viewport_dirty = true;
        }

        self.resolve_edge_action();

        if self.session.viewport_dirty && !self.session.mouse_down {
            self.session.viewport_dirty = false;
            self.queue(StoreOp::UpdateViewport {
                user_id: self.session.user_id.clone(),
                patch: self.session.viewport.to_patch(),
            });
        }
    }

    fn resolve_edge_action(&mut self) {
        let Some(resolution) = self.session.edge_action.take_ready() else {
            return;
        };
        for (parent, child) in resolution.pairs {
            if self.graph.node(&parent).is_none() || self.graph.node(&child).is_none() {
                continue;
            }
            match resolution.mode {
                EdgeMode::AddEdge => {
                    self.graph.insert_edge(Edge::new(parent.clone(), child.clone()));
                    self.queue(StoreOp::CreateEdge { parent, child });
                }
                EdgeMode::RemoveEdge => {
                    let key = EdgeKey::new(parent.clone(), child.clone());
                    if let Some(edge) = self.graph.edges.get_mut(&key) {
                        edge.action = RecordAction::Delete;
                    }
                    self.queue(StoreOp::DeleteEdge { parent, child });
                }
                EdgeMode::Nothing => {}
            }
        }
        self.session.selected_pair.clear();
        self.set_tool(Tool::Pointer);
    }

    // === Rendering ===

    /// Build this frame's scene. Clears completion animations that ran out.
    pub fn render(&mut self, now: DateTime<Utc>) -> Scene {
        let frame = render::render(&self.graph, &self.session, &self.theme, now);
        for node_id in frame.expired {
            if let Some(node) = self.graph.node_mut(&node_id) {
                node.animation = None;
            }
        }
        frame.scene
    }

    // === Node edits ===

    fn create_node_at(&mut self, position: WorldPoint, now: DateTime<Utc>) {
        let base = NodeId::generate(&self.session.user_id, now.timestamp_millis());
        let mut node_id = base.clone();
        let mut n = 1;
        while self.graph.nodes.contains_key(&node_id) {
            node_id = base.with_suffix(n);
            n += 1;
        }
        log::debug!("create node {node_id} at {position:?}");
        let node = Node::new(node_id, position);
        self.graph.insert_node(node.clone());
        self.queue(StoreOp::CreateNode(node));
    }

    fn retire_node(&mut self, node_id: NodeId, complete: bool) {
        let Some(node) = self.graph.node_mut(&node_id) else {
            return;
        };
        node.tombstone();
        self.session.selected_nodes.remove(&node_id);
        if complete {
            log::debug!("archive node {node_id}");
            self.session.pending_archive.push(node_id.clone());
            self.queue(StoreOp::UpdateNode {
                id: node_id,
                patch: NodePatch::archived(),
            });
        } else {
            log::debug!("delete node {node_id}");
            self.session.pending_delete.push(node_id.clone());
            self.queue(StoreOp::DeleteNode(node_id));
        }
    }

    /// Apply `patch` locally and queue it. An empty patch is dropped.
    pub fn update_node(&mut self, node_id: &NodeId, patch: NodePatch) {
        if patch.is_empty() {
            return;
        }
        let Some(node) = self.graph.node_mut(node_id) else {
            return;
        };
        patch.apply_to(node);
        self.queue(StoreOp::UpdateNode {
            id: node_id.clone(),
            patch,
        });
    }

    pub fn set_goal(&mut self, node_id: &NodeId, goal: impl Into<String>) {
        let patch = NodePatch {
            goal: Some(goal.into()),
            ..Default::default()
        };
        self.update_node(node_id, patch);
    }

    pub fn set_priority(&mut self, node_id: &NodeId, priority: Priority) {
        let patch = NodePatch {
            priority: Some(priority),
            ..Default::default()
        };
        self.update_node(node_id, patch);
    }

    pub fn set_due(&mut self, node_id: &NodeId, due: Option<DateTime<Utc>>) {
        let patch = NodePatch {
            due: Some(due),
            ..Default::default()
        };
        self.update_node(node_id, patch);
    }

    pub fn set_color(&mut self, node_id: &NodeId, color: NodeColor) {
        let patch = NodePatch {
            color: Some(color),
            ..Default::default()
        };
        self.update_node(node_id, patch);
    }

    /// Add or drop a node's membership in `layer`. Joining the complete layer
    /// starts the checkmark; leaving it clears the animation.
    pub fn set_layer_membership(
        &mut self,
        node_id: &NodeId,
        layer: LayerId,
        member: bool,
        now: DateTime<Utc>,
    ) {
        let complete_layer = self.graph.complete_layer.clone();
        let Some(node) = self.graph.node_mut(node_id) else {
            return;
        };
        let was_complete = node.in_layer(&complete_layer);
        let membership = if member {
            RecordAction::Present
        } else {
            RecordAction::Delete
        };
        node.layers.insert(layer, membership);

        let is_complete = node.in_layer(&complete_layer);
        if is_complete && !was_complete {
            node.animation = Some(start_completion(now));
        } else if !is_complete {
            node.animation = None;
        }
        let layers = node.layers.clone();
        self.queue(StoreOp::UpdateNode {
            id: node_id.clone(),
            patch: NodePatch {
                layers: Some(layers),
                ..Default::default()
            },
        });
    }

    pub fn toggle_layer_visibility(&mut self, layer: &LayerId) {
        if let Some(layer) = self.graph.layers.get_mut(layer) {
            layer.visible = !layer.visible;
            log::debug!("layer {} visible: {}", layer.id, layer.visible);
        }
    }

    pub fn set_show_archive(&mut self, show: bool) {
        self.graph.show_archive = show;
    }

    // === Store reconciliation ===

    fn queue(&mut self, op: StoreOp) {
        self.outbox.push(op);
    }

    /// Take the queued store writes. The host runs them in order and reports
    /// each back through [`confirm`](Self::confirm) or
    /// [`store_failed`](Self::store_failed).
    pub fn drain_store_ops(&mut self) -> Vec<StoreOp> {
        let ops = std::mem::take(&mut self.outbox);
        if !ops.is_empty() {
            self.in_flight += ops.len();
            self.session.save_status = SaveStatus::Saving;
        }
        ops
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    /// A store write went through.
    pub fn confirm(&mut self, op: &StoreOp) {
        match op {
            StoreOp::DeleteNode(node_id) => self.confirm_node_deleted(node_id),
            StoreOp::DeleteEdge { parent, child } => self.confirm_edge_deleted(parent, child),
            StoreOp::UpdateNode { id, patch } if patch.archived == Some(true) => {
                self.confirm_node_archived(id)
            }
            _ => {}
        }
        self.settle();
    }

    /// A store write failed. The local state stays as it is.
    pub fn store_failed(&mut self, op: &StoreOp) {
        log::warn!("store write {} was dropped", op.name());
        self.session.save_status = SaveStatus::Failed;
        self.settle();
    }

    fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 && self.session.save_status == SaveStatus::Saving {
            self.session.save_status = SaveStatus::Saved;
        }
    }

    /// Drop a tombstoned node for good once the store has removed it.
    pub fn confirm_node_deleted(&mut self, node_id: &NodeId) {
        self.session.pending_delete.retain(|id| id != node_id);
        if self.graph.node(node_id).is_some_and(|node| node.is_deleted()) {
            self.graph.remove_node(node_id);
        }
    }

    /// Drop a tombstoned edge once the store has removed it. A re-added edge
    /// is kept.
    pub fn confirm_edge_deleted(&mut self, a: &NodeId, b: &NodeId) {
        let key = EdgeKey::new(a.clone(), b.clone());
        if self.graph.edges.get(&key).is_some_and(|edge| edge.is_deleted()) {
            self.graph.edges.remove(&key);
        }
    }

    fn confirm_node_archived(&mut self, node_id: &NodeId) {
        let Some(index) = self.session.pending_archive.iter().position(|id| id == node_id) else {
            return;
        };
        self.session.pending_archive.remove(index);
        if let Some(node) = self.graph.node_mut(node_id) {
            node.archived = true;
            node.action = RecordAction::Present;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::CursorGlyph;
    use chrono::Duration as TimeDelta;
    use graph::{Layer, DEFAULT_COMPLETE_LAYER};
    use store::{load_snapshot, MemoryStore, ViewportRecord};

    const MOUSE: PointerId = PointerId(0);

    fn editor_with(nodes: &[(&str, f32, f32)]) -> GraphEditor {
        let mut editor = GraphEditor::new("root", Theme::dark());
        let snapshot = GraphSnapshot {
            nodes: nodes
                .iter()
                .map(|(id, x, y)| Node::new(NodeId::new(*id), WorldPoint::new(*x, *y)))
                .collect(),
            layers: vec![Layer::new(DEFAULT_COMPLETE_LAYER, "Complete")],
            viewport: Some(ViewportRecord {
                scale: 20.0,
                x: 0.0,
                y: 0.0,
            }),
            ..Default::default()
        };
        editor.load(snapshot);
        editor.resize(ScreenSize::new(800.0, 600.0));
        editor
    }

    fn screen(editor: &GraphEditor, x: f32, y: f32) -> ScreenPoint {
        editor.viewport().world_to_screen(WorldPoint::new(x, y))
    }

    fn click(editor: &mut GraphEditor, x: f32, y: f32, now: DateTime<Utc>) {
        let at = screen(editor, x, y);
        editor.pointer_down(MOUSE, at, false, now);
        editor.pointer_up(MOUSE);
    }

    #[test]
    fn dragging_a_node_snaps_it_to_the_pointer() {
        let mut editor = editor_with(&[("b", 3.0, 3.0)]);
        let now = Utc::now();
        let press = screen(&editor, 3.5, 3.0);
        editor.pointer_down(MOUSE, press, false, now);
        assert_eq!(editor.session().held, Held::Node(NodeId::new("b")));

        let target = screen(&editor, 10.0, 10.0);
        editor.pointer_move(MOUSE, target);
        assert_eq!(
            editor.graph().node(&NodeId::new("b")).map(|n| n.position),
            Some(WorldPoint::new(10.0, 10.0))
        );

        editor.pointer_up(MOUSE);
        let ops = editor.drain_store_ops();
        assert_eq!(
            ops,
            vec![StoreOp::UpdateNode {
                id: NodeId::new("b"),
                patch: NodePatch::position(WorldPoint::new(10.0, 10.0)),
            }]
        );
        assert_eq!(editor.session().held, Held::None);
        assert!(!editor.session().mouse_down);
    }

    #[test]
    fn dragging_background_pans() {
        let mut editor = editor_with(&[("a", 3.0, 3.0)]);
        editor.pointer_down(MOUSE, ScreenPoint::new(400.0, 400.0), false, Utc::now());
        assert_eq!(editor.session().held, Held::Background);
        editor.pointer_move(MOUSE, ScreenPoint::new(420.0, 390.0));
        assert_eq!(editor.viewport().top_left, WorldPoint::new(-1.0, 0.5));
    }

    #[test]
    fn add_edge_picks_resolve_on_tick() {
        let mut editor = editor_with(&[("a", 1.0, 1.0), ("b", 5.0, 5.0)]);
        let now = Utc::now();
        editor.set_tool(Tool::AddEdge);
        assert_eq!(editor.session().edge_action.mode, EdgeMode::AddEdge);

        click(&mut editor, 1.0, 1.0, now);
        assert_eq!(editor.session().selected_pair.len(), 1);
        assert_eq!(editor.session().held, Held::None);
        click(&mut editor, 5.0, 5.0, now);
        editor.tick();

        let creates: Vec<_> = editor
            .drain_store_ops()
            .into_iter()
            .filter(|op| matches!(op, StoreOp::CreateEdge { .. }))
            .collect();
        assert_eq!(
            creates,
            vec![StoreOp::CreateEdge {
                parent: NodeId::new("a"),
                child: NodeId::new("b"),
            }]
        );
        let session = editor.session();
        assert!(session.edge_action.parents.is_empty());
        assert!(session.edge_action.children.is_empty());
        assert_eq!(session.edge_action.mode, EdgeMode::Nothing);
        assert!(session.selected_pair.is_empty());
        assert_eq!(editor.tool(), Tool::Pointer);
        assert!(editor.graph().edge(&NodeId::new("b"), &NodeId::new("a")).is_some());
    }

    #[test]
    fn remove_edge_tombstones_until_confirmed() {
        let mut editor = editor_with(&[("a", 1.0, 1.0), ("b", 5.0, 5.0)]);
        let now = Utc::now();
        editor
            .graph
            .insert_edge(Edge::new(NodeId::new("a"), NodeId::new("b")));

        editor.set_tool(Tool::RemoveEdge);
        click(&mut editor, 5.0, 5.0, now);
        click(&mut editor, 1.0, 1.0, now);
        editor.tick();

        assert_eq!(editor.graph().visible_edges().count(), 0);
        let op = editor
            .drain_store_ops()
            .into_iter()
            .find(|op| matches!(op, StoreOp::DeleteEdge { .. }))
            .unwrap();
        assert_eq!(editor.graph().edges.len(), 1);
        editor.confirm(&op);
        assert!(editor.graph().edges.is_empty());
    }

    #[test]
    fn converging_pinch_zooms_in_every_step() {
        let mut editor = editor_with(&[("a", 1.0, 1.0)]);
        let now = Utc::now();
        let a = PointerId(1);
        let b = PointerId(2);
        editor.pointer_down(a, ScreenPoint::new(100.0, 300.0), false, now);
        editor.pointer_down(b, ScreenPoint::new(700.0, 300.0), false, now);
        assert_eq!(editor.gesture_state(), GestureState::PinchActive);

        editor.pointer_move(a, ScreenPoint::new(110.0, 300.0));
        let mut last = editor.viewport().scale();
        for step in 1..10 {
            let x = 700.0 - step as f32 * 10.0;
            let position = ScreenPoint::new(x, 300.0);
            let anchored = editor.viewport().screen_to_world(position);
            editor.pointer_move(b, position);

            let scale = editor.viewport().scale();
            assert!(scale > last, "step {step}: {scale} <= {last}");
            last = scale;

            let after = editor.viewport().screen_to_world(position);
            assert!((anchored.x() - after.x()).abs() < 1e-3, "step {step}: x drifted");
            assert!((anchored.y() - after.y()).abs() < 1e-3, "step {step}: y drifted");
        }

        editor.pointer_up(a);
        editor.pointer_up(b);
        assert!(!editor.session().mouse_down);
    }

    #[test]
    fn joining_complete_layer_runs_checkmark_then_clears() {
        let mut editor = editor_with(&[("a", 1.0, 1.0)]);
        let id = NodeId::new("a");
        let now = Utc::now();
        editor.set_layer_membership(&id, LayerId::new(DEFAULT_COMPLETE_LAYER), true, now);

        let animation = editor.graph().node(&id).and_then(|n| n.animation);
        assert_eq!(animation.map(|a| a.started_at), Some(now));

        editor.render(now + TimeDelta::milliseconds(500));
        assert!(editor.graph().node(&id).and_then(|n| n.animation).is_some());
        editor.render(now + TimeDelta::milliseconds(1001));
        assert!(editor.graph().node(&id).and_then(|n| n.animation).is_none());
    }

    #[test]
    fn leaving_complete_layer_clears_checkmark() {
        let mut editor = editor_with(&[("a", 1.0, 1.0)]);
        let id = NodeId::new("a");
        let layer = LayerId::new(DEFAULT_COMPLETE_LAYER);
        let now = Utc::now();
        editor.set_layer_membership(&id, layer.clone(), true, now);
        editor.set_layer_membership(&id, layer, false, now);
        assert!(editor.graph().node(&id).and_then(|n| n.animation).is_none());
        assert!(!editor.graph().is_complete(&editor.graph().nodes[&id]));
    }

    #[test]
    fn add_node_creates_once_and_reverts_tool() {
        let mut editor = editor_with(&[]);
        let now = Utc::now();
        editor.set_tool(Tool::AddNode);
        let at = screen(&editor, 4.0, 4.0);
        editor.pointer_down(MOUSE, at, false, now);
        editor.pointer_up(MOUSE);
        editor.pointer_down(MOUSE, at, false, now);
        editor.pointer_up(MOUSE);

        assert_eq!(editor.tool(), Tool::Pointer);
        assert_eq!(editor.graph().nodes.len(), 1);
        let node = editor.graph().nodes.values().next().unwrap();
        assert_eq!(node.goal, graph::DEFAULT_GOAL);
        assert!(node.id.as_str().starts_with("root"));
    }

    #[test]
    fn ids_minted_in_same_millisecond_get_suffix() {
        let mut editor = editor_with(&[]);
        let now = Utc::now();
        editor.set_tool(Tool::AddNode);
        editor.pointer_down(MOUSE, ScreenPoint::new(10.0, 10.0), false, now);
        editor.pointer_up(MOUSE);
        editor.set_tool(Tool::AddNode);
        editor.pointer_down(MOUSE, ScreenPoint::new(200.0, 200.0), false, now);
        editor.pointer_up(MOUSE);

        let base = NodeId::generate("root", now.timestamp_millis());
        assert!(editor.graph().nodes.contains_key(&base));
        assert!(editor.graph().nodes.contains_key(&base.with_suffix(1)));
    }

    #[test]
    fn delete_tool_tombstones_and_waits_for_store() {
        let mut editor = editor_with(&[("a", 1.0, 1.0)]);
        let now = Utc::now();
        editor.set_tool(Tool::DeleteNode);

        click(&mut editor, 9.0, 9.0, now);
        assert_eq!(editor.tool(), Tool::DeleteNode);

        click(&mut editor, 1.0, 1.0, now);
        let id = NodeId::new("a");
        assert_eq!(editor.tool(), Tool::Pointer);
        assert_eq!(editor.session().pending_delete, vec![id.clone()]);
        assert!(!editor.graph().is_node_id_visible(&id));
        assert!(editor.graph().node(&id).is_some());

        let ops = editor.drain_store_ops();
        assert_eq!(ops, vec![StoreOp::DeleteNode(id.clone())]);
        assert_eq!(editor.session().save_status, SaveStatus::Saving);
        editor.confirm(&ops[0]);
        assert!(editor.graph().node(&id).is_none());
        assert!(editor.session().pending_delete.is_empty());
        assert_eq!(editor.session().save_status, SaveStatus::Saved);
    }

    #[test]
    fn complete_tool_archives() {
        let mut editor = editor_with(&[("a", 1.0, 1.0)]);
        editor.set_tool(Tool::CompleteNode);
        click(&mut editor, 1.0, 1.0, Utc::now());

        let id = NodeId::new("a");
        assert_eq!(editor.session().pending_archive, vec![id.clone()]);
        let ops = editor.drain_store_ops();
        assert_eq!(
            ops,
            vec![StoreOp::UpdateNode {
                id: id.clone(),
                patch: NodePatch::archived(),
            }]
        );
        editor.confirm(&ops[0]);
        let node = editor.graph().node(&id).unwrap();
        assert!(node.archived);
        assert!(!node.is_deleted());
        assert!(!editor.graph().is_node_visible(node));
    }

    #[test]
    fn failed_write_marks_status() {
        let mut editor = editor_with(&[("a", 1.0, 1.0)]);
        editor.set_goal(&NodeId::new("a"), "ship it");
        let ops = editor.drain_store_ops();
        editor.store_failed(&ops[0]);
        assert_eq!(editor.session().save_status, SaveStatus::Failed);
        assert_eq!(editor.graph().nodes[&NodeId::new("a")].goal, "ship it");
    }

    #[test]
    fn move_tool_never_grabs_nodes() {
        let mut editor = editor_with(&[("a", 1.0, 1.0)]);
        editor.set_tool(Tool::Move);
        let at = screen(&editor, 1.0, 1.0);
        editor.pointer_down(MOUSE, at, false, Utc::now());
        assert_eq!(editor.session().held, Held::Background);
        editor.pointer_move(MOUSE, ScreenPoint::new(at.x() + 40.0, at.y()));
        assert_eq!(
            editor.graph().node(&NodeId::new("a")).map(|n| n.position),
            Some(WorldPoint::new(1.0, 1.0))
        );
        assert_eq!(editor.viewport().top_left, WorldPoint::new(-2.0, 0.0));
    }

    #[test]
    fn release_after_add_node_press_frees_the_pointer() {
        let mut editor = editor_with(&[]);
        editor.set_tool(Tool::AddNode);
        editor.pointer_down(MOUSE, ScreenPoint::new(100.0, 100.0), false, Utc::now());
        assert!(!editor.session().mouse_down);
        assert_eq!(editor.gesture_state(), GestureState::SingleActive);

        editor.pointer_up(MOUSE);
        assert_eq!(editor.gesture_state(), GestureState::Idle);

        // A later single press must drag, not pinch.
        editor.pointer_down(MOUSE, ScreenPoint::new(400.0, 400.0), false, Utc::now());
        assert_eq!(editor.gesture_state(), GestureState::SingleActive);
        editor.pointer_move(MOUSE, ScreenPoint::new(420.0, 400.0));
        assert_eq!(editor.viewport().top_left, WorldPoint::new(-1.0, 0.0));
    }

    #[test]
    fn release_after_missed_delete_frees_the_pointer() {
        let mut editor = editor_with(&[("a", 1.0, 1.0)]);
        editor.set_tool(Tool::DeleteNode);
        editor.pointer_down(MOUSE, ScreenPoint::new(600.0, 600.0), false, Utc::now());
        editor.pointer_up(MOUSE);
        assert_eq!(editor.gesture_state(), GestureState::Idle);
        assert_eq!(editor.tool(), Tool::DeleteNode);
    }

    #[test]
    fn empty_patch_queues_nothing() {
        let mut editor = editor_with(&[("a", 1.0, 1.0)]);
        editor.update_node(&NodeId::new("a"), NodePatch::default());
        assert!(editor.drain_store_ops().is_empty());
        assert_eq!(editor.session().save_status, SaveStatus::Saved);

        editor.set_color(&NodeId::new("a"), NodeColor::Custom("#ff8800".into()));
        assert_eq!(editor.drain_store_ops().len(), 1);
    }

    #[test]
    fn wheel_keeps_point_under_cursor() {
        let mut editor = editor_with(&[]);
        let anchor = ScreenPoint::new(250.0, 150.0);
        let before = editor.viewport().screen_to_world(anchor);
        editor.wheel(anchor, -100.0);
        let after = editor.viewport().screen_to_world(anchor);
        assert!(editor.viewport().scale() > 20.0);
        assert!((before.x() - after.x()).abs() < 1e-4);
        assert!((before.y() - after.y()).abs() < 1e-4);
    }

    #[test]
    fn viewport_is_persisted_once_pointer_is_released() {
        let mut editor = editor_with(&[]);
        let now = Utc::now();
        editor.pointer_down(MOUSE, ScreenPoint::new(10.0, 10.0), false, now);
        editor.pointer_move(MOUSE, ScreenPoint::new(30.0, 10.0));
        editor.tick();
        assert!(editor.drain_store_ops().is_empty());

        editor.pointer_up(MOUSE);
        editor.tick();
        let ops = editor.drain_store_ops();
        assert!(matches!(
            ops.as_slice(),
            [StoreOp::UpdateViewport { user_id, .. }] if user_id == "root"
        ));
        editor.tick();
        assert!(editor.drain_store_ops().is_empty());
    }

    #[test]
    fn space_temporarily_switches_to_move() {
        let mut editor = editor_with(&[]);
        editor.set_tool(Tool::AddEdge);
        assert!(editor.key_down("space"));
        assert_eq!(editor.tool(), Tool::Move);
        assert!(editor.key_down("space"));
        assert!(editor.key_up("space"));
        assert_eq!(editor.tool(), Tool::AddEdge);
    }

    #[test]
    fn hot_keys_pick_tools() {
        let mut editor = editor_with(&[]);
        assert!(editor.key_down("n"));
        assert_eq!(editor.tool(), Tool::AddNode);
        assert!(editor.key_down("escape"));
        assert_eq!(editor.tool(), Tool::Pointer);
        assert!(!editor.key_down("q"));
        let events = editor.drain_events();
        assert_eq!(
            events,
            vec![
                EditorEvent::ToolChanged(Tool::AddNode),
                EditorEvent::ToolChanged(Tool::Pointer)
            ]
        );
    }

    #[test]
    fn held_arrow_pans_every_tick() {
        let mut editor = editor_with(&[]);
        editor.key_down("right");
        editor.tick();
        editor.tick();
        editor.key_up("right");
        editor.tick();
        assert_eq!(editor.viewport().top_left, WorldPoint::new(1.0, 0.0));
    }

    #[test]
    fn home_key_eases_to_origin() {
        let mut editor = editor_with(&[]);
        editor.key_down("h");
        editor.tick();
        assert!(editor.session().animation.is_some());
        for _ in 0..200 {
            editor.tick();
        }
        assert!(editor.session().animation.is_none());
        assert_eq!(editor.session().position(), WorldPoint::ORIGIN);
    }

    #[test]
    fn double_click_opens_panel_for_node_only() {
        let mut editor = editor_with(&[("a", 1.0, 1.0)]);
        editor.double_click(screen(&editor, 8.0, 8.0));
        assert!(editor.session().panel_collapsed);
        assert!(editor.drain_events().is_empty());

        editor.double_click(screen(&editor, 1.2, 0.9));
        assert!(!editor.session().panel_collapsed);
        assert_eq!(
            editor.drain_events(),
            vec![EditorEvent::OpenNodePanel(NodeId::new("a"))]
        );
        assert_eq!(editor.session().focused_node(), Some(&NodeId::new("a")));
    }

    #[test]
    fn shift_drag_marquee_selects_nodes() {
        let mut editor = editor_with(&[("a", 1.0, 1.0), ("b", 3.0, 2.0), ("c", 9.0, 9.0)]);
        let now = Utc::now();
        editor.pointer_down(MOUSE, screen(&editor, 0.0, 0.0), true, now);
        assert_eq!(editor.session().held, Held::None);
        editor.pointer_move(MOUSE, screen(&editor, 4.0, 4.0));
        assert!(editor.session().selected_area.is_some());
        editor.pointer_up(MOUSE);

        let selected: Vec<_> = editor.session().selected_nodes.iter().cloned().collect();
        assert_eq!(selected, vec![NodeId::new("a"), NodeId::new("b")]);
        assert!(editor.session().selected_area.is_none());
    }

    #[test]
    fn pointer_press_selects_and_background_clears() {
        let mut editor = editor_with(&[("a", 1.0, 1.0), ("b", 3.0, 3.0)]);
        let now = Utc::now();
        click(&mut editor, 1.0, 1.0, now);
        editor.pointer_down(MOUSE, screen(&editor, 3.0, 3.0), true, now);
        editor.pointer_up(MOUSE);
        assert_eq!(editor.session().selected_nodes.len(), 2);
        click(&mut editor, 20.0, 20.0, now);
        assert!(editor.session().selected_nodes.is_empty());
    }

    #[test]
    fn hidden_layer_hides_nodes_from_hit_testing() {
        let mut editor = editor_with(&[]);
        let mut snapshot = GraphSnapshot {
            layers: vec![Layer::new("work", "Work")],
            ..Default::default()
        };
        snapshot.nodes.push(
            Node::new(NodeId::new("a"), WorldPoint::new(1.0, 1.0))
                .with_layer(LayerId::new("work"), RecordAction::Present),
        );
        editor.load(snapshot);
        editor.toggle_layer_visibility(&LayerId::new("work"));

        let at = screen(&editor, 1.0, 1.0);
        editor.pointer_down(MOUSE, at, false, Utc::now());
        assert_eq!(editor.session().held, Held::Background);
    }

    #[test]
    fn loads_from_store_and_renders_after() {
        let store = MemoryStore::new();
        store::apply(
            &store,
            &StoreOp::CreateNode(Node::new(NodeId::new("a"), WorldPoint::new(2.0, 2.0))),
        )
        .unwrap();

        let mut editor = GraphEditor::new("root", Theme::dark());
        editor.resize(ScreenSize::new(100.0, 100.0));
        assert!(editor.render(Utc::now()).is_empty());

        editor.load(load_snapshot(&store, "root").unwrap());
        let scene = editor.render(Utc::now());
        assert_eq!(scene.circles().count(), 1);
        assert_eq!(scene.cursor, CursorGlyph::Default);
    }
}
