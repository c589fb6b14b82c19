//! Builds the per-frame [`Scene`] from the graph and session.

use crate::animation::{checkmark_progress, is_expired, CheckmarkProgress};
use crate::scene::{CursorGlyph, FontKind, Gradient, Primitive, Scene};
use crate::session::{Held, Session};
use crate::tools::Tool;
use crate::viewport::Viewport;
use crate::HIT_TOLERANCE;
use chrono::{DateTime, Utc};
use glam::Vec2;
use graph::{Edge, Graph, Node, NodeColor, NodeId, ScreenPoint};
use smallvec::smallvec;
use theme::{parse_color, Color, Theme};

/// Grid lines closer than this many pixels are not drawn.
const MIN_GRID_SPACING: f32 = 4.0;
/// Labels are hidden below this zoom.
const MIN_LABEL_SCALE: f32 = 5.0;
/// A held node lights up after being pressed this long.
const HOLD_HIGHLIGHT_MS: i64 = 100;
/// Length of the colored edge end caps, in world units.
const EDGE_CAP: f32 = 4.0;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const HOUR_MS: i64 = 60 * 60 * 1000;

/// Format a remaining duration in milliseconds as `DD:HH:MM:SS`. Overdue
/// durations show all zeros.
pub fn parse_delta_time(delta_ms: i64) -> String {
    if delta_ms < 0 {
        return "00:00:00:00".to_string();
    }
    let mut rest = delta_ms / 1000;
    let seconds = rest % 60;
    rest /= 60;
    let minutes = rest % 60;
    rest /= 60;
    let hours = rest % 24;
    let days = rest / 24;
    format!("{days:02}:{hours:02}:{minutes:02}:{seconds:02}")
}

pub(crate) struct Frame {
    pub scene: Scene,
    /// Nodes whose completion animation has run out.
    pub expired: Vec<NodeId>,
}

pub(crate) fn render(graph: &Graph, session: &Session, theme: &Theme, now: DateTime<Utc>) -> Frame {
    let mut scene = Scene::default();
    let mut expired = Vec::new();
    if !session.loaded {
        return Frame { scene, expired };
    }
    scene.background = Some(theme.canvas_background);

    let viewport = &session.viewport;
    draw_grid(&mut scene, session, theme);

    for edge in graph.visible_edges() {
        draw_edge(&mut scene, graph, viewport, theme, edge, session.dash_offset);
    }

    let hovered = hovered_node(graph, session);
    let held_highlight = match (&session.held, session.pressed_at) {
        (Held::Node(id), Some(pressed)) if session.mouse_down => {
            ((now - pressed).num_milliseconds() > HOLD_HIGHLIGHT_MS).then_some(id)
        }
        _ => None,
    };

    for node in graph.visible_nodes() {
        let highlighted = hovered == Some(&node.id)
            || held_highlight == Some(&node.id)
            || session.selected_nodes.contains(&node.id);
        if let Some(animation) = &node.animation {
            if is_expired(animation, now) {
                expired.push(node.id.clone());
            }
        }
        draw_node(&mut scene, graph, viewport, theme, node, highlighted, now);
    }

    if let Some(area) = &session.selected_area {
        let a = viewport.world_to_screen(area.start);
        let b = viewport.world_to_screen(area.end);
        scene.push(Primitive::Rect {
            origin: ScreenPoint(a.0.min(b.0)),
            size: (a.0 - b.0).abs(),
            fill: theme.marquee,
            stroke: None,
        });
    }

    scene.cursor = cursor_glyph(session, hovered.is_some());
    Frame { scene, expired }
}

fn hovered_node<'a>(graph: &'a Graph, session: &Session) -> Option<&'a NodeId> {
    if matches!(session.tool, Tool::Move | Tool::AddNode) {
        return None;
    }
    let pointer = session.pointer?;
    graph.node_at(session.viewport.screen_to_world(pointer), HIT_TOLERANCE)
}

fn cursor_glyph(session: &Session, over_node: bool) -> CursorGlyph {
    if session.pointer.is_none() {
        return CursorGlyph::Default;
    }
    match session.tool {
        Tool::Move if session.held == Held::Background => CursorGlyph::Grabbing,
        Tool::Move => CursorGlyph::Grab,
        Tool::AddNode => CursorGlyph::Copy,
        Tool::DeleteNode => CursorGlyph::NoDrop,
        _ if over_node => CursorGlyph::Pointer,
        _ => CursorGlyph::Default,
    }
}

fn draw_grid(scene: &mut Scene, session: &Session, theme: &Theme) {
    let viewport = &session.viewport;
    let scale = viewport.scale();
    if scale < MIN_GRID_SPACING {
        return;
    }
    let width = session.screen_size.width();
    let height = session.screen_size.height();
    let line_width = scale / 50.0;
    let top_left = viewport.top_left;

    let mut x = (top_left.x().ceil() - top_left.x()) * scale;
    while x < width {
        scene.push(Primitive::Line {
            from: ScreenPoint::new(x, 0.0),
            to: ScreenPoint::new(x, height),
            width: line_width,
            color: theme.grid,
        });
        x += scale;
    }
    let mut y = (top_left.y().ceil() - top_left.y()) * scale;
    while y < height {
        scene.push(Primitive::Line {
            from: ScreenPoint::new(0.0, y),
            to: ScreenPoint::new(width, y),
            width: line_width,
            color: theme.grid,
        });
        y += scale;
    }
}

fn draw_edge(
    scene: &mut Scene,
    graph: &Graph,
    viewport: &Viewport,
    theme: &Theme,
    edge: &Edge,
    dash_offset: f32,
) {
    let (Some(parent), Some(child)) = (graph.node(&edge.parent), graph.node(&edge.child)) else {
        return;
    };
    let from = viewport.world_to_screen(child.position);
    let to = viewport.world_to_screen(parent.position);
    let len = from.distance(to);
    if len <= f32::EPSILON {
        return;
    }
    let scale = viewport.scale();
    let complete = graph.is_complete(parent) || graph.is_complete(child);

    let gradient = if complete {
        Gradient::solid(theme.edge_complete)
    } else {
        let cap = (EDGE_CAP * scale / len).min(0.5);
        let pulse = (dash_offset * scale).rem_euclid(len) / len;
        Gradient::solid(theme.edge_child_end)
            .with_stop(cap, theme.edge)
            .with_stop(pulse - cap / 2.0, theme.edge)
            .with_stop(pulse, theme.edge_child_end)
            .with_stop(pulse + cap / 2.0, theme.edge)
            .with_stop(1.0 - cap, theme.edge)
            .with_stop(1.0, theme.edge_parent_end)
    };

    scene.push(Primitive::GradientLine {
        from,
        to,
        width: 1.0 + scale / 5.0,
        gradient,
    });
}

fn node_fill(graph: &Graph, theme: &Theme, node: &Node, highlighted: bool) -> Color {
    if graph.is_complete(node) {
        return theme.node_complete;
    }
    if highlighted {
        return theme.node_selected;
    }
    match &node.color {
        NodeColor::Custom(value) => {
            parse_color(value).unwrap_or_else(|| theme.priority_fill(node.priority))
        }
        NodeColor::Default => theme.priority_fill(node.priority),
    }
}

fn draw_node(
    scene: &mut Scene,
    graph: &Graph,
    viewport: &Viewport,
    theme: &Theme,
    node: &Node,
    highlighted: bool,
    now: DateTime<Utc>,
) {
    let center = viewport.world_to_screen(node.position);
    let scale = viewport.scale();
    let complete = graph.is_complete(node);

    scene.push(Primitive::Circle {
        center,
        radius: scale,
        color: node_fill(graph, theme, node, highlighted),
    });

    if complete {
        let progress = checkmark_progress(node.animation.as_ref(), now);
        draw_checkmark(scene, theme, center, scale, progress);
    }

    if highlighted {
        let size = Vec2::new(16.0 * scale, 12.0 * scale);
        scene.push(Primitive::Rect {
            origin: ScreenPoint(center.0 - size / 2.0),
            size,
            fill: with_alpha(theme.priority_select_fill(node.priority), 0.2),
            stroke: Some(theme.selection_outline),
        });
    }

    if scale <= MIN_LABEL_SCALE {
        return;
    }
    scene.push(Primitive::Text {
        text: node.goal.clone(),
        center: ScreenPoint::new(center.x(), center.y() + 2.0 * scale),
        size: scale,
        font: FontKind::Sans,
        color: theme.label,
    });

    let Some(due) = node.due else {
        return;
    };
    if complete {
        return;
    }
    let remaining = (due - now).num_milliseconds();
    let color = if remaining > DAY_MS {
        theme.due_later
    } else if remaining > HOUR_MS {
        theme.due_soon
    } else {
        theme.due_now
    };
    scene.push(Primitive::Text {
        text: parse_delta_time(remaining),
        center: ScreenPoint::new(center.x(), center.y() - 2.0 * scale),
        size: 0.75 * scale,
        font: FontKind::MonoBold,
        color,
    });
}

fn draw_checkmark(
    scene: &mut Scene,
    theme: &Theme,
    center: ScreenPoint,
    scale: f32,
    progress: CheckmarkProgress,
) {
    let ax = center.x() - scale / 16.0;
    let ay = center.y();
    let p1 = progress.first;
    let p2 = progress.second;

    let start = ScreenPoint::new(ax - scale / 3.0, ay);
    let elbow = ScreenPoint::new(ax - (1.0 - p1) * (scale / 2.0), ay + p1 * (scale / 2.0));
    let mut points = smallvec![start, elbow];
    if p2 > 0.0 {
        points.push(ScreenPoint::new(
            ax + p2 * (scale / 2.0),
            ay - (p2 - 0.5) * (scale / 1.5),
        ));
    }
    scene.push(Primitive::Polyline {
        points,
        width: (scale / 8.0).max(1.0),
        color: theme.checkmark,
    });
}

fn with_alpha(color: Color, alpha: f32) -> Color {
    Color::new(color.red, color.green, color.blue, color.alpha * alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SelectionArea;
    use chrono::Duration as TimeDelta;
    use graph::{
        Layer, LayerId, Priority, RecordAction, ScreenSize, WorldPoint, DEFAULT_COMPLETE_LAYER,
    };
    use theme::rgb;

    fn session(size: ScreenSize) -> Session {
        let mut session = Session::new("root");
        session.loaded = true;
        session.screen_size = size;
        session
    }

    #[test]
    fn delta_time_formats_days_to_seconds() {
        assert_eq!(parse_delta_time(0), "00:00:00:00");
        assert_eq!(parse_delta_time(-5), "00:00:00:00");
        let ms = ((2 * 24 + 3) * 3600 + 4 * 60 + 5) * 1000 + 999;
        assert_eq!(parse_delta_time(ms), "02:03:04:05");
    }

    #[test]
    fn nothing_is_drawn_before_load() {
        let mut graph = Graph::new();
        graph.insert_node(Node::new(NodeId::new("a"), WorldPoint::ORIGIN));
        let session = Session::new("root");
        let frame = render(&graph, &session, &Theme::dark(), Utc::now());
        assert!(frame.scene.is_empty());
    }

    #[test]
    fn critical_node_at_origin_is_red_mid_screen() {
        let size = ScreenSize::new(800.0, 600.0);
        let mut graph = Graph::new();
        graph.insert_node(
            Node::new(NodeId::new("a"), WorldPoint::ORIGIN).with_priority(Priority::Critical),
        );
        let mut session = session(size);
        session.viewport = Viewport::new(20.0, WorldPoint::ORIGIN);
        session.viewport.center_on(WorldPoint::ORIGIN, size);

        let frame = render(&graph, &session, &Theme::dark(), Utc::now());
        let circles: Vec<_> = frame.scene.circles().collect();
        assert_eq!(circles.len(), 1);
        let (center, radius, color) = circles[0];
        assert_eq!(center, ScreenPoint::new(400.0, 300.0));
        assert_eq!(radius, 20.0);
        assert_eq!(color, rgb(255, 0, 0));
    }

    #[test]
    fn tombstoned_nodes_are_never_drawn() {
        let mut graph = Graph::new();
        graph.show_archive = true;
        graph.insert_layer(Layer::new("work", "Work"));
        let mut node = Node::new(NodeId::new("a"), WorldPoint::ORIGIN)
            .with_layer(LayerId::new("work"), RecordAction::Present)
            .archived(true);
        node.tombstone();
        graph.insert_node(node);

        let frame = render(&graph, &session(ScreenSize::new(100.0, 100.0)), &Theme::dark(), Utc::now());
        assert_eq!(frame.scene.circles().count(), 0);
    }

    #[test]
    fn complete_node_is_green_without_countdown() {
        let now = Utc::now();
        let mut graph = Graph::new();
        graph.insert_layer(Layer::new(DEFAULT_COMPLETE_LAYER, "Complete"));
        graph.insert_node(
            Node::new(NodeId::new("a"), WorldPoint::new(2.0, 2.0))
                .with_layer(LayerId::new(DEFAULT_COMPLETE_LAYER), RecordAction::Present)
                .with_due(now + TimeDelta::hours(3)),
        );
        let frame = render(&graph, &session(ScreenSize::new(200.0, 200.0)), &Theme::dark(), now);
        let theme = Theme::dark();
        assert_eq!(frame.scene.circles().next().map(|c| c.2), Some(theme.node_complete));
        assert_eq!(frame.scene.texts().collect::<Vec<_>>(), vec![graph::DEFAULT_GOAL]);
        assert!(frame
            .scene
            .primitives
            .iter()
            .any(|p| matches!(p, Primitive::Polyline { points, .. } if points.len() == 3)));
    }

    #[test]
    fn countdown_color_tracks_urgency() {
        let now = Utc::now();
        let theme = Theme::dark();
        for (hours, expected) in [
            (48, theme.due_later),
            (5, theme.due_soon),
            (0, theme.due_now),
        ] {
            let mut graph = Graph::new();
            graph.insert_node(
                Node::new(NodeId::new("a"), WorldPoint::new(2.0, 2.0))
                    .with_due(now + TimeDelta::hours(hours) + TimeDelta::minutes(1)),
            );
            let frame = render(&graph, &session(ScreenSize::new(200.0, 200.0)), &theme, now);
            let countdown = frame.scene.primitives.iter().find_map(|p| match p {
                Primitive::Text {
                    font: FontKind::MonoBold,
                    color,
                    ..
                } => Some(*color),
                _ => None,
            });
            assert_eq!(countdown, Some(expected), "{hours}h");
        }
    }

    #[test]
    fn hover_highlights_node_and_sets_pointer_cursor() {
        let mut graph = Graph::new();
        graph.insert_node(Node::new(NodeId::new("a"), WorldPoint::new(2.0, 2.0)));
        let mut session = session(ScreenSize::new(200.0, 200.0));
        session.pointer = Some(ScreenPoint::new(41.0, 39.0));

        let theme = Theme::dark();
        let frame = render(&graph, &session, &theme, Utc::now());
        assert_eq!(frame.scene.cursor, CursorGlyph::Pointer);
        assert_eq!(frame.scene.circles().next().map(|c| c.2), Some(theme.node_selected));

        session.tool = Tool::AddNode;
        let frame = render(&graph, &session, &theme, Utc::now());
        assert_eq!(frame.scene.cursor, CursorGlyph::Copy);
        assert_ne!(frame.scene.circles().next().map(|c| c.2), Some(theme.node_selected));
    }

    #[test]
    fn move_tool_cursor_grabs() {
        let graph = Graph::new();
        let mut session = session(ScreenSize::new(200.0, 200.0));
        session.pointer = Some(ScreenPoint::new(10.0, 10.0));
        session.tool = Tool::Move;
        assert_eq!(render(&graph, &session, &Theme::dark(), Utc::now()).scene.cursor, CursorGlyph::Grab);
        session.held = Held::Background;
        assert_eq!(
            render(&graph, &session, &Theme::dark(), Utc::now()).scene.cursor,
            CursorGlyph::Grabbing
        );
        session.pointer = None;
        assert_eq!(
            render(&graph, &session, &Theme::dark(), Utc::now()).scene.cursor,
            CursorGlyph::Default
        );
    }

    #[test]
    fn edges_to_hidden_nodes_are_skipped() {
        let mut graph = Graph::new();
        graph.insert_layer(Layer::new("hidden", "Hidden").hidden());
        graph.insert_node(Node::new(NodeId::new("a"), WorldPoint::new(1.0, 1.0)));
        graph.insert_node(
            Node::new(NodeId::new("b"), WorldPoint::new(5.0, 1.0))
                .with_layer(LayerId::new("hidden"), RecordAction::Present),
        );
        graph.insert_node(Node::new(NodeId::new("c"), WorldPoint::new(1.0, 5.0)));
        graph.insert_edge(Edge::new(NodeId::new("a"), NodeId::new("b")));
        graph.insert_edge(Edge::new(NodeId::new("a"), NodeId::new("c")));

        let frame = render(&graph, &session(ScreenSize::new(200.0, 200.0)), &Theme::dark(), Utc::now());
        let edges = frame
            .scene
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::GradientLine { .. }))
            .count();
        assert_eq!(edges, 1);
    }

    #[test]
    fn grid_is_skipped_when_zoomed_far_out() {
        let graph = Graph::new();
        let mut session = session(ScreenSize::new(200.0, 200.0));
        session.viewport = Viewport::new(2.0, WorldPoint::ORIGIN);
        let frame = render(&graph, &session, &Theme::dark(), Utc::now());
        assert!(frame.scene.primitives.is_empty());

        session.viewport = Viewport::new(20.0, WorldPoint::new(0.5, 0.0));
        let frame = render(&graph, &session, &Theme::dark(), Utc::now());
        let first = frame.scene.primitives.first().cloned();
        assert!(matches!(
            first,
            Some(Primitive::Line { from, .. }) if (from.x() - 10.0).abs() < 1e-4
        ));
    }

    #[test]
    fn marquee_is_drawn_as_normalized_rect() {
        let graph = Graph::new();
        let mut session = session(ScreenSize::new(10.0, 10.0));
        session.viewport = Viewport::new(20.0, WorldPoint::ORIGIN);
        session.selected_area = Some(SelectionArea {
            start: WorldPoint::new(3.0, 3.0),
            end: WorldPoint::new(1.0, 2.0),
        });
        let frame = render(&graph, &session, &Theme::dark(), Utc::now());
        let rect = frame.scene.primitives.iter().find_map(|p| match p {
            Primitive::Rect { origin, size, .. } => Some((*origin, *size)),
            _ => None,
        });
        assert_eq!(rect, Some((ScreenPoint::new(20.0, 40.0), Vec2::new(40.0, 20.0))));
    }

    #[test]
    fn expired_animations_are_reported() {
        let now = Utc::now();
        let mut graph = Graph::new();
        graph.insert_layer(Layer::new(DEFAULT_COMPLETE_LAYER, "Complete"));
        let mut node = Node::new(NodeId::new("a"), WorldPoint::new(2.0, 2.0))
            .with_layer(LayerId::new(DEFAULT_COMPLETE_LAYER), RecordAction::Present);
        node.animation = Some(crate::animation::start_completion(now - TimeDelta::milliseconds(1500)));
        graph.insert_node(node);
        let frame = render(&graph, &session(ScreenSize::new(200.0, 200.0)), &Theme::dark(), now);
        assert_eq!(frame.expired, vec![NodeId::new("a")]);
    }
}
