//! Property panel for the focused node.

use crate::color::hsla;
use crate::components::{h_stack, panel, toggle_button, v_stack};
use crate::graph_view::GraphView;
use crate::input::{TextInput, TextInputEvent};
use canvas::parse_delta_time;
use chrono::{Duration, Utc};
use gpui::{
    div, prelude::*, px, Context, Entity, IntoElement, Render, SharedString, Subscription, Window,
};
use graph::{NodeColor, NodeId, Priority};
use strum::IntoEnumIterator;
use theme::Theme;

/// Due-date shortcuts offered in the panel.
const DUE_CHOICES: [(&str, i64); 3] = [("1h", 1), ("1d", 24), ("1w", 24 * 7)];

/// Fill overrides offered in the panel, after the theme default.
const SWATCHES: [&str; 5] = ["#e06c75", "#e5c07b", "#98c379", "#4fa3e0", "#c678dd"];

pub struct NodePanel {
    graph: Entity<GraphView>,
    goal_input: Entity<TextInput>,
    /// The node whose goal is loaded into `goal_input`.
    shown: Option<NodeId>,
    theme: Theme,
    _subscriptions: Vec<Subscription>,
}

impl NodePanel {
    pub fn new(graph: Entity<GraphView>, theme: Theme, cx: &mut Context<Self>) -> Self {
        let goal_input = cx.new(|cx| TextInput::new("Goal", theme.clone(), cx));
        let subscriptions = vec![
            cx.subscribe(&goal_input, Self::handle_goal_event),
            cx.observe(&graph, |panel, _, cx| panel.sync_goal(cx)),
        ];
        let mut panel = Self {
            graph,
            goal_input,
            shown: None,
            theme,
            _subscriptions: subscriptions,
        };
        panel.sync_goal(cx);
        panel
    }

    /// Load the focused node's goal into the input when the focus moves to
    /// another node.
    fn sync_goal(&mut self, cx: &mut Context<Self>) {
        let editor = self.graph.read(cx).editor();
        let focused = editor.session().focused_node().cloned();
        if focused == self.shown {
            return;
        }
        let goal = focused
            .as_ref()
            .and_then(|id| editor.graph().node(id))
            .map(|node| node.goal.clone())
            .unwrap_or_default();
        self.shown = focused;
        self.goal_input
            .update(cx, |input, cx| input.set_content(goal, cx));
    }

    fn handle_goal_event(
        &mut self,
        input: Entity<TextInput>,
        event: &TextInputEvent,
        cx: &mut Context<Self>,
    ) {
        match event {
            TextInputEvent::Changed => {
                let Some(node_id) = self.shown.clone() else {
                    return;
                };
                let goal = input.read(cx).content().to_string();
                self.graph.update(cx, |view, cx| {
                    view.edit(cx, |editor| editor.set_goal(&node_id, goal));
                });
            }
        }
    }
}

impl Render for NodePanel {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let editor = self.graph.read(cx).editor();
        let session = editor.session();
        let theme = &self.theme;

        let node = session
            .focused_node()
            .filter(|_| !session.panel_collapsed)
            .and_then(|id| editor.graph().node(id));
        let Some(node) = node else {
            return div();
        };

        let node_id = node.id.clone();
        let complete_layer = editor.graph().complete_layer.clone();
        let is_complete = editor.graph().is_complete(node);
        let now = Utc::now();
        let due_label: SharedString = match node.due {
            Some(due) => parse_delta_time((due - now).num_milliseconds()).into(),
            None => "none".into(),
        };

        let priorities = Priority::iter().map(|priority| {
            let graph = self.graph.clone();
            let node_id = node_id.clone();
            let id: SharedString = format!("priority-{priority}").into();
            toggle_button(id, priority.to_string(), node.priority == priority, theme).on_click(
                move |_, _window, cx| {
                    graph.update(cx, |view, cx| {
                        view.edit(cx, |editor| editor.set_priority(&node_id, priority));
                    });
                },
            )
        });

        let due_choices = DUE_CHOICES.iter().map(|(label, hours)| {
            let graph = self.graph.clone();
            let node_id = node_id.clone();
            let hours = *hours;
            let id: SharedString = format!("due-{label}").into();
            toggle_button(id, *label, false, theme).on_click(move |_, _window, cx| {
                graph.update(cx, |view, cx| {
                    view.edit(cx, |editor| {
                        editor.set_due(&node_id, Some(Utc::now() + Duration::hours(hours)))
                    });
                });
            })
        });

        let clear_due = {
            let graph = self.graph.clone();
            let node_id = node_id.clone();
            toggle_button("due-clear", "clear", false, theme).on_click(move |_, _window, cx| {
                graph.update(cx, |view, cx| {
                    view.edit(cx, |editor| editor.set_due(&node_id, None));
                });
            })
        };

        let complete = {
            let graph = self.graph.clone();
            let node_id = node_id.clone();
            toggle_button("complete", "Complete", is_complete, theme).on_click(
                move |_, _window, cx| {
                    graph.update(cx, |view, cx| {
                        view.edit(cx, |editor| {
                            editor.set_layer_membership(
                                &node_id,
                                complete_layer.clone(),
                                !is_complete,
                                Utc::now(),
                            )
                        });
                    });
                },
            )
        };

        let swatches = std::iter::once(NodeColor::Default)
            .chain(SWATCHES.iter().map(|hex| NodeColor::Custom(hex.to_string())))
            .enumerate()
            .map(|(index, color)| {
                let graph = self.graph.clone();
                let node_id = node_id.clone();
                let fill = match &color {
                    NodeColor::Default => theme.node_default,
                    NodeColor::Custom(hex) => theme::parse_color(hex).unwrap_or(theme.node_default),
                };
                let active = node.color == color;
                let id: SharedString = format!("swatch-{index}").into();
                div()
                    .id(id)
                    .size(px(14.0))
                    .rounded(px(3.0))
                    .bg(hsla(fill))
                    .border_1()
                    .border_color(hsla(if active { theme.ui_accent } else { theme.ui_border }))
                    .cursor_pointer()
                    .on_click(move |_, _window, cx| {
                        let color = color.clone();
                        graph.update(cx, |view, cx| {
                            view.edit(cx, |editor| editor.set_color(&node_id, color));
                        });
                    })
            });

        let close = {
            let graph = self.graph.clone();
            toggle_button("close-panel", "×", false, theme).on_click(move |_, _window, cx| {
                graph.update(cx, |view, cx| {
                    view.edit(cx, |editor| editor.set_panel_collapsed(true));
                });
            })
        };

        panel(theme)
            .w(px(220.0))
            .text_color(hsla(theme.ui_text))
            .child(
                h_stack()
                    .justify_between()
                    .pb(px(8.0))
                    .child(field("Goal", theme))
                    .child(close),
            )
            .child(
                v_stack()
                    .gap(px(6.0))
                    .child(self.goal_input.clone())
                    .child(field("Color", theme))
                    .child(h_stack().gap(px(4.0)).children(swatches))
                    .child(field("Priority", theme))
                    .child(h_stack().gap(px(2.0)).children(priorities))
                    .child(field("Due", theme))
                    .child(div().child(due_label))
                    .child(h_stack().gap(px(2.0)).children(due_choices).child(clear_due))
                    .child(h_stack().pt(px(4.0)).child(complete)),
            )
    }
}

fn field(label: &'static str, theme: &Theme) -> gpui::Div {
    div()
        .text_xs()
        .text_color(hsla(theme.ui_text_muted))
        .child(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpui::TestAppContext;
    use graph::{Node, ScreenPoint, WorldPoint};
    use std::sync::Arc;
    use store::{GraphStore, MemoryStore};

    #[gpui::test]
    fn typing_in_goal_field_updates_node(cx: &mut TestAppContext) {
        let store = Arc::new(MemoryStore::new());
        store
            .create_node(&Node::new(NodeId::new("a"), WorldPoint::new(1.0, 1.0)).with_goal("Plan"))
            .unwrap();
        let graph = cx.new(|cx| GraphView::new(store.clone(), "root".into(), false, cx));
        cx.run_until_parked();
        let panel = cx.new(|cx| NodePanel::new(graph.clone(), Theme::dark(), cx));

        graph.update(cx, |view, cx| {
            view.edit(cx, |editor| editor.double_click(ScreenPoint::new(20.0, 20.0)));
        });
        let goal_input = panel.read_with(cx, |panel, _| {
            assert_eq!(panel.shown, Some(NodeId::new("a")));
            panel.goal_input.clone()
        });
        goal_input.read_with(cx, |input, _| assert_eq!(input.content(), "Plan"));

        goal_input.update(cx, |input, cx| {
            input.key("1", Some("!"), cx);
        });
        cx.run_until_parked();

        graph.read_with(cx, |view, _| {
            let node = view.editor().graph().node(&NodeId::new("a")).unwrap();
            assert_eq!(node.goal, "Plan!");
        });
        assert_eq!(store.fetch_all_nodes().unwrap()[0].goal, "Plan!");
    }
}
