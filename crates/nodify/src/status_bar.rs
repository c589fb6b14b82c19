//! Hint line for the active tool and the save/position/zoom readout.

use crate::color::hsla;
use crate::components::h_stack;
use crate::graph_view::GraphView;
use canvas::{Emphasis, HintSpan, SaveStatus, Session};
use gpui::{div, prelude::*, px, Context, Entity, IntoElement, Render, Window};
use theme::Theme;

pub struct StatusBar {
    graph: Entity<GraphView>,
    theme: Theme,
}

impl StatusBar {
    pub fn new(graph: Entity<GraphView>, theme: Theme) -> Self {
        Self { graph, theme }
    }
}

/// Text of the position and zoom readout.
pub fn readout(session: &Session) -> String {
    let position = session.position();
    format!(
        "x: {:.0}  y: {:.0}  zoom: {}%",
        position.x(),
        position.y(),
        session.zoom_percent()
    )
}

impl Render for StatusBar {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let editor = self.graph.read(cx).editor();
        let session = editor.session();
        let theme = &self.theme;

        let save_color = match session.save_status {
            SaveStatus::Saved => theme.ui_text_muted,
            SaveStatus::Saving => theme.ui_text,
            SaveStatus::Failed => theme.due_now,
        };

        h_stack()
            .w_full()
            .justify_between()
            .px(px(12.0))
            .py(px(6.0))
            .bg(hsla(theme.ui_background))
            .border_t_1()
            .border_color(hsla(theme.ui_border))
            .text_color(hsla(theme.ui_text_muted))
            .child(h_stack().children(
                editor
                    .hint_spans()
                    .into_iter()
                    .map(|span| hint_span(span, theme)),
            ))
            .child(
                h_stack()
                    .gap(px(12.0))
                    .child(
                        div()
                            .text_color(hsla(save_color))
                            .child(session.save_status.to_string()),
                    )
                    .child(readout(session)),
            )
    }
}

fn hint_span(span: HintSpan, theme: &Theme) -> gpui::Div {
    let color = match span.emphasis {
        Emphasis::None => theme.ui_text_muted,
        Emphasis::Constructive => theme.due_later,
        Emphasis::Destructive => theme.due_now,
    };
    div().text_color(hsla(color)).child(span.text)
}
