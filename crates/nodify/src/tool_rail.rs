//! Vertical rail with one button per tool.

use crate::color::hsla;
use crate::graph_view::GraphView;
use canvas::Tool;
use gpui::{
    div, px, Context, Div, ElementId, Entity, InteractiveElement, IntoElement, ParentElement,
    Render, SharedString, StatefulInteractiveElement, Styled, Window,
};
use strum::IntoEnumIterator;
use theme::Theme;

pub struct ToolRail {
    graph: Entity<GraphView>,
    theme: Theme,
}

impl ToolRail {
    pub fn new(graph: Entity<GraphView>, theme: Theme) -> Self {
        Self { graph, theme }
    }
}

impl Render for ToolRail {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let current_tool = self.graph.read(cx).editor().tool();

        div()
            .flex()
            .flex_col()
            .gap(px(2.0))
            .p(px(4.0))
            .children(Tool::iter().map(|tool| ToolButton {
                tool,
                is_active: tool == current_tool,
                theme: self.theme.clone(),
                graph: self.graph.clone(),
            }))
    }
}

struct ToolButton {
    tool: Tool,
    is_active: bool,
    theme: Theme,
    graph: Entity<GraphView>,
}

impl IntoElement for ToolButton {
    type Element = gpui::Stateful<Div>;

    fn into_element(self) -> Self::Element {
        let accent = hsla(self.theme.ui_accent);
        let (bg, border_color, text_color) = if self.is_active {
            (accent.opacity(0.2), accent, accent)
        } else {
            (
                gpui::transparent_black(),
                gpui::transparent_black(),
                hsla(self.theme.ui_text_muted),
            )
        };
        let hover_bg = hsla(self.theme.ui_border);

        let tool = self.tool;
        let graph = self.graph;
        let id: SharedString = format!("tool-{tool}").into();

        div()
            .id(ElementId::Name(id))
            .size(px(28.0))
            .flex()
            .items_center()
            .justify_center()
            .bg(bg)
            .border_1()
            .border_color(border_color)
            .rounded(px(4.0))
            .text_color(text_color)
            .cursor_pointer()
            .hover(move |d| d.bg(hover_bg))
            .on_click(move |_, _window, cx| {
                graph.update(cx, |graph, cx| {
                    graph.edit(cx, |editor| editor.set_tool(tool));
                });
            })
            .child(tool.shortcut())
    }
}
