//! Layer visibility toggles.

use crate::color::hsla;
use crate::components::{h_stack, panel, toggle_button, v_stack};
use crate::graph_view::GraphView;
use gpui::{div, prelude::*, px, Context, Entity, IntoElement, Render, SharedString, Window};
use theme::Theme;

pub struct LayerList {
    graph: Entity<GraphView>,
    theme: Theme,
}

impl LayerList {
    pub fn new(graph: Entity<GraphView>, theme: Theme) -> Self {
        Self { graph, theme }
    }
}

impl Render for LayerList {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let graph = self.graph.read(cx).editor().graph();
        let theme = &self.theme;

        let items: Vec<_> = graph
            .layers
            .values()
            .map(|layer| {
                let id = layer.id.clone();
                let entity = self.graph.clone();
                let item_id: SharedString = format!("layer-{}", layer.id).into();
                h_stack()
                    .gap(px(6.0))
                    .child(
                        toggle_button(item_id, if layer.visible { "on" } else { "off" }, layer.visible, theme)
                            .on_click(move |_, _window, cx| {
                                entity.update(cx, |view, cx| {
                                    view.edit(cx, |editor| editor.toggle_layer_visibility(&id));
                                });
                            }),
                    )
                    .child(layer.name.clone())
            })
            .collect();

        let show_archive = graph.show_archive;
        let entity = self.graph.clone();

        panel(theme)
            .w(px(180.0))
            .text_color(hsla(theme.ui_text))
            .child(
                div()
                    .text_xs()
                    .text_color(hsla(theme.ui_text_muted))
                    .pb(px(8.0))
                    .child("Layers"),
            )
            .child(v_stack().gap(px(2.0)).children(items))
            .child(
                h_stack().pt(px(8.0)).gap(px(6.0)).child(
                    toggle_button("show-archive", "Show archive", show_archive, theme).on_click(
                        move |_, _window, cx| {
                            entity.update(cx, |view, cx| {
                                view.edit(cx, |editor| editor.set_show_archive(!show_archive));
                            });
                        },
                    ),
                ),
            )
    }
}
