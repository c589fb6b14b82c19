//! Small layout helpers shared by the chrome panels.

use crate::color::hsla;
use gpui::{div, prelude::*, px, Div, ElementId, SharedString, Stateful};
use theme::Theme;

pub fn h_stack() -> Div {
    div().flex().flex_row().items_center()
}

pub fn v_stack() -> Div {
    div().flex().flex_col()
}

/// A floating panel with background and border. It keeps pointer input from
/// reaching the graph surface underneath.
pub fn panel(theme: &Theme) -> Div {
    div()
        .occlude()
        .bg(hsla(theme.ui_background))
        .border_1()
        .border_color(hsla(theme.ui_border))
        .rounded(px(8.0))
        .p(px(8.0))
}

/// A compact text button. `active` draws it highlighted.
pub fn toggle_button(
    id: impl Into<ElementId>,
    label: impl Into<SharedString>,
    active: bool,
    theme: &Theme,
) -> Stateful<Div> {
    let accent = hsla(theme.ui_accent);
    let hover_bg = hsla(theme.ui_border);
    let (bg, border, text) = if active {
        (accent.opacity(0.2), accent, accent)
    } else {
        (
            gpui::transparent_black(),
            gpui::transparent_black(),
            hsla(theme.ui_text_muted),
        )
    };

    div()
        .id(id)
        .px(px(6.0))
        .py(px(2.0))
        .bg(bg)
        .border_1()
        .border_color(border)
        .rounded(px(4.0))
        .text_color(text)
        .cursor_pointer()
        .hover(move |d| d.bg(hover_bg))
        .child(label.into())
}
