//! Single-line text input.

use crate::color::hsla;
use gpui::{
    div, prelude::*, px, App, Context, EventEmitter, FocusHandle, Focusable, IntoElement,
    KeyDownEvent, MouseButton, Render, SharedString, Window,
};
use theme::Theme;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextInputEvent {
    Changed,
}

impl EventEmitter<TextInputEvent> for TextInput {}

pub struct TextInput {
    focus_handle: FocusHandle,
    content: String,
    /// Byte offset, always on a char boundary.
    cursor: usize,
    placeholder: SharedString,
    theme: Theme,
}

impl TextInput {
    pub fn new(placeholder: impl Into<SharedString>, theme: Theme, cx: &mut Context<Self>) -> Self {
        Self {
            focus_handle: cx.focus_handle(),
            content: String::new(),
            cursor: 0,
            placeholder: placeholder.into(),
            theme,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the content without emitting [`TextInputEvent::Changed`].
    pub fn set_content(&mut self, content: impl Into<String>, cx: &mut Context<Self>) {
        self.content = content.into();
        self.cursor = self.content.len();
        cx.notify();
    }

    /// Run one key against the content. Returns whether the key was used.
    pub fn key(&mut self, key: &str, key_char: Option<&str>, cx: &mut Context<Self>) -> bool {
        let outcome = apply_key(&mut self.content, &mut self.cursor, key, key_char);
        if outcome == KeyOutcome::Changed {
            cx.emit(TextInputEvent::Changed);
        }
        if outcome != KeyOutcome::Ignored {
            cx.notify();
        }
        outcome != KeyOutcome::Ignored
    }

    fn handle_key_down(&mut self, event: &KeyDownEvent, _: &mut Window, cx: &mut Context<Self>) {
        let modifiers = &event.keystroke.modifiers;
        if modifiers.platform || modifiers.control {
            return;
        }
        let key_char = event.keystroke.key_char.clone();
        if self.key(&event.keystroke.key, key_char.as_deref(), cx) {
            cx.stop_propagation();
        }
    }
}

impl Focusable for TextInput {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for TextInput {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = &self.theme;
        let focused = self.focus_handle.is_focused(window);
        let (before, after) = self.content.split_at(self.cursor);
        let border = if focused { theme.ui_accent } else { theme.ui_border };

        div()
            .id("text-input")
            .key_context("TextInput")
            .track_focus(&self.focus_handle)
            .on_key_down(cx.listener(Self::handle_key_down))
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|input, _, window, _| window.focus(&input.focus_handle)),
            )
            .flex()
            .flex_row()
            .items_center()
            .w_full()
            .h(px(20.0))
            .px(px(4.0))
            .border_1()
            .border_color(hsla(border))
            .rounded(px(4.0))
            .cursor_text()
            .overflow_hidden()
            .when(self.content.is_empty() && !focused, |d| {
                d.text_color(hsla(theme.ui_text_muted))
                    .child(self.placeholder.clone())
            })
            .when(!self.content.is_empty() || focused, |d| {
                d.child(before.to_string())
                    .when(focused, |d| {
                        d.child(div().w(px(1.0)).h(px(12.0)).bg(hsla(theme.ui_accent)))
                    })
                    .child(after.to_string())
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyOutcome {
    Changed,
    /// The key was used but the text is the same (cursor keys).
    Handled,
    Ignored,
}

fn apply_key(
    content: &mut String,
    cursor: &mut usize,
    key: &str,
    key_char: Option<&str>,
) -> KeyOutcome {
    match key {
        "backspace" => {
            if *cursor == 0 {
                return KeyOutcome::Handled;
            }
            let start = previous_boundary(content, *cursor);
            content.replace_range(start..*cursor, "");
            *cursor = start;
            KeyOutcome::Changed
        }
        "delete" => {
            if *cursor == content.len() {
                return KeyOutcome::Handled;
            }
            let end = next_boundary(content, *cursor);
            content.replace_range(*cursor..end, "");
            KeyOutcome::Changed
        }
        "left" => {
            *cursor = previous_boundary(content, *cursor);
            KeyOutcome::Handled
        }
        "right" => {
            *cursor = next_boundary(content, *cursor);
            KeyOutcome::Handled
        }
        "home" => {
            *cursor = 0;
            KeyOutcome::Handled
        }
        "end" => {
            *cursor = content.len();
            KeyOutcome::Handled
        }
        _ => match key_char.filter(|text| !text.is_empty() && !text.chars().any(char::is_control)) {
            Some(text) => {
                content.insert_str(*cursor, text);
                *cursor += text.len();
                KeyOutcome::Changed
            }
            None => KeyOutcome::Ignored,
        },
    }
}

fn previous_boundary(text: &str, offset: usize) -> usize {
    text[..offset]
        .char_indices()
        .next_back()
        .map_or(0, |(index, _)| index)
}

fn next_boundary(text: &str, offset: usize) -> usize {
    text[offset..]
        .chars()
        .next()
        .map_or(text.len(), |c| offset + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(keys: &[(&str, Option<&str>)]) -> (String, usize) {
        let mut content = String::new();
        let mut cursor = 0;
        for (key, key_char) in keys {
            apply_key(&mut content, &mut cursor, key, *key_char);
        }
        (content, cursor)
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let (content, cursor) = typed(&[
            ("a", Some("a")),
            ("c", Some("c")),
            ("left", None),
            ("b", Some("b")),
        ]);
        assert_eq!(content, "abc");
        assert_eq!(cursor, 2);
    }

    #[test]
    fn backspace_removes_whole_chars() {
        let (content, cursor) = typed(&[
            ("c", Some("c")),
            ("a", Some("a")),
            ("f", Some("f")),
            ("e", Some("é")),
            ("backspace", None),
        ]);
        assert_eq!(content, "caf");
        assert_eq!(cursor, 3);
    }

    #[test]
    fn delete_and_cursor_keys_respect_char_boundaries() {
        let mut content = String::from("añb");
        let mut cursor = 0;
        assert_eq!(
            apply_key(&mut content, &mut cursor, "right", None),
            KeyOutcome::Handled
        );
        assert_eq!(
            apply_key(&mut content, &mut cursor, "delete", None),
            KeyOutcome::Changed
        );
        assert_eq!(content, "ab");
        apply_key(&mut content, &mut cursor, "end", None);
        assert_eq!(
            apply_key(&mut content, &mut cursor, "delete", None),
            KeyOutcome::Handled
        );
        apply_key(&mut content, &mut cursor, "home", None);
        assert_eq!(
            apply_key(&mut content, &mut cursor, "backspace", None),
            KeyOutcome::Handled
        );
        assert_eq!(content, "ab");
    }

    #[test]
    fn control_keys_are_left_alone() {
        let mut content = String::from("x");
        let mut cursor = 1;
        assert_eq!(
            apply_key(&mut content, &mut cursor, "enter", Some("\n")),
            KeyOutcome::Ignored
        );
        assert_eq!(
            apply_key(&mut content, &mut cursor, "escape", None),
            KeyOutcome::Ignored
        );
        assert_eq!(content, "x");
    }

    #[test]
    fn space_is_typed() {
        let (content, _) = typed(&[("a", Some("a")), ("space", Some(" ")), ("b", Some("b"))]);
        assert_eq!(content, "a b");
    }
}
