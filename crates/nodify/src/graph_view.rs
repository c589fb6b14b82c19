//! The graph surface: owns the editor, drives its tick and runs store writes
//! on the background executor, one batch at a time in the order queued.

use crate::color::hsla;
use crate::element::GraphElement;
use canvas::{EditorEvent, FontKind, GraphEditor, Primitive, Scene, TICK_INTERVAL};
use chrono::Utc;
use gpui::{
    div, prelude::*, px, App, Context, EventEmitter, FocusHandle, Focusable, FontWeight,
    IntoElement, KeyDownEvent, KeyUpEvent, Render, Task, Window,
};
use anyhow::Result;
use graph::ScreenSize;
use std::sync::Arc;
use store::{GraphStore, StoreOp};
use theme::Theme;

/// Width of the box each label is centered in.
const LABEL_BOX_WIDTH: f32 = 240.0;

pub struct GraphView {
    editor: GraphEditor,
    store: Arc<dyn GraphStore>,
    focus_handle: FocusHandle,
    /// The most recently queued write batch. Each batch waits on the one
    /// before it.
    pending_write: Option<Task<()>>,
    _tick: Task<()>,
}

impl EventEmitter<EditorEvent> for GraphView {}

impl GraphView {
    pub fn new(
        store: Arc<dyn GraphStore>,
        user_id: String,
        show_archive: bool,
        cx: &mut Context<Self>,
    ) -> Self {
        let mut editor = GraphEditor::new(user_id.clone(), Theme::dark());
        editor.set_show_archive(show_archive);

        let load = cx.background_executor().spawn({
            let store = store.clone();
            async move { store::load_snapshot(store.as_ref(), &user_id) }
        });
        cx.spawn(async move |this, cx| match load.await {
            Ok(snapshot) => {
                this.update(cx, |view, cx| {
                    view.editor.load(snapshot);
                    cx.notify();
                })
                .ok();
            }
            Err(err) => log::error!("Failed to load graph: {err:#}"),
        })
        .detach();

        let tick = cx.spawn(async move |this, cx| loop {
            cx.background_executor().timer(TICK_INTERVAL).await;
            if this.update(cx, |view, cx| view.tick(cx)).is_err() {
                break;
            }
        });

        Self {
            editor,
            store,
            focus_handle: cx.focus_handle(),
            pending_write: None,
            _tick: tick,
        }
    }

    pub fn editor(&self) -> &GraphEditor {
        &self.editor
    }

    pub fn resize(&mut self, size: ScreenSize) {
        self.editor.resize(size);
    }

    /// Run `f` against the editor, then forward whatever it queued.
    pub fn edit<R>(
        &mut self,
        cx: &mut Context<Self>,
        f: impl FnOnce(&mut GraphEditor) -> R,
    ) -> R {
        let result = f(&mut self.editor);
        self.flush(cx);
        cx.notify();
        result
    }

    fn tick(&mut self, cx: &mut Context<Self>) {
        self.editor.tick();
        self.flush(cx);
        cx.notify();
    }

    fn flush(&mut self, cx: &mut Context<Self>) {
        for event in self.editor.drain_events() {
            cx.emit(event);
        }

        let ops = self.editor.drain_store_ops();
        if ops.is_empty() {
            return;
        }
        let store = self.store.clone();
        let previous = self.pending_write.take();
        self.pending_write = Some(cx.spawn(async move |this, cx| {
            if let Some(previous) = previous {
                previous.await;
            }
            let results = cx
                .background_executor()
                .spawn(async move { write_batch(store.as_ref(), ops) })
                .await;
            this.update(cx, |view, cx| {
                for (op, result) in results {
                    match result {
                        Ok(()) => view.editor.confirm(&op),
                        Err(err) => {
                            log::warn!("{} failed: {err:#}", op.name());
                            view.editor.store_failed(&op);
                        }
                    }
                }
                cx.notify();
            })
            .ok();
        }));
    }

    fn handle_key_down(&mut self, event: &KeyDownEvent, _: &mut Window, cx: &mut Context<Self>) {
        let modifiers = &event.keystroke.modifiers;
        if modifiers.platform || modifiers.control || modifiers.alt {
            return;
        }
        let key = event.keystroke.key.clone();
        if self.edit(cx, |editor| editor.key_down(&key)) {
            cx.stop_propagation();
        }
    }

    fn handle_key_up(&mut self, event: &KeyUpEvent, _: &mut Window, cx: &mut Context<Self>) {
        let key = event.keystroke.key.clone();
        if self.edit(cx, |editor| editor.key_up(&key)) {
            cx.stop_propagation();
        }
    }
}

impl Focusable for GraphView {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for GraphView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let scene = self.editor.render(Utc::now());
        let labels = labels(&scene);

        div()
            .id("graph-view")
            .key_context("graph")
            .track_focus(&self.focus_handle)
            .relative()
            .size_full()
            .overflow_hidden()
            .on_key_down(cx.listener(Self::handle_key_down))
            .on_key_up(cx.listener(Self::handle_key_up))
            .child(GraphElement::new(
                cx.entity(),
                self.focus_handle.clone(),
                scene,
            ))
            .children(labels)
    }
}

fn write_batch(store: &dyn GraphStore, ops: Vec<StoreOp>) -> Vec<(StoreOp, Result<()>)> {
    ops.into_iter()
        .map(|op| {
            let result = store::apply(store, &op);
            (op, result)
        })
        .collect()
}

/// Text primitives are laid out as absolutely positioned children over the
/// painted surface.
fn labels(scene: &Scene) -> Vec<gpui::Div> {
    scene
        .primitives
        .iter()
        .filter_map(|primitive| match primitive {
            Primitive::Text {
                text,
                center,
                size,
                font,
                color,
            } => Some(
                div()
                    .absolute()
                    .left(px(center.x() - LABEL_BOX_WIDTH / 2.0))
                    .top(px(center.y() - size * 0.6))
                    .w(px(LABEL_BOX_WIDTH))
                    .flex()
                    .justify_center()
                    .text_size(px(*size))
                    .line_height(px(size * 1.2))
                    .text_color(hsla(*color))
                    .when(*font == FontKind::MonoBold, |d| {
                        d.font_family("Berkeley Mono").font_weight(FontWeight::BOLD)
                    })
                    .child(text.clone()),
            ),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas::{PointerId, SaveStatus, Tool};
    use gpui::TestAppContext;
    use graph::{ScreenPoint, WorldPoint};
    use store::MemoryStore;

    const MOUSE: PointerId = PointerId(0);

    #[gpui::test]
    fn create_then_move_reach_the_store_in_order(cx: &mut TestAppContext) {
        let store = Arc::new(MemoryStore::new());
        let view = cx.new(|cx| GraphView::new(store.clone(), "root".into(), false, cx));
        cx.run_until_parked();

        view.update(cx, |view, cx| {
            view.resize(ScreenSize::new(800.0, 600.0));
            view.edit(cx, |editor| {
                editor.set_tool(Tool::AddNode);
                editor.pointer_down(MOUSE, ScreenPoint::new(100.0, 100.0), false, Utc::now());
            });
            view.edit(cx, |editor| editor.pointer_up(MOUSE));

            view.edit(cx, |editor| {
                editor.pointer_down(MOUSE, ScreenPoint::new(100.0, 100.0), false, Utc::now());
                editor.pointer_move(MOUSE, ScreenPoint::new(140.0, 100.0));
            });
            view.edit(cx, |editor| editor.pointer_up(MOUSE));
        });
        cx.run_until_parked();

        let nodes = store.fetch_all_nodes().unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].position, WorldPoint::new(7.0, 5.0));
        view.read_with(cx, |view, _| {
            assert_eq!(view.editor().session().save_status, SaveStatus::Saved);
        });
    }
}
