//! Nodify: a node graph task editor.

use anyhow::{Context as _, Result};
use canvas::{EditorEvent, Tool};
use chrono::Utc;
use clap::Parser;
use config::Args;
use gpui::{
    actions, div, point, prelude::*, px, App, Application, Context, Entity, FocusHandle, Focusable,
    IntoElement, KeyBinding, Menu, MenuItem, Subscription, TitlebarOptions, Window,
    WindowBackgroundAppearance, WindowOptions,
};
use graph_view::GraphView;
use layer_list::LayerList;
use logger::NodifyLogger;
use node_panel::NodePanel;
use status_bar::StatusBar;
use std::sync::Arc;
use store::{GraphStore, JsonFileStore};
use theme::Theme;
use tool_rail::ToolRail;

mod color;
mod components;
mod config;
mod element;
mod graph_view;
mod input;
mod layer_list;
mod logger;
mod node_panel;
mod seed;
mod status_bar;
mod tool_rail;

actions!(
    nodify,
    [
        AddEdgeTool,
        AddNodeTool,
        CompleteNodeTool,
        DeleteNodeTool,
        MoveTool,
        PointerTool,
        Quit,
        RemoveEdgeTool,
    ]
);

/// Main application component
struct Nodify {
    graph: Entity<GraphView>,
    tool_rail: Entity<ToolRail>,
    layer_list: Entity<LayerList>,
    node_panel: Entity<NodePanel>,
    status_bar: Entity<StatusBar>,
    theme: Theme,
    _subscriptions: Vec<Subscription>,
}

impl Nodify {
    fn new(store: Arc<dyn GraphStore>, args: &Args, cx: &mut Context<Self>) -> Self {
        let theme = Theme::dark();
        let graph =
            cx.new(|cx| GraphView::new(store, args.user.clone(), args.show_archive, cx));
        let tool_rail = cx.new(|_| ToolRail::new(graph.clone(), theme.clone()));
        let layer_list = cx.new(|_| LayerList::new(graph.clone(), theme.clone()));
        let node_panel = cx.new(|cx| NodePanel::new(graph.clone(), theme.clone(), cx));
        let status_bar = cx.new(|_| StatusBar::new(graph.clone(), theme.clone()));

        let graph_subscription = cx.subscribe(&graph, Self::handle_editor_event);

        Nodify {
            graph,
            tool_rail,
            layer_list,
            node_panel,
            status_bar,
            theme,
            _subscriptions: vec![graph_subscription],
        }
    }

    fn handle_editor_event(
        &mut self,
        _graph: Entity<GraphView>,
        event: &EditorEvent,
        cx: &mut Context<Self>,
    ) {
        match event {
            EditorEvent::OpenNodePanel(id) => log::debug!("open panel for {id}"),
            EditorEvent::ToolChanged(tool) => log::debug!("tool changed to {tool}"),
        }
        cx.notify();
    }

    fn activate(&mut self, tool: Tool, cx: &mut Context<Self>) {
        self.graph.update(cx, |graph, cx| {
            graph.edit(cx, |editor| editor.set_tool(tool));
        });
    }

    fn pointer_tool(&mut self, _: &PointerTool, _window: &mut Window, cx: &mut Context<Self>) {
        self.activate(Tool::Pointer, cx);
    }

    fn move_tool(&mut self, _: &MoveTool, _window: &mut Window, cx: &mut Context<Self>) {
        self.activate(Tool::Move, cx);
    }

    fn add_node_tool(&mut self, _: &AddNodeTool, _window: &mut Window, cx: &mut Context<Self>) {
        self.activate(Tool::AddNode, cx);
    }

    fn complete_node_tool(
        &mut self,
        _: &CompleteNodeTool,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.activate(Tool::CompleteNode, cx);
    }

    fn delete_node_tool(
        &mut self,
        _: &DeleteNodeTool,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.activate(Tool::DeleteNode, cx);
    }

    fn add_edge_tool(&mut self, _: &AddEdgeTool, _window: &mut Window, cx: &mut Context<Self>) {
        self.activate(Tool::AddEdge, cx);
    }

    fn remove_edge_tool(
        &mut self,
        _: &RemoveEdgeTool,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.activate(Tool::RemoveEdge, cx);
    }
}

impl Render for Nodify {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        div()
            .id("Nodify")
            .key_context("nodify")
            .absolute()
            .top_0()
            .left_0()
            .size_full()
            .flex()
            .flex_col()
            .font_family("Berkeley Mono")
            .text_xs()
            .bg(color::hsla(self.theme.canvas_background))
            .text_color(color::hsla(self.theme.ui_text))
            .border_1()
            .border_color(gpui::white().alpha(0.08))
            .rounded(px(16.))
            .overflow_hidden()
            .on_action(cx.listener(Self::pointer_tool))
            .on_action(cx.listener(Self::move_tool))
            .on_action(cx.listener(Self::add_node_tool))
            .on_action(cx.listener(Self::complete_node_tool))
            .on_action(cx.listener(Self::delete_node_tool))
            .on_action(cx.listener(Self::add_edge_tool))
            .on_action(cx.listener(Self::remove_edge_tool))
            .child(
                div()
                    .flex_1()
                    .flex()
                    .flex_row()
                    .overflow_hidden()
                    // Far left: tool rail
                    .child(div().pt(px(32.0)).child(self.tool_rail.clone()))
                    // Center: graph surface with floating panels
                    .child(
                        div()
                            .relative()
                            .flex_1()
                            .h_full()
                            .child(self.graph.clone())
                            .child(
                                div()
                                    .absolute()
                                    .top(px(8.0))
                                    .left(px(8.0))
                                    .child(self.layer_list.clone()),
                            )
                            .child(
                                div()
                                    .absolute()
                                    .top(px(8.0))
                                    .right(px(8.0))
                                    .child(self.node_panel.clone()),
                            ),
                    ),
            )
            .child(self.status_bar.clone())
    }
}

impl Focusable for Nodify {
    fn focus_handle(&self, cx: &App) -> FocusHandle {
        self.graph.read(cx).focus_handle(cx)
    }
}

fn open_store(args: &Args) -> Result<Arc<dyn GraphStore>> {
    let path = args.store_path()?;
    let store = JsonFileStore::open(&path)
        .with_context(|| format!("Failed to open graph store {}", path.display()))?;
    if args.seed {
        seed::seed_if_empty(&store, Utc::now())?;
    }
    Ok(Arc::new(store))
}

fn main() {
    let args = Args::parse();
    if let Err(err) = NodifyLogger::init(args.log_level) {
        eprintln!("Failed to initialize logger: {err:#}");
    }

    let store = match open_store(&args) {
        Ok(store) => store,
        Err(err) => {
            log::error!("{err:#}");
            std::process::exit(1);
        }
    };

    Application::new().run(move |cx: &mut App| {
        cx.on_action(quit);

        cx.set_menus(vec![
            Menu {
                name: "Nodify".into(),
                items: vec![MenuItem::action("Quit", Quit)],
            },
            Menu {
                name: "Tools".into(),
                items: vec![
                    MenuItem::action("Pointer (V)", PointerTool),
                    MenuItem::action("Move (M)", MoveTool),
                    MenuItem::action("Add node (N)", AddNodeTool),
                    MenuItem::action("Complete node (C)", CompleteNodeTool),
                    MenuItem::action("Delete node (X)", DeleteNodeTool),
                    MenuItem::action("Add edge (E)", AddEdgeTool),
                    MenuItem::action("Remove edge (R)", RemoveEdgeTool),
                ],
            },
        ]);

        cx.bind_keys([KeyBinding::new("cmd-q", Quit, None)]);

        let window = cx
            .open_window(
                WindowOptions {
                    titlebar: Some(TitlebarOptions {
                        title: Some("Nodify".into()),
                        appears_transparent: true,
                        traffic_light_position: Some(point(px(8.0), px(8.0))),
                    }),
                    window_background: WindowBackgroundAppearance::Transparent,
                    ..Default::default()
                },
                |_window, cx| cx.new(|cx| Nodify::new(store.clone(), &args, cx)),
            )
            .expect("failed to open the main window");

        window
            .update(cx, |view, window, cx| {
                window.focus(&view.focus_handle(cx));
                cx.activate(true);
            })
            .ok();
    });
}

fn quit(_: &Quit, cx: &mut App) {
    cx.quit();
}
