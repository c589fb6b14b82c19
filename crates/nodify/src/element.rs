use crate::color::hsla;
use crate::graph_view::GraphView;
use canvas::{CursorGlyph, Gradient, PointerId, Primitive, Scene};
use chrono::Utc;
use glam::Vec2;
use gpui::{
    point, px, size, App, BorderStyle, Bounds, ContentMask, CursorStyle, DispatchPhase, Element,
    ElementId, Entity, FocusHandle, Hitbox, Hsla, IntoElement, MouseButton, MouseDownEvent,
    MouseMoveEvent, MouseUpEvent, PaintQuad, Pixels, Point, ScrollDelta, ScrollWheelEvent, Style,
    Window,
};
use graph::{ScreenPoint, ScreenSize};

/// The mouse is tracked as a single pointer.
const MOUSE: PointerId = PointerId(0);

/// Pixels per scrolled line.
const LINE_HEIGHT: f32 = 20.0;

/// Segments used to approximate a gradient line.
const GRADIENT_SEGMENTS: usize = 24;

/// Paints a [`Scene`] and feeds pointer input back into the editor.
pub struct GraphElement {
    view: Entity<GraphView>,
    focus_handle: FocusHandle,
    scene: Scene,
}

impl GraphElement {
    pub fn new(view: Entity<GraphView>, focus_handle: FocusHandle, scene: Scene) -> Self {
        Self {
            view,
            focus_handle,
            scene,
        }
    }
}

impl IntoElement for GraphElement {
    type Element = Self;

    fn into_element(self) -> Self::Element {
        self
    }
}

pub struct GraphElementState {
    hitbox: Hitbox,
}

impl Element for GraphElement {
    type RequestLayoutState = ();
    type PrepaintState = GraphElementState;

    fn id(&self) -> Option<ElementId> {
        None
    }

    fn source_location(&self) -> Option<&'static std::panic::Location<'static>> {
        None
    }

    fn request_layout(
        &mut self,
        _id: Option<&gpui::GlobalElementId>,
        _inspector_id: Option<&gpui::InspectorElementId>,
        window: &mut Window,
        cx: &mut App,
    ) -> (gpui::LayoutId, Self::RequestLayoutState) {
        let mut style = Style::default();
        style.size.width = gpui::relative(1.).into();
        style.size.height = gpui::relative(1.).into();
        let layout_id = window.request_layout(style, None, cx);
        (layout_id, ())
    }

    fn prepaint(
        &mut self,
        _id: Option<&gpui::GlobalElementId>,
        _inspector_id: Option<&gpui::InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request_layout: &mut Self::RequestLayoutState,
        window: &mut Window,
        cx: &mut App,
    ) -> Self::PrepaintState {
        let screen_size = ScreenSize::new(bounds.size.width.into(), bounds.size.height.into());
        self.view.update(cx, |view, _| {
            if view.editor().session().screen_size != screen_size {
                view.resize(screen_size);
            }
        });
        let hitbox = window.insert_hitbox(bounds, gpui::HitboxBehavior::BlockMouse);
        GraphElementState { hitbox }
    }

    fn paint(
        &mut self,
        _id: Option<&gpui::GlobalElementId>,
        _inspector_id: Option<&gpui::InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request_layout: &mut Self::RequestLayoutState,
        prepaint: &mut Self::PrepaintState,
        window: &mut Window,
        _cx: &mut App,
    ) {
        let origin = bounds.origin;
        if let Some(background) = self.scene.background {
            window.paint_quad(gpui::fill(bounds, hsla(background)));
        }

        window.with_content_mask(Some(ContentMask { bounds }), |window| {
            for primitive in &self.scene.primitives {
                paint_primitive(primitive, origin, window);
            }
        });

        window.set_cursor_style(cursor_style(self.scene.cursor), &prepaint.hitbox);

        let hitbox = prepaint.hitbox.clone();

        window.on_mouse_event({
            let view = self.view.clone();
            let focus_handle = self.focus_handle.clone();
            let hitbox = hitbox.clone();
            move |event: &MouseDownEvent, phase, window, cx| {
                if phase != DispatchPhase::Bubble
                    || event.button != MouseButton::Left
                    || !hitbox.is_hovered(window)
                {
                    return;
                }
                window.focus(&focus_handle);
                let position = local(event.position, bounds);
                let shift = event.modifiers.shift;
                let double = event.click_count == 2;
                view.update(cx, |view, cx| {
                    view.edit(cx, |editor| {
                        editor.pointer_down(MOUSE, position, shift, Utc::now());
                        if double {
                            editor.double_click(position);
                        }
                    })
                });
            }
        });

        window.on_mouse_event({
            let view = self.view.clone();
            let hitbox = hitbox.clone();
            move |event: &MouseMoveEvent, phase, window, cx| {
                if phase != DispatchPhase::Bubble {
                    return;
                }
                let position = local(event.position, bounds);
                let hovered = hitbox.is_hovered(window);
                view.update(cx, |view, cx| {
                    let on_surface = view.editor().session().pointer.is_some();
                    let dragging = view.editor().session().mouse_down;
                    if hovered || dragging {
                        view.edit(cx, |editor| editor.pointer_move(MOUSE, position));
                    } else if on_surface {
                        view.edit(cx, |editor| editor.pointer_leave(MOUSE));
                    }
                });
            }
        });

        window.on_mouse_event({
            let view = self.view.clone();
            move |event: &MouseUpEvent, phase, _window, cx| {
                if phase != DispatchPhase::Bubble || event.button != MouseButton::Left {
                    return;
                }
                // Every press registers the pointer, including ones that set
                // no drag state, so every release has to clear it.
                view.update(cx, |view, cx| {
                    view.edit(cx, |editor| editor.pointer_up(MOUSE));
                });
            }
        });

        window.on_mouse_event({
            let view = self.view.clone();
            move |event: &ScrollWheelEvent, phase, window, cx| {
                if phase != DispatchPhase::Bubble || !hitbox.is_hovered(window) {
                    return;
                }
                let position = local(event.position, bounds);
                let delta_y = wheel_delta_y(&event.delta);
                view.update(cx, |view, cx| {
                    view.edit(cx, |editor| editor.wheel(position, delta_y))
                });
                cx.stop_propagation();
            }
        });
    }
}

fn local(position: Point<Pixels>, bounds: Bounds<Pixels>) -> ScreenPoint {
    ScreenPoint::new(
        (position.x - bounds.origin.x).into(),
        (position.y - bounds.origin.y).into(),
    )
}

/// Wheel delta with positive values meaning "scroll down" (zoom out).
fn wheel_delta_y(delta: &ScrollDelta) -> f32 {
    match delta {
        ScrollDelta::Pixels(p) => {
            let y: f32 = p.y.into();
            -y
        }
        ScrollDelta::Lines(l) => -l.y * LINE_HEIGHT,
    }
}

fn cursor_style(glyph: CursorGlyph) -> CursorStyle {
    match glyph {
        CursorGlyph::Default => CursorStyle::Arrow,
        CursorGlyph::Pointer => CursorStyle::PointingHand,
        CursorGlyph::Grab => CursorStyle::OpenHand,
        CursorGlyph::Grabbing => CursorStyle::ClosedHand,
        CursorGlyph::Copy => CursorStyle::DragCopy,
        CursorGlyph::NoDrop => CursorStyle::OperationNotAllowed,
    }
}

fn to_pixels(p: ScreenPoint, origin: Point<Pixels>) -> Point<Pixels> {
    point(origin.x + px(p.x()), origin.y + px(p.y()))
}

fn paint_primitive(primitive: &Primitive, origin: Point<Pixels>, window: &mut Window) {
    match primitive {
        Primitive::Line {
            from,
            to,
            width,
            color,
        } => paint_segment(from.0, to.0, *width, hsla(*color), origin, window),
        Primitive::GradientLine {
            from,
            to,
            width,
            gradient,
        } => paint_gradient_line(from.0, to.0, *width, gradient, origin, window),
        Primitive::Circle {
            center,
            radius,
            color,
        } => paint_disc(*center, *radius, hsla(*color), origin, window),
        Primitive::Rect {
            origin: corner,
            size: extent,
            fill,
            stroke,
        } => {
            let bounds = Bounds {
                origin: to_pixels(*corner, origin),
                size: size(px(extent.x), px(extent.y)),
            };
            window.paint_quad(PaintQuad {
                bounds,
                corner_radii: px(0.).into(),
                background: hsla(*fill).into(),
                border_widths: px(if stroke.is_some() { 1.0 } else { 0.0 }).into(),
                border_color: stroke.map(hsla).unwrap_or_else(gpui::transparent_black),
                border_style: BorderStyle::Solid,
            });
        }
        Primitive::Polyline {
            points,
            width,
            color,
        } => {
            let color = hsla(*color);
            for pair in points.windows(2) {
                paint_segment(pair[0].0, pair[1].0, *width, color, origin, window);
            }
            // Round caps and joins.
            for p in points.iter() {
                paint_disc(*p, width / 2.0, color, origin, window);
            }
        }
        // Laid out as children by the view.
        Primitive::Text { .. } => {}
    }
}

fn paint_disc(
    center: ScreenPoint,
    radius: f32,
    color: Hsla,
    origin: Point<Pixels>,
    window: &mut Window,
) {
    if radius <= 0.0 {
        return;
    }
    let bounds = Bounds {
        origin: to_pixels(ScreenPoint::new(center.x() - radius, center.y() - radius), origin),
        size: size(px(radius * 2.0), px(radius * 2.0)),
    };
    window.paint_quad(gpui::fill(bounds, color).corner_radii(px(radius)));
}

/// Thick straight segment built from two triangles.
fn paint_segment(
    from: Vec2,
    to: Vec2,
    width: f32,
    color: Hsla,
    origin: Point<Pixels>,
    window: &mut Window,
) {
    let dir = to - from;
    let len = dir.length();
    if len <= 0.0001 || width <= 0.0 {
        return;
    }
    let normal = dir.perp() * (width / 2.0 / len);
    let corner = |p: Vec2| point(origin.x + px(p.x), origin.y + px(p.y));
    let a1 = corner(from + normal);
    let b1 = corner(from - normal);
    let a2 = corner(to + normal);
    let b2 = corner(to - normal);

    let st = (point(0., 1.), point(0., 1.), point(0., 1.));
    let mut path = gpui::Path::new(a1);
    path.push_triangle((a1, b1, a2), st);
    path.push_triangle((a2, b1, b2), st);
    window.paint_path(path, color);
}

fn paint_gradient_line(
    from: Vec2,
    to: Vec2,
    width: f32,
    gradient: &Gradient,
    origin: Point<Pixels>,
    window: &mut Window,
) {
    if gradient.stops().len() <= 1 {
        paint_segment(from, to, width, hsla(gradient.color_at(0.0)), origin, window);
        return;
    }
    let step = 1.0 / GRADIENT_SEGMENTS as f32;
    for i in 0..GRADIENT_SEGMENTS {
        let t0 = i as f32 * step;
        let t1 = t0 + step;
        let color = hsla(gradient.color_at((t0 + t1) / 2.0));
        paint_segment(
            from.lerp(to, t0),
            from.lerp(to, t1),
            width,
            color,
            origin,
            window,
        );
    }
}
