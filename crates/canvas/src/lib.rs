//! The interaction and viewport engine of the graph editor.
//!
//! [`GraphEditor`] takes raw pointer, wheel and key input plus a periodic
//! tick, mutates the viewport and graph, queues store writes, and produces a
//! toolkit-independent [`Scene`] every frame. It never touches a window; the
//! host owns painting and the store.

mod animation;
mod edge_selection;
mod editor;
mod gesture;
mod hints;
mod render;
mod scene;
mod session;
mod tools;
mod viewport;

pub use animation::{CheckmarkProgress, ViewportAnimation, TICK_INTERVAL};
pub use edge_selection::{EdgeActionState, EdgeMode};
pub use editor::{EditorEvent, GraphEditor};
pub use gesture::{GestureState, PointerId};
pub use hints::{Emphasis, HintSpan};
pub use render::parse_delta_time;
pub use scene::{CursorGlyph, FontKind, Gradient, Primitive, Scene};
pub use session::{Held, SaveStatus, SelectionArea, Session};
pub use tools::{MoveKey, Tool};
pub use viewport::{Viewport, DEFAULT_SCALE, MAX_SCALE, MIN_SCALE};

/// Half-width, in world units, of the square used to hit-test nodes.
pub const HIT_TOLERANCE: f32 = 1.0;
