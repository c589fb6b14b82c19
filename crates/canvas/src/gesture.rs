//! Pointer tracking and pinch detection.
//!
//! The machine only remembers in-flight pointers and the last pinch distance.
//! What a press or a drag *means* is decided by the editor.

use glam::Vec2;
use graph::ScreenPoint;
use smallvec::SmallVec;

/// Host supplied pointer identifier. The mouse is usually pointer 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

const NO_BASELINE: f32 = -1.0;

/// Divisor turning a change in pinch distance into a relative scale change.
pub const PINCH_SENSITIVITY: f32 = 200.0;

#[derive(Clone, Copy, Debug)]
struct TrackedPointer {
    id: PointerId,
    position: ScreenPoint,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    SingleActive,
    PinchActive,
}

/// What a pointer move amounts to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureMove {
    /// Two pointers are down and a baseline was already known. `delta` is
    /// the change in distance since the last move, negative when converging.
    Pinch { delta: f32 },
    /// Two pointers are down; this move only establishes the baseline.
    PinchBaseline,
    /// A single pointer moved by `delta` pixels since its last event. Zero
    /// for pointers that were never pressed.
    Single { delta: Vec2 },
}

#[derive(Debug)]
pub struct GestureMachine {
    pointers: SmallVec<[TrackedPointer; 2]>,
    pinch_baseline: f32,
}

impl Default for GestureMachine {
    fn default() -> Self {
        Self {
            pointers: SmallVec::new(),
            pinch_baseline: NO_BASELINE,
        }
    }
}

impl GestureMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        match self.pointers.len() {
            0 => GestureState::Idle,
            1 => GestureState::SingleActive,
            _ => GestureState::PinchActive,
        }
    }

    pub fn pointer_down(&mut self, id: PointerId, position: ScreenPoint) {
        match self.pointers.iter_mut().find(|p| p.id == id) {
            Some(pointer) => pointer.position = position,
            None => self.pointers.push(TrackedPointer { id, position }),
        }
    }

    /// Forget a pointer on up, cancel or leave.
    pub fn pointer_up(&mut self, id: PointerId) {
        if let Some(index) = self.pointers.iter().position(|p| p.id == id) {
            self.pointers.remove(index);
        }
        if self.pointers.len() < 2 {
            self.pinch_baseline = NO_BASELINE;
        }
    }

    pub fn pointer_move(&mut self, id: PointerId, position: ScreenPoint) -> GestureMove {
        let mut delta = Vec2::ZERO;
        if let Some(pointer) = self.pointers.iter_mut().find(|p| p.id == id) {
            delta = position.0 - pointer.position.0;
            pointer.position = position;
        }

        if self.pointers.len() == 2 {
            let distance = self.pointers[0].position.distance(self.pointers[1].position);
            let baseline = self.pinch_baseline;
            self.pinch_baseline = distance;
            if baseline > 0.0 {
                return GestureMove::Pinch {
                    delta: distance - baseline,
                };
            }
            return GestureMove::PinchBaseline;
        }

        GestureMove::Single { delta }
    }
}

/// Scale after a pinch step. Converging pointers (`delta < 0`) zoom in.
pub fn pinch_scale(scale: f32, delta: f32) -> f32 {
    scale - scale * delta / PINCH_SENSITIVITY
}
