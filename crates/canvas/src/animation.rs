use crate::viewport::Viewport;
use chrono::{DateTime, Utc};
use graph::{AnimationKind, NodeAnimation, WorldPoint};
use std::time::Duration;

/// Period of the animation tick.
pub const TICK_INTERVAL: Duration = Duration::from_millis(20);

/// Dash offset added per tick.
pub const DASH_STEP: f32 = 0.1;

/// Fraction of the remaining distance covered per tick by a pan-to.
pub const PAN_EASE: f32 = 0.1;

/// Pixels per tick for held movement keys.
pub const MOVE_KEY_SPEED: f32 = 10.0;

const CHECKMARK_STROKE_MS: f32 = 200.0;
const CHECKMARK_LIFETIME_MS: i64 = 1000;

/// A running viewport animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportAnimation {
    /// Ease the top-left corner towards this world point.
    PanTo(WorldPoint),
}

impl ViewportAnimation {
    /// Advance one tick. Returns `false` once the animation has finished, in
    /// which case the viewport sits exactly on the target.
    pub fn step(&self, viewport: &mut Viewport) -> bool {
        match *self {
            ViewportAnimation::PanTo(target) => {
                let remaining = target.0 - viewport.top_left.0;
                let pixels = remaining.abs() * viewport.scale();
                if pixels.x < 1.0 && pixels.y < 1.0 {
                    viewport.top_left = target;
                    return false;
                }
                viewport.top_left = WorldPoint(viewport.top_left.0 + remaining * PAN_EASE);
                true
            }
        }
    }
}

/// How far each stroke of the completion checkmark is drawn, `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CheckmarkProgress {
    pub first: f32,
    pub second: f32,
}

impl CheckmarkProgress {
    pub const DONE: CheckmarkProgress = CheckmarkProgress {
        first: 1.0,
        second: 1.0,
    };
}

pub fn start_completion(now: DateTime<Utc>) -> NodeAnimation {
    NodeAnimation {
        kind: AnimationKind::Complete,
        started_at: now,
    }
}

fn elapsed_ms(animation: &NodeAnimation, now: DateTime<Utc>) -> i64 {
    (now - animation.started_at).num_milliseconds().max(0)
}

pub fn is_expired(animation: &NodeAnimation, now: DateTime<Utc>) -> bool {
    elapsed_ms(animation, now) > CHECKMARK_LIFETIME_MS
}

/// Progress of the checkmark for a complete node. Nodes without a running
/// animation get a fully drawn mark.
pub fn checkmark_progress(animation: Option<&NodeAnimation>, now: DateTime<Utc>) -> CheckmarkProgress {
    let Some(animation) = animation else {
        return CheckmarkProgress::DONE;
    };
    match animation.kind {
        AnimationKind::Complete => {
            let t = elapsed_ms(animation, now) as f32 / CHECKMARK_STROKE_MS;
            CheckmarkProgress {
                first: t.min(1.0),
                second: (t - 1.0).clamp(0.0, 1.0),
            }
        }
    }
}
