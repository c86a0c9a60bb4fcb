use crate::foundation::core::Vec2;
use crate::foundation::math::wrap;
use crate::settings::model::{Axis, MovementKind, MovementParams, ScaleAnimParams};

/// Displacement of the reveal layer at `time`.
///
/// `t = time·speed·0.5`; the vertical component of swing, linear and lissajous runs at
/// `xy_ratio` times the horizontal rate. The axis restriction zeroes the other component.
pub fn movement_offset(time: f64, m: &MovementParams) -> Vec2 {
    let t = time * m.speed * 0.5;
    let ratio = m.xy_ratio;

    let (dx, dy) = match m.kind {
        MovementKind::Rotation => (0.0, 0.0),
        MovementKind::Swing => (t.sin() * m.swing_x, (t * ratio).sin() * m.swing_y),
        MovementKind::Linear => (
            triangle(t) * m.swing_x - m.swing_x,
            triangle(t * ratio) * m.swing_y - m.swing_y,
        ),
        MovementKind::Circular => (t.cos() * m.swing_x, t.sin() * m.swing_y),
        MovementKind::Lissajous => ((3.0 * t).sin() * m.swing_x, (2.0 * ratio * t).sin() * m.swing_y),
    };

    match m.axis {
        Axis::Both => Vec2::new(dx, dy),
        Axis::X => Vec2::new(dx, 0.0),
        Axis::Y => Vec2::new(0.0, dy),
    }
}

/// Period-4 triangle wave in `[0, 2]`: up over `[0, 2)`, down over `[2, 4)`.
fn triangle(t: f64) -> f64 {
    let u = wrap(t, 4.0);
    if u < 2.0 { u } else { 4.0 - u }
}

/// Uniform scale factor of the reveal layer at `time`; `1.0` when disabled.
pub fn animated_scale(time: f64, s: &ScaleAnimParams) -> f64 {
    if !s.enabled {
        return 1.0;
    }
    let t = time * s.speed * 0.3;
    let unit = t.sin() * 0.5 + 0.5;
    (s.min + unit * (s.max - s.min)) / 100.0
}

#[cfg(test)]
#[path = "../../tests/unit/anim/oscillator.rs"]
mod tests;
