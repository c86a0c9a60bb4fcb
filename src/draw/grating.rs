use std::f64::consts::PI;

use crate::draw::list::DrawList;
use crate::foundation::core::{BezPath, Point};
use crate::foundation::math::{usable_step, wrap};

/// Samples across a curved line.
const CURVE_STEPS: u32 = 50;

/// A family of parallel lines inclined by shear.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineGrating {
    /// Distance between lines.
    pub period: f64,
    /// Stroke width.
    pub thickness: f64,
    /// Inclination in degrees; `y = base + tan(angle)·x`.
    pub angle: f64,
    /// Extent; usually the surface diagonal.
    pub size: f64,
    /// Extra vertical phase, wrapped into one period.
    pub offset_y: f64,
    /// Traveling-wave distortion, when enabled.
    pub curve: Option<GratingCurve>,
}

/// Traveling-wave distortion of the local line angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GratingCurve {
    /// Amplitude in degrees.
    pub amplitude: f64,
    /// Waves across `size`.
    pub frequency: f64,
    /// Phase, advanced with time.
    pub time: f64,
}

impl LineGrating {
    /// Number of lines drawn: `ceil(2·size / period) + 10`.
    pub fn line_count(&self) -> u32 {
        if !usable_step(self.period) || !self.size.is_finite() {
            return 0;
        }
        ((2.0 * self.size / self.period).ceil().max(0.0) as u32).saturating_add(10)
    }
}

/// Emit the grating, one stroke per line.
pub fn draw_grating(list: &mut DrawList, g: &LineGrating) {
    let n = g.line_count();
    if n == 0 {
        return;
    }
    let start = -(f64::from(n)) * g.period / 2.0;
    let phase = wrap(g.offset_y, g.period);
    let half = g.size / 2.0 + 100.0;

    let mut path = BezPath::new();
    for i in 0..n {
        let base = start + f64::from(i) * g.period + phase;
        match g.curve {
            None => {
                let slope = g.angle.to_radians().tan();
                path.move_to((-half, base - slope * half));
                path.line_to((half, base + slope * half));
            }
            Some(c) => {
                for step in 0..=CURVE_STEPS {
                    let x = -half + 2.0 * half * f64::from(step) / f64::from(CURVE_STEPS);
                    let wave = ((x / g.size) * PI * c.frequency + c.time).sin() * c.amplitude;
                    let y = base + (g.angle + wave).to_radians().tan() * x;
                    if step == 0 {
                        path.move_to(Point::new(x, y));
                    } else {
                        path.line_to(Point::new(x, y));
                    }
                }
            }
        }
    }
    list.stroke_each(&path, g.thickness);
}

#[cfg(test)]
#[path = "../../tests/unit/draw/grating.rs"]
mod tests;
