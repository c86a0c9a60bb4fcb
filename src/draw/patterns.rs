//! Overlay-pattern catalog drawn by the `svg` mode.
//!
//! Every drawer works in a layer-local space centered on the origin; `size` is the longer side
//! of the surface, so the patterns cover the surface under any rotation of at most `√2` scale.

use std::f64::consts::{FRAC_PI_2, PI};

use kurbo::Shape as _;

use crate::assets::custom::SlotId;
use crate::draw::list::{DrawList, TOLERANCE};
use crate::foundation::core::{BezPath, Point, Rect, Vec2};
use crate::settings::model::Pattern;

/// Natural size of a ready custom image, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CustomImage {
    /// Slot the pixels live in.
    pub slot: SlotId,
    /// Natural width.
    pub width: f64,
    /// Natural height.
    pub height: f64,
}

/// Emit `pattern` into `list`, one op per ring, ray, ruling, cell or scanline.
///
/// `custom` is the layer's image when its slot is ready; the custom pattern draws nothing
/// otherwise. Unknown identifiers draw nothing.
pub fn draw_pattern(
    list: &mut DrawList,
    pattern: &Pattern,
    size: f64,
    stroke_width: f64,
    custom: Option<CustomImage>,
) {
    match pattern {
        Pattern::Circles => list.stroke_each(&concentric_circles(size), stroke_width),
        Pattern::Spiral => list.stroke(spiral(), stroke_width),
        Pattern::Radial => list.stroke_each(&radial(size), stroke_width),
        Pattern::Grid => list.stroke_each(&grid(size), stroke_width),
        Pattern::Hexagon => list.stroke_each(&hexagon(size), stroke_width),
        Pattern::Waves => list.stroke_each(&waves(size), stroke_width),
        Pattern::Checkers => list.fill_each(&checkers(size)),
        Pattern::Fibonacci => list.stroke(fibonacci(), stroke_width),
        Pattern::Custom => {
            if let Some(img) = custom {
                list.image(img.slot, cover_rect(img.width, img.height, size));
            }
        }
        Pattern::Unknown(id) => {
            tracing::debug!(pattern = %id, "unknown pattern, layer left empty");
        }
    }
}

pub(crate) fn circle_into(path: &mut BezPath, radius: f64) {
    path.extend(kurbo::Circle::new(Point::ORIGIN, radius).path_elements(TOLERANCE));
}

/// Circles of radius 10, 22, 34, ... below `size`.
pub(crate) fn concentric_circles(size: f64) -> BezPath {
    let mut path = BezPath::new();
    for r in steps_from(10.0, size, 12.0) {
        circle_into(&mut path, r);
    }
    path
}

/// Archimedean spiral `r = 8a` sampled at `a = 0, 0.05, ..., 49.95`.
pub(crate) fn spiral() -> BezPath {
    let mut path = BezPath::new();
    for i in 0..1000u32 {
        let a = f64::from(i) * 0.05;
        let r = a * 8.0;
        let p = Point::new(r * a.cos(), r * a.sin());
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path
}

/// 120 rays at 3° steps.
pub(crate) fn radial(size: f64) -> BezPath {
    let mut path = BezPath::new();
    for deg in (0..360u32).step_by(3) {
        let rad = f64::from(deg).to_radians();
        path.move_to(Point::ORIGIN);
        path.line_to(Point::new(rad.cos() * size, rad.sin() * size));
    }
    path
}

/// Rulings every 20 units over `[-size, size]`.
pub(crate) fn grid(size: f64) -> BezPath {
    let mut path = BezPath::new();
    for i in steps_from(-size, size, 20.0) {
        path.move_to((i, -size));
        path.line_to((i, size));
        path.move_to((-size, i));
        path.line_to((size, i));
    }
    path
}

/// Flat-topped hexagons of circumradius 30 tiling `[-size, size]²`.
///
/// Rows and columns use integer indices, so one cell sits on the origin and cells keep their
/// places when `size` changes.
pub(crate) fn hexagon(size: f64) -> BezPath {
    const R: f64 = 30.0;
    let h = R * 3f64.sqrt();
    let col_pitch = R * 1.5;

    let mut path = BezPath::new();
    if !(size.is_finite() && size > 0.0) {
        return path;
    }
    let cols = (size / col_pitch).ceil() as i64;
    let rows = (size / h).ceil() as i64;
    for row in -rows..=rows {
        for col in -cols..=cols {
            let x = col as f64 * col_pitch;
            let y = row as f64 * h + if col.rem_euclid(2) == 1 { h / 2.0 } else { 0.0 };
            for i in 0..6 {
                let angle = f64::from(i) * PI / 3.0;
                let p = Point::new(x + R * angle.cos(), y + R * angle.sin());
                if i == 0 {
                    path.move_to(p);
                } else {
                    path.line_to(p);
                }
            }
            path.close_path();
        }
    }
    path
}

/// Sine scanlines every 15 units, amplitude 20, sampled every 5 units.
pub(crate) fn waves(size: f64) -> BezPath {
    let mut path = BezPath::new();
    for y in steps_from(-size, size, 15.0) {
        for (j, x) in steps_from(-size, size, 5.0).enumerate() {
            let p = Point::new(x, y + (x * 0.05).sin() * 20.0);
            if j == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
    }
    path
}

/// 30-unit squares where the cell parity is even.
pub(crate) fn checkers(size: f64) -> BezPath {
    const STEP: f64 = 30.0;
    let mut path = BezPath::new();
    for y in steps_from(-size, size, STEP) {
        for x in steps_from(-size, size, STEP) {
            let parity = (x / STEP).floor() as i64 + (y / STEP).floor() as i64;
            if parity.rem_euclid(2) == 0 {
                path.extend(Rect::new(x, y, x + STEP, y + STEP).path_elements(TOLERANCE));
            }
        }
    }
    path
}

/// Fifteen chained quarter arcs around the origin with radii `5·fib(i + 1)`.
///
/// Arc `i` spans `[i·90°, (i + 1)·90°]`. Consecutive arcs are joined by a radial segment, as
/// a single open subpath.
pub(crate) fn fibonacci() -> BezPath {
    let mut path = BezPath::new();
    let (mut a, mut b) = (1.0f64, 1.0f64);
    for i in 0..15u32 {
        let radius = a * 5.0;
        let start = f64::from(i) * FRAC_PI_2;
        let start_pt = Point::new(radius * start.cos(), radius * start.sin());
        if i == 0 {
            path.move_to(start_pt);
        } else {
            path.line_to(start_pt);
        }
        let arc = kurbo::Arc {
            center: Point::ORIGIN,
            radii: Vec2::new(radius, radius),
            start_angle: start,
            sweep_angle: FRAC_PI_2,
            x_rotation: 0.0,
        };
        path.extend(arc.append_iter(TOLERANCE));
        (a, b) = (b, a + b);
    }
    path
}

/// Centered placement covering a `size × size` square with the image's aspect ratio.
pub(crate) fn cover_rect(width: f64, height: f64, size: f64) -> Rect {
    let aspect = width / height;
    let (mut w, mut h) = (size, size / aspect);
    if h < size {
        h = size;
        w = size * aspect;
    }
    Rect::new(-w / 2.0, -h / 2.0, w / 2.0, h / 2.0)
}

/// `start, start + step, ...` while below `end`; empty for unusable steps.
pub(crate) fn steps_from(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let usable = crate::foundation::math::usable_step(step) && start.is_finite() && end.is_finite();
    let mut k = 0u64;
    std::iter::from_fn(move || {
        if !usable {
            return None;
        }
        let v = start + step * k as f64;
        if v < end {
            k += 1;
            Some(v)
        } else {
            None
        }
    })
}

#[cfg(test)]
#[path = "../../tests/unit/draw/patterns.rs"]
mod tests;
