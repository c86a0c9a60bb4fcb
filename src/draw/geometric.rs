use std::f64::consts::{FRAC_PI_2, TAU};

use kurbo::Shape as _;

use crate::draw::list::DrawList;
use crate::draw::patterns::{circle_into, hexagon};
use crate::foundation::core::{BezPath, Point};
use crate::settings::model::GeoShape;

/// Count/spacing driven shape parameters of the `geometric` mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoSpec {
    /// Number of rings, rays, lines or lattice half-extent.
    pub count: u32,
    /// Distance between successive elements.
    pub spacing: f64,
    /// Stroke width, and the dot radius.
    pub thickness: f64,
    /// Extent of rays and rulings.
    pub size: f64,
}

/// Emit `shape` into `list`, one op per ring, ray, ruling, cell, triangle or dot.
///
/// Unknown identifiers draw nothing.
pub fn draw_geometric(list: &mut DrawList, shape: &GeoShape, spec: GeoSpec) {
    let GeoSpec {
        count,
        spacing,
        thickness,
        size,
    } = spec;
    match shape {
        GeoShape::Circles => {
            let mut path = BezPath::new();
            for i in 1..=count {
                circle_into(&mut path, f64::from(i) * spacing);
            }
            list.stroke_each(&path, thickness);
        }
        GeoShape::RadialLines => {
            let mut path = BezPath::new();
            for i in 0..count {
                let angle = f64::from(i) / f64::from(count) * TAU;
                path.move_to(Point::ORIGIN);
                path.line_to((angle.cos() * size, angle.sin() * size));
            }
            list.stroke_each(&path, thickness);
        }
        GeoShape::RectangularGrid => {
            let mut path = BezPath::new();
            let n = i64::from(count);
            for i in -n..=n {
                let p = i as f64 * spacing;
                path.move_to((p, -size));
                path.line_to((p, size));
                path.move_to((-size, p));
                path.line_to((size, p));
            }
            list.stroke_each(&path, thickness);
        }
        GeoShape::HexGrid => list.stroke_each(&hexagon(size), thickness),
        GeoShape::Triangles => {
            let mut path = BezPath::new();
            for i in 1..=count {
                let r = f64::from(i) * spacing;
                for j in 0..3 {
                    let angle = f64::from(j) / 3.0 * TAU - FRAC_PI_2;
                    let p = Point::new(angle.cos() * r, angle.sin() * r);
                    if j == 0 {
                        path.move_to(p);
                    } else {
                        path.line_to(p);
                    }
                }
                path.close_path();
            }
            list.stroke_each(&path, thickness);
        }
        GeoShape::Dots => {
            let mut path = BezPath::new();
            if thickness > 0.0 {
                let n = i64::from(count);
                for y in -n..=n {
                    for x in -n..=n {
                        let center = Point::new(x as f64 * spacing, y as f64 * spacing);
                        path.extend(
                            kurbo::Circle::new(center, thickness)
                                .path_elements(crate::draw::list::TOLERANCE),
                        );
                    }
                }
            }
            list.fill_each(&path);
        }
        GeoShape::Unknown(id) => {
            tracing::debug!(shape = %id, "unknown geometric shape, layer left empty");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draw/geometric.rs"]
mod tests;
