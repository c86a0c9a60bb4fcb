use kurbo::{PathEl, Shape as _};

use super::*;
use crate::draw::list::DrawOp;

fn spec(count: u32, spacing: f64) -> GeoSpec {
    GeoSpec {
        count,
        spacing,
        thickness: 2.0,
        size: 400.0,
    }
}

fn strokes(list: &DrawList) -> Vec<&BezPath> {
    list.ops()
        .iter()
        .map(|op| match op {
            DrawOp::Stroke { path, .. } => path,
            other => panic!("expected stroke, got {other:?}"),
        })
        .collect()
}

#[test]
fn circles_have_radii_at_spacing_multiples() {
    let mut list = DrawList::new();
    draw_geometric(&mut list, &GeoShape::Circles, spec(5, 15.0));
    let subs = strokes(&list);
    assert_eq!(subs.len(), 5);
    for (i, sub) in subs.iter().enumerate() {
        let bbox = sub.bounding_box();
        let r = 15.0 * (i as f64 + 1.0);
        assert!((bbox.width() / 2.0 - r).abs() < 0.15, "ring {i}");
        assert!(bbox.center().to_vec2().hypot() < 0.2);
    }
}

#[test]
fn radial_lines_fan_evenly() {
    let mut list = DrawList::new();
    draw_geometric(&mut list, &GeoShape::RadialLines, spec(4, 15.0));
    let ends: Vec<_> = strokes(&list)
        .into_iter()
        .flat_map(|path| path.elements().iter())
        .filter_map(|el| match el {
            PathEl::LineTo(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(ends.len(), 4);
    assert!((ends[1].y - 400.0).abs() < 1e-9);
    assert!((ends[2].x + 400.0).abs() < 1e-9);
}

#[test]
fn rectangular_grid_has_two_count_plus_one_lines_per_axis() {
    let mut list = DrawList::new();
    draw_geometric(&mut list, &GeoShape::RectangularGrid, spec(3, 10.0));
    assert_eq!(strokes(&list).len(), 2 * 7);
}

#[test]
fn triangles_point_up() {
    let mut list = DrawList::new();
    draw_geometric(&mut list, &GeoShape::Triangles, spec(2, 10.0));
    let subs = strokes(&list);
    assert_eq!(subs.len(), 2);
    let Some(PathEl::MoveTo(apex)) = subs[1].elements().first().copied() else {
        panic!("triangle must start with a move");
    };
    assert!(apex.x.abs() < 1e-9);
    assert!((apex.y + 20.0).abs() < 1e-9);
}

#[test]
fn dots_fill_the_lattice() {
    let mut list = DrawList::new();
    draw_geometric(&mut list, &GeoShape::Dots, spec(2, 10.0));
    assert_eq!(list.ops().len(), 25);
    for op in list.ops() {
        let DrawOp::Fill { path } = op else {
            panic!("dots must be filled");
        };
        assert!((path.bounding_box().width() - 4.0).abs() < 0.1);
    }
}

#[test]
fn unknown_shape_draws_nothing() {
    let mut list = DrawList::new();
    draw_geometric(&mut list, &GeoShape::from("blob"), spec(5, 15.0));
    assert!(list.is_empty());
}
