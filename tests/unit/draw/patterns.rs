use kurbo::{PathEl, Shape as _};

use super::*;
use crate::draw::list::DrawOp;

fn move_count(path: &BezPath) -> usize {
    path.elements()
        .iter()
        .filter(|el| matches!(el, PathEl::MoveTo(_)))
        .count()
}

fn stroke_widths(list: &DrawList) -> Vec<f64> {
    list.ops()
        .iter()
        .map(|op| match op {
            DrawOp::Stroke { width, .. } => *width,
            other => panic!("expected stroke, got {other:?}"),
        })
        .collect()
}

#[test]
fn concentric_circles_step_by_twelve_below_size() {
    let path = concentric_circles(100.0);
    // 10, 22, ..., 94
    assert_eq!(move_count(&path), 8);
    let bbox = path.bounding_box();
    assert!((bbox.width() - 188.0).abs() < 0.5);
}

#[test]
fn spiral_is_one_polyline_of_a_thousand_points() {
    let path = spiral();
    assert_eq!(move_count(&path), 1);
    assert_eq!(path.elements().len(), 1000);
    let Some(PathEl::LineTo(last)) = path.elements().last().copied() else {
        panic!("spiral must end with a line");
    };
    let r = last.to_vec2().hypot();
    assert!((r - 49.95 * 8.0).abs() < 1e-6);
}

#[test]
fn radial_has_120_rays_of_length_size() {
    let path = radial(250.0);
    assert_eq!(move_count(&path), 120);
    for el in path.elements() {
        if let PathEl::LineTo(p) = el {
            assert!((p.to_vec2().hypot() - 250.0).abs() < 1e-9);
        }
    }
}

#[test]
fn grid_spans_both_axes() {
    let path = grid(40.0);
    // i = -40, -20, 0, 20 gives 4 vertical and 4 horizontal lines.
    assert_eq!(move_count(&path), 8);
}

#[test]
fn hexagon_cells_have_six_vertices_at_radius_30() {
    let path = hexagon(60.0);
    let cols = (60.0f64 / 45.0).ceil() as usize * 2 + 1;
    let rows = (60.0 / (30.0 * 3f64.sqrt())).ceil() as usize * 2 + 1;
    assert_eq!(move_count(&path), cols * rows);
    let closes = path
        .elements()
        .iter()
        .filter(|el| matches!(el, PathEl::ClosePath))
        .count();
    assert_eq!(closes, cols * rows);
}

fn first_vertices(path: &BezPath) -> Vec<Point> {
    path.elements()
        .iter()
        .filter_map(|el| match el {
            PathEl::MoveTo(p) => Some(*p),
            _ => None,
        })
        .collect()
}

#[test]
fn hexagon_lattice_is_anchored_at_the_origin() {
    let small = first_vertices(&hexagon(60.0));
    let large = first_vertices(&hexagon(200.0));
    assert!(small.contains(&Point::new(30.0, 0.0)));
    for p in &small {
        assert!(large.contains(p), "{p:?} moved with size");
    }
}

#[test]
fn checkers_fill_even_cells() {
    let path = checkers(60.0);
    // 4x4 cells between -60 and 60, half of them even.
    assert_eq!(move_count(&path), 8);
}

#[test]
fn waves_sample_every_five_units() {
    let path = waves(30.0);
    // Scanlines at -30, -15, 0, 15; 12 samples each.
    assert_eq!(move_count(&path), 4);
    assert_eq!(path.elements().len(), 48);
}

#[test]
fn fibonacci_radii_follow_the_sequence() {
    let path = fibonacci();
    assert_eq!(move_count(&path), 1);

    let mut starts = Vec::new();
    for el in path.elements() {
        match el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => starts.push(*p),
            _ => {}
        }
    }
    assert_eq!(starts.len(), 15);

    let fib = [1.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0, 34.0, 55.0, 89.0, 144.0, 233.0, 377.0, 610.0];
    let mut prev = 0.0;
    for (i, p) in starts.iter().enumerate() {
        let r = p.to_vec2().hypot();
        assert!((r - fib[i] * 5.0).abs() < 1e-9, "arc {i} radius {r}");
        assert!(r >= prev);
        prev = r;

        let expected = (i as f64 * 90.0).rem_euclid(360.0);
        let angle = p.y.atan2(p.x).to_degrees().rem_euclid(360.0);
        let diff = (angle - expected).abs().min(360.0 - (angle - expected).abs());
        assert!(diff < 1e-6, "arc {i} starts at {angle}");
    }
}

#[test]
fn cover_rect_fills_the_square() {
    let r = cover_rect(200.0, 100.0, 300.0);
    assert_eq!(r, Rect::new(-300.0, -150.0, 300.0, 150.0));
    let r = cover_rect(100.0, 400.0, 200.0);
    assert_eq!(r.width(), 200.0);
    assert_eq!(r.height(), 800.0);
}

#[test]
fn catalog_dispatch() {
    let mut list = DrawList::new();
    draw_pattern(&mut list, &Pattern::Radial, 100.0, 3.0, None);
    let widths = stroke_widths(&list);
    assert_eq!(widths.len(), 120);
    assert!(widths.iter().all(|&w| w == 3.0));

    let mut list = DrawList::new();
    draw_pattern(&mut list, &Pattern::Checkers, 60.0, 3.0, None);
    assert_eq!(list.ops().len(), 8);
    assert!(list.ops().iter().all(|op| matches!(op, DrawOp::Fill { .. })));

    let mut list = DrawList::new();
    draw_pattern(&mut list, &Pattern::Spiral, 100.0, 2.0, None);
    assert_eq!(stroke_widths(&list).len(), 1);
}

#[test]
fn every_ruling_and_cell_is_its_own_op() {
    let mut list = DrawList::new();
    draw_pattern(&mut list, &Pattern::Grid, 40.0, 2.0, None);
    assert_eq!(list.ops().len(), 8);
    for op in list.ops() {
        let DrawOp::Stroke { path, .. } = op else {
            panic!("expected stroke, got {op:?}");
        };
        assert_eq!(move_count(path), 1);
    }

    let mut list = DrawList::new();
    draw_pattern(&mut list, &Pattern::Hexagon, 60.0, 2.0, None);
    assert_eq!(list.ops().len(), move_count(&hexagon(60.0)));

    let mut list = DrawList::new();
    draw_pattern(&mut list, &Pattern::Circles, 100.0, 2.0, None);
    assert_eq!(list.ops().len(), 8);
}

#[test]
fn unknown_and_unready_patterns_draw_nothing() {
    let mut list = DrawList::new();
    draw_pattern(&mut list, &Pattern::from("stars"), 100.0, 2.0, None);
    draw_pattern(&mut list, &Pattern::Custom, 100.0, 2.0, None);
    assert!(list.is_empty());

    let img = CustomImage {
        slot: SlotId::Reveal,
        width: 10.0,
        height: 20.0,
    };
    draw_pattern(&mut list, &Pattern::Custom, 100.0, 2.0, Some(img));
    match &list.ops()[0] {
        DrawOp::Image { slot, rect } => {
            assert_eq!(*slot, SlotId::Reveal);
            assert_eq!(rect.width(), 100.0);
            assert_eq!(rect.height(), 200.0);
        }
        other => panic!("expected image, got {other:?}"),
    }
}

#[test]
fn zero_step_iterators_terminate() {
    assert_eq!(steps_from(-10.0, 10.0, 0.0).count(), 0);
    assert_eq!(steps_from(-10.0, 10.0, -1.0).count(), 0);
    assert_eq!(steps_from(0.0, 10.0, 2.5).collect::<Vec<_>>(), vec![0.0, 2.5, 5.0, 7.5]);
}
