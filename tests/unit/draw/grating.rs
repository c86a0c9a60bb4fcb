use kurbo::PathEl;

use super::*;
use crate::draw::list::DrawOp;

fn grating(period: f64) -> LineGrating {
    LineGrating {
        period,
        thickness: 2.0,
        angle: 0.0,
        size: 500.0,
        offset_y: 0.0,
        curve: None,
    }
}

fn lines(list: &DrawList) -> Vec<&BezPath> {
    list.ops()
        .iter()
        .map(|op| match op {
            DrawOp::Stroke { path, .. } => path,
            other => panic!("expected stroke, got {other:?}"),
        })
        .collect()
}

fn starts(list: &DrawList) -> Vec<Point> {
    lines(list)
        .into_iter()
        .flat_map(|path| path.elements().iter())
        .filter_map(|el| match el {
            PathEl::MoveTo(p) => Some(*p),
            _ => None,
        })
        .collect()
}

#[test]
fn line_count_covers_twice_the_size_plus_margin() {
    assert_eq!(grating(8.0).line_count(), 135);
    assert_eq!(grating(0.0).line_count(), 0);
    assert_eq!(grating(f64::NAN).line_count(), 0);
}

#[test]
fn horizontal_lines_are_one_period_apart() {
    let mut list = DrawList::new();
    draw_grating(&mut list, &grating(8.0));
    assert_eq!(list.ops().len(), 135);
    let starts = starts(&list);
    assert_eq!(starts.len(), 135);
    assert_eq!(starts[0], Point::new(-350.0, -540.0));
    for pair in starts.windows(2) {
        assert!((pair[1].y - pair[0].y - 8.0).abs() < 1e-9);
    }
}

#[test]
fn offset_wraps_into_one_period() {
    let mut g = grating(8.0);
    g.offset_y = -3.0;
    let mut list = DrawList::new();
    draw_grating(&mut list, &g);
    assert!((starts(&list)[0].y - (-540.0 + 5.0)).abs() < 1e-9);

    g.offset_y = 19.0;
    let mut list = DrawList::new();
    draw_grating(&mut list, &g);
    assert!((starts(&list)[0].y - (-540.0 + 3.0)).abs() < 1e-9);
}

#[test]
fn inclination_shears_each_line() {
    let mut g = grating(10.0);
    g.angle = 45.0;
    let mut list = DrawList::new();
    draw_grating(&mut list, &g);
    let path = lines(&list)[0];
    let (PathEl::MoveTo(a), PathEl::LineTo(b)) = (path.elements()[0], path.elements()[1]) else {
        panic!("expected a straight segment");
    };
    assert!(((b.y - a.y) / (b.x - a.x) - 1.0).abs() < 1e-9);
}

#[test]
fn curved_lines_sample_fifty_one_points() {
    let mut g = grating(50.0);
    g.curve = Some(GratingCurve {
        amplitude: 5.0,
        frequency: 2.0,
        time: 0.3,
    });
    let mut list = DrawList::new();
    draw_grating(&mut list, &g);
    let paths = lines(&list);
    assert_eq!(paths.len(), g.line_count() as usize);
    assert!(paths.iter().all(|path| path.elements().len() == 51));
}

#[test]
fn degenerate_period_draws_nothing() {
    let mut list = DrawList::new();
    draw_grating(&mut list, &grating(0.0));
    draw_grating(&mut list, &grating(-4.0));
    assert!(list.is_empty());
}
