use super::*;

#[test]
fn subpaths_split_at_every_move() {
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((1.0, 0.0));
    path.move_to((0.0, 1.0));
    path.line_to((1.0, 1.0));
    path.close_path();

    let subs = subpaths(&path);
    assert_eq!(subs.len(), 2);
    assert_eq!(subs[0].elements().len(), 2);
    assert_eq!(subs[1].elements().len(), 3);
}

#[test]
fn stroke_each_emits_one_op_per_subpath() {
    let mut path = BezPath::new();
    for i in 0..3 {
        path.move_to((f64::from(i), 0.0));
        path.line_to((f64::from(i), 5.0));
    }
    let mut list = DrawList::new();
    list.stroke_each(&path, 2.0);
    assert_eq!(list.ops().len(), 3);
    assert!(
        list.ops()
            .iter()
            .all(|op| matches!(op, DrawOp::Stroke { width, .. } if *width == 2.0))
    );

    list.stroke_each(&path, 0.0);
    list.fill_each(&BezPath::new());
    assert_eq!(list.ops().len(), 3);
}

#[test]
fn fill_each_keeps_rect_order() {
    use kurbo::Shape as _;

    let mut path = BezPath::new();
    path.extend(Rect::new(0.0, 0.0, 1.0, 1.0).path_elements(TOLERANCE));
    path.extend(Rect::new(5.0, 0.0, 6.0, 1.0).path_elements(TOLERANCE));
    let mut list = DrawList::new();
    list.fill_each(&path);
    let xs: Vec<f64> = list
        .ops()
        .iter()
        .map(|op| match op {
            DrawOp::Fill { path } => path.bounding_box().x0,
            other => panic!("expected fill, got {other:?}"),
        })
        .collect();
    assert_eq!(xs, vec![0.0, 5.0]);
}
