use super::*;

#[test]
fn clip_widths_follow_cutoffs() {
    let base = ClipSpan::base(50.0, 400.0);
    assert_eq!((base.x0, base.x1), (0.0, 200.0));
    assert_eq!(base.width(), 200.0);

    let reveal = ClipSpan::reveal(25.0, 400.0);
    assert_eq!((reveal.x0, reveal.x1), (300.0, 400.0));
    assert_eq!(reveal.width(), 100.0);
}

#[test]
fn cutoffs_are_clamped_to_the_surface() {
    assert_eq!(ClipSpan::base(150.0, 100.0).x1, 100.0);
    assert_eq!(ClipSpan::base(-10.0, 100.0).width(), 0.0);
    assert_eq!(ClipSpan::reveal(f64::NAN, 100.0).width(), 0.0);
}

#[test]
fn columns_round_to_pixels() {
    assert_eq!(ClipSpan::base(100.0, 64.0).columns(64), (0, 64));
    assert_eq!(ClipSpan::base(33.0, 10.0).columns(10), (0, 3));
    assert_eq!(ClipSpan::reveal(0.0, 10.0).columns(10), (10, 10));
    let odd = ClipSpan { x0: 8.0, x1: 2.0 };
    assert_eq!(odd.columns(10), (8, 8));
}
