use super::*;
use crate::settings::model::{Mode, Pattern};

fn canvas() -> Canvas {
    Canvas::new(320, 200).unwrap()
}

#[test]
fn fingerprint_is_deterministic_for_same_inputs() {
    let s = Settings::default();
    assert_eq!(
        fingerprint_base(&s, canvas(), 0),
        fingerprint_base(&s.clone(), canvas(), 0)
    );
}

#[test]
fn fingerprint_ignores_reveal_and_motion_fields() {
    let a = Settings::default();
    let mut b = a.clone();
    b.svg.pattern2 = Pattern::Spiral;
    b.svg.speed2 = 9.0;
    b.movement.swing_x = 500.0;
    b.scale.enabled = true;
    b.global.blend_mode = crate::settings::model::BlendMode::Xor;
    b.global.cutoff_reveal = 10.0;
    b.geometric.shape1 = crate::settings::model::GeoShape::Dots;
    assert_eq!(fingerprint_base(&a, canvas(), 0), fingerprint_base(&b, canvas(), 0));
}

#[test]
fn fingerprint_changes_when_base_inputs_change() {
    let a = Settings::default();
    let base = fingerprint_base(&a, canvas(), 0);

    let mut b = a.clone();
    b.svg.rotation1 = 12.0;
    assert_ne!(fingerprint_base(&b, canvas(), 0), base);

    let mut b = a.clone();
    b.global.background = crate::foundation::core::Rgba8::rgb(1, 2, 3);
    assert_ne!(fingerprint_base(&b, canvas(), 0), base);

    let mut b = a.clone();
    b.global.cutoff_base = 50.0;
    assert_ne!(fingerprint_base(&b, canvas(), 0), base);

    let mut b = a.clone();
    b.mode = Mode::Geometric;
    assert_ne!(fingerprint_base(&b, canvas(), 0), base);

    assert_ne!(fingerprint_base(&a, Canvas::new(200, 320).unwrap(), 0), base);
    assert_ne!(fingerprint_base(&a, canvas(), 3), base);
}
