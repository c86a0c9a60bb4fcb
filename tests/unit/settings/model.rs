use super::*;
use serde_json::json;

#[test]
fn defaults_match_documented_values() {
    let s = Settings::default();
    assert_eq!(s.mode, Mode::Svg);
    assert_eq!(s.svg.pattern1, Pattern::Circles);
    assert_eq!(s.svg.pattern2, Pattern::Spiral);
    assert_eq!(s.svg.speed2, 10.0);
    assert_eq!(s.geometric.count, 40);
    assert_eq!(s.text.text, "MOIRÉ");
    assert_eq!(s.text.overlay, OverlayKind::Text);
    assert_eq!(s.line.period_reveal, 9.0);
    assert_eq!(s.shape.font, "Arial Black");
    assert_eq!(s.movement.kind, MovementKind::Rotation);
    assert!(!s.scale.enabled);
    assert_eq!(s.global.blend_mode, BlendMode::Difference);
    assert_eq!(s.global.background, Rgba8::rgb(10, 10, 15));
    assert!(s.global.animation_enabled);
}

#[test]
fn missing_keys_take_defaults() {
    let s = Settings::from_json_str(r#"{ "mode": "line", "line": { "periodBase": 12 } }"#).unwrap();
    assert_eq!(s.mode, Mode::Line);
    assert_eq!(s.line.period_base, 12.0);
    assert_eq!(s.line.thickness_base, 3.0);
    assert_eq!(s.geometric, GeometricParams::default());
    assert_eq!(s.global, GlobalParams::default());
}

#[test]
fn unknown_catalog_ids_are_kept_not_rejected() {
    let s: Settings = serde_json::from_value(json!({
        "svg": { "pattern1": "stars" },
        "text": { "overlay": "zigzag" },
        "global": { "blendMode": "hue" }
    }))
    .unwrap();
    assert_eq!(s.svg.pattern1, Pattern::Unknown("stars".to_owned()));
    assert_eq!(s.text.overlay.as_str(), "zigzag");
    assert_eq!(s.global.blend_mode, BlendMode::Normal);
}

#[test]
fn movement_kind_uses_type_key() {
    let s: Settings =
        serde_json::from_value(json!({ "movement": { "type": "lissajous", "axis": "y" } }))
            .unwrap();
    assert_eq!(s.movement.kind, MovementKind::Lissajous);
    assert_eq!(s.movement.axis, Axis::Y);
}

#[test]
fn invalid_mode_is_a_serde_error() {
    let err = Settings::from_json_str(r#"{ "mode": "plasma" }"#).unwrap_err();
    assert!(matches!(err, MoireError::Serde(_)));
}

#[test]
fn json_round_trip_preserves_settings() {
    let mut s = Settings::default();
    s.mode = Mode::Geometric;
    s.geometric.shape2 = GeoShape::Dots;
    s.global.blend_mode = BlendMode::Xor;
    let text = s.to_json_pretty().unwrap();
    assert!(text.contains("\"shape2\": \"dots\""));
    assert_eq!(Settings::from_json_str(&text).unwrap(), s);
}

#[test]
fn active_mode_follows_selector() {
    let mut s = Settings::default();
    assert!(matches!(s.active_mode(), ActiveMode::Svg(_)));
    s.mode = Mode::Shape;
    match s.active_mode() {
        ActiveMode::Shape(p) => assert_eq!(p.text, "HELLO"),
        other => panic!("unexpected mode {other:?}"),
    }
}

#[test]
fn catalogs_list_known_ids() {
    assert_eq!(Pattern::ALL.len(), 9);
    assert_eq!(GeoShape::ALL.len(), 6);
    assert_eq!(OverlayKind::ALL.len(), 5);
    for p in Pattern::ALL {
        assert_eq!(&Pattern::from(p.as_str()), p);
    }
}
